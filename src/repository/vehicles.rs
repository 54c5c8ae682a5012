//! Vehicles repository: vehicles, their current state and state history

use sqlx::{FromRow, PgConnection, Pool, Postgres};

use super::SetClause;
use crate::{
    error::{unique_violation, AppError, AppResult},
    models::{
        enums::OperationalState,
        vehicle::{CreateVehicle, UpdateVehicle, Vehicle, VehicleState, VehicleStateHistory},
    },
};

/// Default kilometres between services when none is given
pub const DEFAULT_MAINTENANCE_INTERVAL_KM: i32 = 25_000;

/// Current state joined with the driver's name
#[derive(Debug, Clone, FromRow)]
pub struct StateWithDriver {
    #[sqlx(flatten)]
    pub state: VehicleState,
    pub driver_name: Option<String>,
}

#[derive(Clone)]
pub struct VehiclesRepository {
    pool: Pool<Postgres>,
}

impl VehiclesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List vehicles ordered by plate
    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE ($1 OR active) ORDER BY plate",
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    /// Fetch a vehicle and lock its row until the transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        plate: &str,
        data: &CreateVehicle,
    ) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                company_id, plate, vin, brand, model, year, vehicle_type, cargo_type,
                operational_role, capacity_m3, workshop, maintenance_interval_km
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(data.company_id)
        .bind(plate)
        .bind(&data.vin)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(data.year)
        .bind(&data.vehicle_type)
        .bind(&data.cargo_type)
        .bind(data.operational_role)
        .bind(data.capacity_m3)
        .bind(data.workshop)
        .bind(data.maintenance_interval_km.unwrap_or(DEFAULT_MAINTENANCE_INTERVAL_KM))
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => AppError::Conflict(format!("Vehicle with plate or VIN {} already exists", plate)),
            None => e.into(),
        })
    }

    pub async fn update(&self, id: i32, data: &UpdateVehicle) -> AppResult<Vehicle> {
        let mut clause = SetClause::new();
        clause.add(&data.company_id, "company_id");
        clause.add(&data.brand, "brand");
        clause.add(&data.model, "model");
        clause.add(&data.year, "year");
        clause.add(&data.cargo_type, "cargo_type");
        clause.add(&data.operational_role, "operational_role");
        clause.add(&data.capacity_m3, "capacity_m3");
        clause.add(&data.workshop, "workshop");
        clause.add(&data.maintenance_interval_km, "maintenance_interval_km");
        clause.add(&data.active, "active");

        if clause.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = clause.update_sql("vehicles");
        let mut builder = sqlx::query_as::<_, Vehicle>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.company_id);
        bind_field!(data.brand);
        bind_field!(data.model);
        bind_field!(data.year);
        bind_field!(data.cargo_type);
        bind_field!(data.operational_role);
        bind_field!(data.capacity_m3);
        bind_field!(data.workshop);
        bind_field!(data.maintenance_interval_km);
        bind_field!(data.active);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    /// Current state of one vehicle, if it has one
    pub async fn state(&self, vehicle_id: i32) -> AppResult<Option<StateWithDriver>> {
        let row = sqlx::query_as::<_, StateWithDriver>(
            r#"
            SELECT s.*, d.name AS driver_name
            FROM vehicle_states s
            LEFT JOIN drivers d ON d.id = s.driver_id
            WHERE s.vehicle_id = $1
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Current states of several vehicles
    pub async fn states_for(&self, vehicle_ids: &[i32]) -> AppResult<Vec<StateWithDriver>> {
        let rows = sqlx::query_as::<_, StateWithDriver>(
            r#"
            SELECT s.*, d.name AS driver_name
            FROM vehicle_states s
            LEFT JOIN drivers d ON d.id = s.driver_id
            WHERE s.vehicle_id = ANY($1)
            "#,
        )
        .bind(vehicle_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Current state of a vehicle, locked for update
    pub async fn state_for_update(
        &self,
        conn: &mut PgConnection,
        vehicle_id: i32,
    ) -> AppResult<Option<VehicleState>> {
        let row = sqlx::query_as::<_, VehicleState>(
            "SELECT * FROM vehicle_states WHERE vehicle_id = $1 FOR UPDATE",
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    /// Insert the state record of a vehicle that has none yet
    pub async fn insert_state(
        &self,
        conn: &mut PgConnection,
        vehicle_id: i32,
        mileage_km: i32,
        operational_state: OperationalState,
        driver_id: Option<i32>,
        base: Option<&str>,
        note: Option<&str>,
    ) -> AppResult<VehicleState> {
        let row = sqlx::query_as::<_, VehicleState>(
            r#"
            INSERT INTO vehicle_states (vehicle_id, mileage_km, operational_state, driver_id, base, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(mileage_km)
        .bind(operational_state)
        .bind(driver_id)
        .bind(base)
        .bind(note)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    /// Overwrite the state record in place
    pub async fn save_state(&self, conn: &mut PgConnection, state: &VehicleState) -> AppResult<VehicleState> {
        let row = sqlx::query_as::<_, VehicleState>(
            r#"
            UPDATE vehicle_states
            SET mileage_km = $1, operational_state = $2, driver_id = $3, base = $4,
                note = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(state.mileage_km)
        .bind(state.operational_state)
        .bind(state.driver_id)
        .bind(&state.base)
        .bind(&state.note)
        .bind(state.id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    /// Append a state history entry
    pub async fn append_history(
        &self,
        conn: &mut PgConnection,
        state: &VehicleState,
        description: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vehicle_state_history (vehicle_id, mileage_km, operational_state, driver_id, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(state.vehicle_id)
        .bind(state.mileage_km)
        .bind(state.operational_state)
        .bind(state.driver_id)
        .bind(description)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// State history of a vehicle, newest first
    pub async fn history(&self, vehicle_id: i32, limit: i64) -> AppResult<Vec<VehicleStateHistory>> {
        let rows = sqlx::query_as::<_, VehicleStateHistory>(
            r#"
            SELECT * FROM vehicle_state_history
            WHERE vehicle_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(vehicle_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
