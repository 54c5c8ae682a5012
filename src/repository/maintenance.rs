//! Maintenance records repository (append-only)

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Workshop,
        maintenance::{MaintenanceQuery, MaintenanceRecord},
    },
};

/// Fields of a record about to be appended
#[derive(Debug, Clone)]
pub struct NewMaintenance<'a> {
    pub vehicle_id: Option<i32>,
    pub trailer_id: Option<i32>,
    pub workshop: Workshop,
    pub service_date: NaiveDate,
    pub service_km: Option<i32>,
    pub next_due_km: Option<i32>,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Records matching the filters, newest service first
    pub async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<MaintenanceRecord>> {
        let rows = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT * FROM maintenance_records
            WHERE ($1::int IS NULL OR vehicle_id = $1)
              AND ($2::int IS NULL OR trailer_id = $2)
            ORDER BY service_date DESC, id DESC
            "#,
        )
        .bind(query.vehicle_id)
        .bind(query.trailer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRecord> {
        sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))
    }

    /// Latest record of each listed vehicle
    pub async fn latest_for_vehicles(&self, vehicle_ids: &[i32]) -> AppResult<Vec<MaintenanceRecord>> {
        let rows = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT DISTINCT ON (vehicle_id) * FROM maintenance_records
            WHERE vehicle_id = ANY($1)
            ORDER BY vehicle_id, service_date DESC, id DESC
            "#,
        )
        .bind(vehicle_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Latest record of each listed trailer
    pub async fn latest_for_trailers(&self, trailer_ids: &[i32]) -> AppResult<Vec<MaintenanceRecord>> {
        let rows = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT DISTINCT ON (trailer_id) * FROM maintenance_records
            WHERE trailer_id = ANY($1)
            ORDER BY trailer_id, service_date DESC, id DESC
            "#,
        )
        .bind(trailer_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        record: &NewMaintenance<'_>,
    ) -> AppResult<MaintenanceRecord> {
        let row = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (
                vehicle_id, trailer_id, workshop, service_date, service_km, next_due_km, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(record.vehicle_id)
        .bind(record.trailer_id)
        .bind(record.workshop)
        .bind(record.service_date)
        .bind(record.service_km)
        .bind(record.next_due_km)
        .bind(record.notes)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }
}
