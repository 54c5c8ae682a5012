//! Trailers repository

use rust_decimal::Decimal;
use sqlx::{PgConnection, Pool, Postgres};

use super::SetClause;
use crate::{
    error::{unique_violation, AppError, AppResult},
    models::{
        enums::TrailerState,
        trailer::{CreateTrailer, Trailer, UpdateTrailer},
    },
};

#[derive(Clone)]
pub struct TrailersRepository {
    pool: Pool<Postgres>,
}

impl TrailersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Trailer>> {
        let rows = sqlx::query_as::<_, Trailer>(
            "SELECT * FROM trailers WHERE ($1 OR active) ORDER BY plate",
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Trailer> {
        sqlx::query_as::<_, Trailer>("SELECT * FROM trailers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trailer {} not found", id)))
    }

    /// Trailers by id, in no particular order
    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Trailer>> {
        let rows = sqlx::query_as::<_, Trailer>("SELECT * FROM trailers WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetch a trailer and lock its row until the transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Trailer> {
        sqlx::query_as::<_, Trailer>("SELECT * FROM trailers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trailer {} not found", id)))
    }

    pub async fn create(&self, plate: &str, data: &CreateTrailer) -> AppResult<Trailer> {
        sqlx::query_as::<_, Trailer>(
            r#"
            INSERT INTO trailers (plate, brand, model, year, load_capacity, accumulated_km, operational_state)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(plate)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(data.year)
        .bind(data.load_capacity)
        .bind(data.accumulated_km.unwrap_or(Decimal::ZERO))
        .bind(data.operational_state.unwrap_or(TrailerState::Operativo))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => AppError::Conflict(format!("Trailer with plate {} already exists", plate)),
            None => e.into(),
        })
    }

    pub async fn update(&self, id: i32, data: &UpdateTrailer) -> AppResult<Trailer> {
        let mut clause = SetClause::new();
        clause.add(&data.brand, "brand");
        clause.add(&data.model, "model");
        clause.add(&data.year, "year");
        clause.add(&data.load_capacity, "load_capacity");
        clause.add(&data.accumulated_km, "accumulated_km");
        clause.add(&data.operational_state, "operational_state");
        clause.add(&data.active, "active");

        if clause.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = clause.update_sql("trailers");
        let mut builder = sqlx::query_as::<_, Trailer>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.brand);
        bind_field!(data.model);
        bind_field!(data.year);
        bind_field!(data.load_capacity);
        bind_field!(data.accumulated_km);
        bind_field!(data.operational_state);
        bind_field!(data.active);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trailer {} not found", id)))
    }
}
