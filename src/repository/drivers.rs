//! Drivers repository

use sqlx::{Pool, Postgres};

use super::SetClause;
use crate::{
    error::{unique_violation, AppError, AppResult},
    models::driver::{CreateDriver, Driver, UpdateDriver},
};

#[derive(Clone)]
pub struct DriversRepository {
    pool: Pool<Postgres>,
}

impl DriversRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List drivers, optionally only active ones
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Driver>> {
        let rows = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE ($1 = FALSE OR active) ORDER BY name",
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Driver> {
        sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver {} not found", id)))
    }

    pub async fn create(&self, data: &CreateDriver) -> AppResult<Driver> {
        sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (name, rut, phone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.rut)
        .bind(&data.phone)
        .bind(&data.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => AppError::Conflict(format!("Driver with RUT {} already exists", data.rut)),
            None => e.into(),
        })
    }

    pub async fn update(&self, id: i32, data: &UpdateDriver) -> AppResult<Driver> {
        let mut clause = SetClause::new();
        clause.add(&data.name, "name");
        clause.add(&data.phone, "phone");
        clause.add(&data.email, "email");
        clause.add(&data.active, "active");

        if clause.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = clause.update_sql("drivers");
        let mut builder = sqlx::query_as::<_, Driver>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.phone);
        bind_field!(data.email);
        bind_field!(data.active);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver {} not found", id)))
    }
}
