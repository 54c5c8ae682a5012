//! Assignments repository

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::assignment::{Assignment, AssignmentQuery},
};

/// Partial unique indexes over the active partition
pub const ACTIVE_VEHICLE_INDEX: &str = "uq_assignments_active_vehicle";
pub const ACTIVE_TRAILER_INDEX: &str = "uq_assignments_active_trailer";

#[derive(Clone)]
pub struct AssignmentsRepository {
    pool: Pool<Postgres>,
}

impl AssignmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &AssignmentQuery) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM assignments
            WHERE ($1::int IS NULL OR vehicle_id = $1)
              AND ($2::int IS NULL OR trailer_id = $2)
              AND ($3::bool IS NULL OR active = $3)
            ORDER BY started_at DESC, id DESC
            "#,
        )
        .bind(query.vehicle_id)
        .bind(query.trailer_id)
        .bind(query.active)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Assignment> {
        sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))
    }

    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Assignment> {
        sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))
    }

    /// Active assignment of a tractor, if any
    pub async fn active_for_vehicle(&self, vehicle_id: i32) -> AppResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE vehicle_id = $1 AND active",
        )
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Active assignment of a trailer, if any
    pub async fn active_for_trailer(&self, trailer_id: i32) -> AppResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE trailer_id = $1 AND active",
        )
        .bind(trailer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Active assignments of several tractors
    pub async fn active_for_vehicles(&self, vehicle_ids: &[i32]) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE vehicle_id = ANY($1) AND active",
        )
        .bind(vehicle_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active assignments touching either the tractor or the trailer, read
    /// inside the caller's transaction
    pub async fn active_involving(
        &self,
        conn: &mut PgConnection,
        vehicle_id: i32,
        trailer_id: i32,
    ) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE active AND (vehicle_id = $1 OR trailer_id = $2) FOR UPDATE",
        )
        .bind(vehicle_id)
        .bind(trailer_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        vehicle_id: i32,
        trailer_id: i32,
        active: bool,
        notes: Option<&str>,
    ) -> Result<Assignment, sqlx::Error> {
        sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (vehicle_id, trailer_id, active, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(trailer_id)
        .bind(active)
        .bind(notes)
        .fetch_one(&mut *conn)
        .await
    }

    /// Re-activate an assignment, restarting its time window
    pub async fn activate(&self, conn: &mut PgConnection, id: i32) -> Result<Assignment, sqlx::Error> {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET active = TRUE, started_at = NOW(), ended_at = NULL
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await
    }

    /// Close an assignment
    pub async fn deactivate(&self, id: i32) -> AppResult<Assignment> {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET active = FALSE, ended_at = COALESCE(ended_at, NOW())
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))
    }
}
