//! Inspections repository: checklist catalogue, inspection headers and results

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{InspectionType, ItemCondition},
        inspection::{
            ChecklistCategory, ChecklistItem, CreateInspection, Inspection, ItemResultDetail,
            LubricantRecord,
        },
    },
};

#[derive(Clone)]
pub struct InspectionsRepository {
    pool: Pool<Postgres>,
}

impl InspectionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Checklist sections of an inspection type, in form order
    pub async fn categories(&self, inspection_type: InspectionType) -> AppResult<Vec<ChecklistCategory>> {
        let rows = sqlx::query_as::<_, ChecklistCategory>(
            r#"
            SELECT * FROM checklist_categories
            WHERE inspection_type = $1
            ORDER BY sort_order, id
            "#,
        )
        .bind(inspection_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Items of the given sections
    pub async fn items_for_categories(&self, category_ids: &[i32]) -> AppResult<Vec<ChecklistItem>> {
        let rows = sqlx::query_as::<_, ChecklistItem>(
            "SELECT * FROM checklist_items WHERE category_id = ANY($1) ORDER BY id",
        )
        .bind(category_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Items by id, read inside the submission transaction
    pub async fn items_by_ids(&self, conn: &mut PgConnection, ids: &[i32]) -> AppResult<Vec<ChecklistItem>> {
        let rows = sqlx::query_as::<_, ChecklistItem>(
            "SELECT * FROM checklist_items WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    /// Insert an inspection header
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        data: &CreateInspection,
        trailer_id: Option<i32>,
        fit_for_operation: bool,
    ) -> AppResult<Inspection> {
        let row = sqlx::query_as::<_, Inspection>(
            r#"
            INSERT INTO inspections (
                inspection_type, vehicle_id, trailer_id, mileage_km, exited_at,
                inspector, observations, fit_for_operation, oil_renewed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(data.inspection_type)
        .bind(data.vehicle_id)
        .bind(trailer_id)
        .bind(data.mileage_km)
        .bind(data.exited_at)
        .bind(data.inspector.trim())
        .bind(&data.observations)
        .bind(fit_for_operation)
        .bind(data.oil_renewed)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    pub async fn insert_result(
        &self,
        conn: &mut PgConnection,
        inspection_id: i32,
        item_id: i32,
        condition: ItemCondition,
        observation: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO inspection_results (inspection_id, item_id, condition, observation)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(inspection_id)
        .bind(item_id)
        .bind(condition)
        .bind(observation)
        .execute(&mut *conn)
        .await
        .map_err(|e| match crate::error::unique_violation(&e) {
            Some(_) => AppError::Validation(format!("Checklist item {} answered twice", item_id)),
            None => e.into(),
        })?;
        Ok(())
    }

    pub async fn insert_lubricant(
        &self,
        conn: &mut PgConnection,
        inspection_id: i32,
        lubricant_type: &str,
        next_change_km: Option<i32>,
    ) -> AppResult<LubricantRecord> {
        let row = sqlx::query_as::<_, LubricantRecord>(
            r#"
            INSERT INTO lubricant_records (inspection_id, lubricant_type, renewed, next_change_km)
            VALUES ($1, $2, TRUE, $3)
            RETURNING *
            "#,
        )
        .bind(inspection_id)
        .bind(lubricant_type)
        .bind(next_change_km)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    /// Point the inspection at the records its submission produced
    pub async fn link(
        &self,
        conn: &mut PgConnection,
        id: i32,
        maintenance_id: Option<i32>,
        report_id: Option<i32>,
    ) -> AppResult<Inspection> {
        let row = sqlx::query_as::<_, Inspection>(
            r#"
            UPDATE inspections SET maintenance_id = $1, report_id = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(maintenance_id)
        .bind(report_id)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Inspection> {
        sqlx::query_as::<_, Inspection>("SELECT * FROM inspections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inspection {} not found", id)))
    }

    /// Results of an inspection with item and category names, in form order
    pub async fn results(&self, inspection_id: i32) -> AppResult<Vec<ItemResultDetail>> {
        let mut conn = self.pool.acquire().await?;
        self.results_in(&mut conn, inspection_id).await
    }

    /// Same as [`results`](Self::results), inside the caller's transaction
    pub async fn results_in(
        &self,
        conn: &mut PgConnection,
        inspection_id: i32,
    ) -> AppResult<Vec<ItemResultDetail>> {
        let rows = sqlx::query_as::<_, ItemResultDetail>(
            r#"
            SELECT r.item_id, i.name AS item_name, c.name AS category_name,
                   c.sort_order AS category_order, i.critical, r.condition, r.observation
            FROM inspection_results r
            JOIN checklist_items i ON i.id = r.item_id
            JOIN checklist_categories c ON c.id = i.category_id
            WHERE r.inspection_id = $1
            ORDER BY c.sort_order, c.id, i.id
            "#,
        )
        .bind(inspection_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn lubricants(&self, inspection_id: i32) -> AppResult<Vec<LubricantRecord>> {
        let rows = sqlx::query_as::<_, LubricantRecord>(
            "SELECT * FROM lubricant_records WHERE inspection_id = $1 ORDER BY id",
        )
        .bind(inspection_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
