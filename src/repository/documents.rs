//! Documents repository (append-only)

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        document::{CreateDocument, Document},
        enums::EntityKind,
    },
};

#[derive(Clone)]
pub struct DocumentsRepository {
    pool: Pool<Postgres>,
}

impl DocumentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Documents, optionally restricted to one entity kind and id
    pub async fn list(
        &self,
        entity_kind: Option<EntityKind>,
        entity_id: Option<i32>,
    ) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE ($1::text IS NULL OR entity_kind = $1)
              AND ($2::int IS NULL OR entity_id = $2)
            ORDER BY expiry_date ASC NULLS LAST, id
            "#,
        )
        .bind(entity_kind)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Document> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))
    }

    /// Documents of one entity, earliest expiry first
    pub async fn for_entity(&self, entity_kind: EntityKind, entity_id: i32) -> AppResult<Vec<Document>> {
        self.list(Some(entity_kind), Some(entity_id)).await
    }

    /// Documents of several entities of the same kind
    pub async fn for_entities(
        &self,
        entity_kind: EntityKind,
        entity_ids: &[i32],
    ) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE entity_kind = $1 AND entity_id = ANY($2)
            ORDER BY expiry_date ASC NULLS LAST, id
            "#,
        )
        .bind(entity_kind)
        .bind(entity_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Number of documents of an entity that expired before `today`
    pub async fn count_expired(
        &self,
        entity_kind: EntityKind,
        entity_id: i32,
        today: NaiveDate,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM documents
            WHERE entity_kind = $1 AND entity_id = $2 AND expiry_date < $3
            "#,
        )
        .bind(entity_kind)
        .bind(entity_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn insert(&self, conn: &mut PgConnection, data: &CreateDocument) -> AppResult<Document> {
        let row = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (entity_kind, entity_id, category, expiry_date, url, checksum)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.entity_kind)
        .bind(data.entity_id)
        .bind(data.category)
        .bind(data.expiry_date)
        .bind(&data.url)
        .bind(&data.checksum)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }
}
