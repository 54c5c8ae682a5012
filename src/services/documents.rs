//! Compliance documents (append-only)

use validator::Validate;

use super::fleet::today;
use crate::{
    error::{AppError, AppResult},
    models::{
        document::{CreateDocument, Document, DocumentQuery, DocumentWithStatus},
        enums::{DocumentCategory, EntityKind},
    },
    repository::Repository,
    status::Severity,
};

#[derive(Clone)]
pub struct DocumentsService {
    repository: Repository,
}

impl DocumentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Documents with their expiry status, optionally filtered by status code
    pub async fn list(&self, query: &DocumentQuery) -> AppResult<Vec<DocumentWithStatus>> {
        let wanted: Option<Severity> = match query.status.as_deref().filter(|s| !s.is_empty()) {
            Some(code) => Some(code.parse().map_err(AppError::Validation)?),
            None => None,
        };
        let today = today();

        let documents = self
            .repository
            .documents
            .list(query.entity_kind, query.entity_id)
            .await?;

        Ok(documents
            .into_iter()
            .map(|d| DocumentWithStatus::new(d, today))
            .filter(|d| wanted.map_or(true, |w| d.status == w))
            .collect())
    }

    /// Append a document to an existing vehicle, trailer or driver
    pub async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        data.validate()?;
        if data.category == DocumentCategory::Inspeccion {
            return Err(AppError::Validation(
                "Inspection reports are attached by inspection submissions".to_string(),
            ));
        }

        let repo = &self.repository;
        match data.entity_kind {
            EntityKind::Vehicle => {
                repo.vehicles.get_by_id(data.entity_id).await?;
            }
            EntityKind::Trailer => {
                repo.trailers.get_by_id(data.entity_id).await?;
            }
            EntityKind::Driver => {
                repo.drivers.get_by_id(data.entity_id).await?;
            }
        }

        let mut tx = repo.begin().await?;
        let document = repo.documents.insert(&mut tx, data).await?;
        tx.commit().await?;

        tracing::info!(
            "Document {} ({}) attached to {} {}",
            document.id,
            document.category,
            document.entity_kind,
            document.entity_id
        );
        Ok(document)
    }
}
