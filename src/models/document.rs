//! Compliance document model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{DocumentCategory, EntityKind};
use crate::status::{classify_document, Assessment, Severity};

/// Document attached to a vehicle, trailer or driver
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: i32,
    pub entity_kind: EntityKind,
    pub entity_id: i32,
    pub category: DocumentCategory,
    /// Absent for documents that never expire
    pub expiry_date: Option<NaiveDate>,
    /// Where the file lives (Drive URL or report store path)
    pub url: String,
    /// Hex SHA-256 of the stored file, when known
    pub checksum: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn assess(&self, today: NaiveDate) -> Assessment {
        classify_document(self.expiry_date, today)
    }
}

/// Document with its computed expiry status
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentWithStatus {
    #[serde(flatten)]
    pub document: Document,
    pub status: Severity,
    pub status_reason: Option<String>,
}

impl DocumentWithStatus {
    pub fn new(document: Document, today: NaiveDate) -> Self {
        let assessment = document.assess(today);
        Self {
            document,
            status: assessment.severity,
            status_reason: assessment.reason,
        }
    }
}

/// Append a document
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDocument {
    pub entity_kind: EntityKind,
    pub entity_id: i32,
    pub category: DocumentCategory,
    pub expiry_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 500, message = "URL must be 1-500 characters"))]
    pub url: String,
    #[validate(length(equal = 64, message = "Checksum must be a hex SHA-256"))]
    pub checksum: Option<String>,
}

/// Document list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DocumentQuery {
    pub entity_kind: Option<EntityKind>,
    pub entity_id: Option<i32>,
    /// Only documents with this status code
    pub status: Option<String>,
}
