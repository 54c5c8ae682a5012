//! Tractor/trailer assignment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Time-bounded link between a tractor and a trailer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: i32,
    pub vehicle_id: i32,
    pub trailer_id: i32,
    pub active: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Create assignment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAssignment {
    pub vehicle_id: i32,
    pub trailer_id: i32,
    /// Activate immediately (default true)
    pub active: Option<bool>,
    pub notes: Option<String>,
}

/// Assignment list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AssignmentQuery {
    pub vehicle_id: Option<i32>,
    pub trailer_id: Option<i32>,
    pub active: Option<bool>,
}
