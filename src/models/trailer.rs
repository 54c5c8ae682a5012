//! Trailer model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    document::DocumentWithStatus, enums::TrailerState, maintenance::MaintenanceRecord,
    vehicle::Vehicle,
};
use crate::status::ChannelStatus;

/// Trailer record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Trailer {
    pub id: i32,
    pub plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    /// Load capacity in cubic metres
    pub load_capacity: Option<Decimal>,
    /// Kilometres accumulated while towed
    pub accumulated_km: Decimal,
    pub operational_state: TrailerState,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create trailer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTrailer {
    pub plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "Invalid year"))]
    pub year: Option<i32>,
    pub load_capacity: Option<Decimal>,
    pub accumulated_km: Option<Decimal>,
    pub operational_state: Option<TrailerState>,
}

/// Update trailer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTrailer {
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "Invalid year"))]
    pub year: Option<i32>,
    pub load_capacity: Option<Decimal>,
    pub accumulated_km: Option<Decimal>,
    pub operational_state: Option<TrailerState>,
    pub active: Option<bool>,
}

/// Compact trailer data for dashboard cards
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrailerSummary {
    pub id: i32,
    pub plate: String,
    pub operational_state: TrailerState,
    pub accumulated_km: Decimal,
    pub next_due_km: Option<i32>,
    pub km_remaining: Option<Decimal>,
    /// Number of documents already expired
    pub expired_documents: i64,
}

/// Full trailer detail
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrailerDetail {
    pub trailer: Trailer,
    pub maintenance: Vec<MaintenanceRecord>,
    pub documents: Vec<DocumentWithStatus>,
    pub vehicle: Option<Vehicle>,
    pub status: ChannelStatus,
}
