//! Maintenance record model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::Workshop;

/// Service event for a vehicle or a trailer (exactly one of the two)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceRecord {
    pub id: i32,
    pub vehicle_id: Option<i32>,
    pub trailer_id: Option<i32>,
    pub workshop: Workshop,
    pub service_date: NaiveDate,
    /// Odometer at service
    pub service_km: Option<i32>,
    /// Odometer at which the next service is due
    pub next_due_km: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    /// Service interval covered by this record
    pub fn interval_km(&self) -> Option<i32> {
        Some(self.next_due_km? - self.service_km?)
    }
}

/// Append a maintenance record
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenance {
    pub vehicle_id: Option<i32>,
    pub trailer_id: Option<i32>,
    pub workshop: Workshop,
    pub service_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub service_km: Option<i32>,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub next_due_km: Option<i32>,
    pub notes: Option<String>,
}

/// Maintenance list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MaintenanceQuery {
    pub vehicle_id: Option<i32>,
    pub trailer_id: Option<i32>,
}
