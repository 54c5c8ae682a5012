//! Vehicle (tractor) model, its current state and state history

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    document::DocumentWithStatus,
    enums::{OperationalRole, OperationalState, Workshop},
    maintenance::MaintenanceRecord,
    trailer::Trailer,
};
use crate::{error::AppError, status::ChannelStatus};

/// Chilean plates: two letters and four digits (old format) or four letters
/// and two digits (current format).
static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{2}[0-9]{4}|[A-Z]{4}[0-9]{2})$").expect("valid plate regex"));

/// Uppercase a plate and strip separators ("bb-cl 12" -> "BBCL12"), then
/// check it against the accepted formats.
pub fn normalize_plate(raw: &str) -> Result<String, AppError> {
    let plate: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if PLATE_RE.is_match(&plate) {
        Ok(plate)
    } else {
        Err(AppError::Validation(format!("Invalid plate: {}", raw)))
    }
}

/// Vehicle record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub id: i32,
    pub company_id: Option<i32>,
    pub plate: String,
    pub vin: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_type: String,
    pub cargo_type: Option<String>,
    pub operational_role: OperationalRole,
    /// Tank capacity in cubic metres
    pub capacity_m3: i32,
    pub workshop: Workshop,
    /// Kilometres between scheduled services
    pub maintenance_interval_km: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Current operational state, one row per vehicle
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VehicleState {
    pub id: i32,
    pub vehicle_id: i32,
    pub driver_id: Option<i32>,
    pub mileage_km: i32,
    pub operational_state: OperationalState,
    /// Base the vehicle currently operates from
    pub base: Option<String>,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// State history entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VehicleStateHistory {
    pub id: i32,
    pub vehicle_id: i32,
    pub mileage_km: Option<i32>,
    pub operational_state: OperationalState,
    pub driver_id: Option<i32>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create vehicle request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicle {
    pub company_id: Option<i32>,
    pub plate: String,
    #[validate(length(equal = 17, message = "VIN must be 17 characters"))]
    pub vin: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "Invalid year"))]
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "Vehicle type must be 1-50 characters"))]
    pub vehicle_type: String,
    pub cargo_type: Option<String>,
    pub operational_role: OperationalRole,
    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity_m3: i32,
    pub workshop: Workshop,
    #[validate(range(min = 1000, max = 200000, message = "Maintenance interval must be 1000-200000 km"))]
    pub maintenance_interval_km: Option<i32>,
    /// Initial odometer reading; creates the state record when present
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub initial_mileage_km: Option<i32>,
    pub base: Option<String>,
}

/// Update vehicle request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicle {
    pub company_id: Option<i32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "Invalid year"))]
    pub year: Option<i32>,
    pub cargo_type: Option<String>,
    pub operational_role: Option<OperationalRole>,
    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity_m3: Option<i32>,
    pub workshop: Option<Workshop>,
    #[validate(range(min = 1000, max = 200000, message = "Maintenance interval must be 1000-200000 km"))]
    pub maintenance_interval_km: Option<i32>,
    pub active: Option<bool>,
}

/// Update (or create) the current state of a vehicle
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleState {
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage_km: Option<i32>,
    pub operational_state: Option<OperationalState>,
    pub driver_id: Option<i32>,
    /// Remove the current driver
    #[serde(default)]
    pub clear_driver: bool,
    pub base: Option<String>,
    pub note: Option<String>,
}

/// Query parameters for the vehicle list
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct VehicleQuery {
    /// Keep only vehicles whose maintenance status has this code (OK, PROXIMO, CRITICO, VENCIDO, SIN_DATOS)
    pub status: Option<String>,
    /// `urgency` sorts each base group by maintenance priority, most urgent first
    pub order: Option<String>,
    /// Include inactive vehicles
    pub include_inactive: Option<bool>,
}

/// Vehicle row of the list view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VehicleListEntry {
    pub id: i32,
    pub plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub active: bool,
    pub operational_state: Option<OperationalState>,
    pub mileage_km: Option<i32>,
    pub driver_name: Option<String>,
    pub km_remaining: Option<Decimal>,
    pub maintenance: ChannelStatus,
}

/// Vehicles grouped by current base
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VehicleGroup {
    pub base: String,
    pub vehicles: Vec<VehicleListEntry>,
}

/// Compact vehicle data for dashboard cards
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VehicleSummary {
    pub id: i32,
    pub plate: String,
    pub operational_state: Option<OperationalState>,
    pub mileage_km: Option<i32>,
    pub km_remaining: Option<Decimal>,
}

/// Full vehicle detail
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VehicleDetail {
    pub vehicle: Vehicle,
    pub state: Option<VehicleState>,
    pub driver_name: Option<String>,
    pub maintenance: Vec<MaintenanceRecord>,
    pub documents: Vec<DocumentWithStatus>,
    pub trailer: Option<Trailer>,
    pub status: ChannelStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("bb-cl 12").unwrap(), "BBCL12");
        assert_eq!(normalize_plate("AB·1234").unwrap(), "AB1234");
    }

    #[test]
    fn test_reject_bad_plate() {
        assert!(normalize_plate("").is_err());
        assert!(normalize_plate("A12345").is_err());
        assert!(normalize_plate("ABCDE1").is_err());
    }
}
