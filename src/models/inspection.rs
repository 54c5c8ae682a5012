//! Inspection checklist model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    document::Document,
    enums::{InspectionType, ItemCondition},
    maintenance::MaintenanceRecord,
};

/// Inspection report header
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Inspection {
    pub id: i32,
    pub inspection_type: InspectionType,
    pub vehicle_id: i32,
    pub trailer_id: Option<i32>,
    /// Odometer reading taken during the inspection
    pub mileage_km: i32,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    /// Person responsible for the inspection
    pub inspector: String,
    pub observations: Option<String>,
    pub fit_for_operation: bool,
    pub oil_renewed: bool,
    /// Maintenance record appended for an oil change
    pub maintenance_id: Option<i32>,
    /// Generated report document
    pub report_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Checklist section ("CABINA", "KIT DE SEGURIDAD", ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChecklistCategory {
    pub id: i32,
    pub name: String,
    pub inspection_type: InspectionType,
    pub sort_order: i32,
}

/// Single checklist item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChecklistItem {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    /// A bad result on a critical item keeps the unit off the road
    pub critical: bool,
}

/// Category with its items, for the inspection form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryWithItems {
    #[serde(flatten)]
    pub category: ChecklistCategory,
    pub items: Vec<ChecklistItem>,
}

/// Result of one item in one inspection
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemResult {
    pub id: i32,
    pub inspection_id: i32,
    pub item_id: i32,
    pub condition: ItemCondition,
    pub observation: Option<String>,
}

/// Item result joined with its item and category names, for display and reports
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemResultDetail {
    pub item_id: i32,
    pub item_name: String,
    pub category_name: String,
    pub category_order: i32,
    pub critical: bool,
    pub condition: ItemCondition,
    pub observation: Option<String>,
}

/// Lubricant renewal entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LubricantRecord {
    pub id: i32,
    pub inspection_id: i32,
    pub lubricant_type: String,
    pub renewed: bool,
    pub next_change_km: Option<i32>,
}

/// One checklist answer in a submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChecklistEntry {
    pub item_id: i32,
    #[serde(default)]
    pub condition: ItemCondition,
    pub observation: Option<String>,
}

/// Inspection submission
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateInspection {
    pub inspection_type: InspectionType,
    pub vehicle_id: i32,
    /// Defaults to the trailer currently assigned to the vehicle
    pub trailer_id: Option<i32>,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage_km: i32,
    #[validate(length(min = 1, max = 100, message = "Inspector must be 1-100 characters"))]
    pub inspector: String,
    pub observations: Option<String>,
    #[serde(default = "default_true")]
    pub fit_for_operation: bool,
    #[serde(default)]
    pub oil_renewed: bool,
    pub exited_at: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Checklist cannot be empty"))]
    pub checklist: Vec<ChecklistEntry>,
}

fn default_true() -> bool {
    true
}

/// Inspection with everything written by the submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InspectionDetail {
    pub inspection: Inspection,
    pub results: Vec<ItemResultDetail>,
    pub lubricants: Vec<LubricantRecord>,
    /// Maintenance record appended when oil was renewed
    pub maintenance: Option<MaintenanceRecord>,
    /// Generated PDF report
    pub report: Option<Document>,
}

/// Data pre-filled in the inspection form once a vehicle is picked
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Autofill {
    pub inspection_date: String,
    pub place: String,
    pub contractor: String,
    pub contract: String,
    pub driver_name: String,
    pub control_date: String,
    pub vehicle_brand: String,
    pub vehicle_model: String,
    pub vehicle_plate: String,
    pub vehicle_year: String,
    pub vehicle_rt_expiry: String,
    pub vehicle_pc_expiry: String,
    pub vehicle_soap_expiry: String,
    pub vehicle_tc8_expiry: String,
    pub has_trailer: bool,
    pub trailer_id: Option<i32>,
    pub trailer_brand: String,
    pub trailer_model: String,
    pub trailer_year: String,
    pub trailer_plate: String,
    pub trailer_capacity: String,
    pub trailer_rt_expiry: String,
    pub trailer_pc_expiry: String,
    pub trailer_soap_expiry: String,
    pub trailer_tc8_expiry: String,
}
