//! Data models for the fleet server

pub mod assignment;
pub mod company;
pub mod document;
pub mod driver;
pub mod enums;
pub mod fleet;
pub mod inspection;
pub mod maintenance;
pub mod trailer;
pub mod user;
pub mod vehicle;

// Re-export commonly used types
pub use assignment::Assignment;
pub use company::Company;
pub use document::{Document, DocumentWithStatus};
pub use driver::Driver;
pub use enums::{
    DocumentCategory, EntityKind, InspectionType, ItemCondition, OperationalRole,
    OperationalState, Role, TrailerState, Workshop,
};
pub use fleet::FleetStatusEntry;
pub use inspection::{Inspection, InspectionDetail};
pub use maintenance::MaintenanceRecord;
pub use trailer::Trailer;
pub use user::{User, UserClaims};
pub use vehicle::{Vehicle, VehicleState};
