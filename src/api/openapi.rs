//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    assignments, auth, companies, documents, drivers, health, inspections, maintenance, status,
    trailers, users, vehicles,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fleet API",
        version = "1.0.0",
        description = "Fleet maintenance, compliance and inspection REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::create_user,
        // Companies
        companies::list_companies,
        companies::create_company,
        // Drivers
        drivers::list_drivers,
        drivers::get_driver,
        drivers::create_driver,
        drivers::update_driver,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::create_vehicle,
        vehicles::update_vehicle,
        vehicles::update_vehicle_state,
        vehicles::get_vehicle_history,
        vehicles::get_vehicle_summary,
        vehicles::get_vehicle_status,
        vehicles::get_vehicle_trailer,
        // Trailers
        trailers::list_trailers,
        trailers::get_trailer,
        trailers::create_trailer,
        trailers::update_trailer,
        trailers::get_trailer_summary,
        trailers::get_trailer_status,
        // Assignments
        assignments::list_assignments,
        assignments::get_assignment,
        assignments::create_assignment,
        assignments::activate_assignment,
        assignments::deactivate_assignment,
        // Maintenance
        maintenance::list_maintenance,
        maintenance::create_maintenance,
        // Documents
        documents::list_documents,
        documents::create_document,
        // Status
        status::fleet_status,
        // Inspections
        inspections::get_checklist,
        inspections::get_autofill,
        inspections::get_inspection,
        inspections::submit_inspection,
    ),
    components(
        schemas(
            // Health
            health::HealthResponse,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::CreateUser,
            // Enums
            crate::models::enums::Role,
            crate::models::enums::EntityKind,
            crate::models::enums::DocumentCategory,
            crate::models::enums::OperationalState,
            crate::models::enums::TrailerState,
            crate::models::enums::Workshop,
            crate::models::enums::OperationalRole,
            crate::models::enums::InspectionType,
            crate::models::enums::ItemCondition,
            // Status
            crate::status::Severity,
            crate::status::Assessment,
            crate::status::ChannelStatus,
            crate::models::fleet::FleetStatusEntry,
            // Companies and drivers
            crate::models::company::Company,
            crate::models::company::CreateCompany,
            crate::models::driver::Driver,
            crate::models::driver::CreateDriver,
            crate::models::driver::UpdateDriver,
            // Vehicles
            crate::models::vehicle::Vehicle,
            crate::models::vehicle::VehicleState,
            crate::models::vehicle::VehicleStateHistory,
            crate::models::vehicle::CreateVehicle,
            crate::models::vehicle::UpdateVehicle,
            crate::models::vehicle::UpdateVehicleState,
            crate::models::vehicle::VehicleListEntry,
            crate::models::vehicle::VehicleGroup,
            crate::models::vehicle::VehicleSummary,
            crate::models::vehicle::VehicleDetail,
            // Trailers
            crate::models::trailer::Trailer,
            crate::models::trailer::CreateTrailer,
            crate::models::trailer::UpdateTrailer,
            crate::models::trailer::TrailerSummary,
            crate::models::trailer::TrailerDetail,
            // Assignments
            crate::models::assignment::Assignment,
            crate::models::assignment::CreateAssignment,
            // Maintenance and documents
            crate::models::maintenance::MaintenanceRecord,
            crate::models::maintenance::CreateMaintenance,
            crate::models::document::Document,
            crate::models::document::DocumentWithStatus,
            crate::models::document::CreateDocument,
            // Inspections
            crate::models::inspection::Inspection,
            crate::models::inspection::ChecklistCategory,
            crate::models::inspection::ChecklistItem,
            crate::models::inspection::CategoryWithItems,
            crate::models::inspection::ItemResultDetail,
            crate::models::inspection::LubricantRecord,
            crate::models::inspection::ChecklistEntry,
            crate::models::inspection::CreateInspection,
            crate::models::inspection::InspectionDetail,
            crate::models::inspection::Autofill,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Staff user administration"),
        (name = "companies", description = "Transport companies"),
        (name = "drivers", description = "Driver registry"),
        (name = "vehicles", description = "Tractors, their state and history"),
        (name = "trailers", description = "Trailers and tanks"),
        (name = "assignments", description = "Tractor-trailer pairings"),
        (name = "maintenance", description = "Service records"),
        (name = "documents", description = "Compliance documents"),
        (name = "status", description = "Fleet status dashboard"),
        (name = "inspections", description = "Daily and weekly inspections")
    )
)]
pub struct ApiDoc;

/// Create OpenAPI router with Swagger UI
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
