//! Vehicle endpoints: registry, current state, history and status

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        trailer::Trailer,
        vehicle::{
            CreateVehicle, UpdateVehicle, UpdateVehicleState, Vehicle, VehicleDetail, VehicleGroup,
            VehicleQuery, VehicleState, VehicleStateHistory, VehicleSummary,
        },
    },
    status::ChannelStatus,
};

use super::AuthenticatedUser;

/// List vehicles grouped by base
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(VehicleQuery),
    responses(
        (status = 200, description = "Vehicles grouped by base", body = Vec<VehicleGroup>),
        (status = 400, description = "Unknown status or order", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_vehicles(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<VehicleQuery>,
) -> AppResult<Json<Vec<VehicleGroup>>> {
    claims.require_read_fleet()?;
    let groups = state.services.vehicles.list(&query).await?;
    Ok(Json(groups))
}

/// Get vehicle detail
#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle with state, maintenance, documents and trailer", body = VehicleDetail),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<VehicleDetail>> {
    claims.require_read_fleet()?;
    let detail = state.services.vehicles.get_detail(id).await?;
    Ok(Json(detail))
}

/// Register a vehicle
#[utoipa::path(
    post,
    path = "/vehicles",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    request_body = CreateVehicle,
    responses(
        (status = 201, description = "Vehicle created", body = Vehicle),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate plate", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateVehicle>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    claims.require_write_fleet()?;
    let vehicle = state.services.vehicles.create(&data).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Update vehicle data
#[utoipa::path(
    put,
    path = "/vehicles/{id}",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = UpdateVehicle,
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateVehicle>,
) -> AppResult<Json<Vehicle>> {
    claims.require_write_fleet()?;
    let vehicle = state.services.vehicles.update(id, &data).await?;
    Ok(Json(vehicle))
}

/// Update the current operational state (mileage, state, driver, base)
#[utoipa::path(
    put,
    path = "/vehicles/{id}/state",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleState,
    responses(
        (status = 200, description = "State updated and recorded in history", body = VehicleState),
        (status = 400, description = "Invalid state or inactive driver", body = crate::error::ErrorResponse),
        (status = 404, description = "Vehicle or driver not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_vehicle_state(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateVehicleState>,
) -> AppResult<Json<VehicleState>> {
    claims.require_write_fleet()?;
    let vehicle_state = state.services.vehicles.update_state(id, &data).await?;
    Ok(Json(vehicle_state))
}

/// State change history, newest first
#[utoipa::path(
    get,
    path = "/vehicles/{id}/history",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "History entries", body = Vec<VehicleStateHistory>),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_vehicle_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<VehicleStateHistory>>> {
    claims.require_read_fleet()?;
    let history = state.services.vehicles.history(id).await?;
    Ok(Json(history))
}

/// Compact summary for dashboard cards
#[utoipa::path(
    get,
    path = "/vehicles/{id}/summary",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle summary", body = VehicleSummary),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_vehicle_summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<VehicleSummary>> {
    claims.require_read_fleet()?;
    let summary = state.services.vehicles.summary(id).await?;
    Ok(Json(summary))
}

/// Combined maintenance and document status of a vehicle
#[utoipa::path(
    get,
    path = "/vehicles/{id}/status",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle status", body = ChannelStatus),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_vehicle_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ChannelStatus>> {
    claims.require_read_fleet()?;
    let status = state.services.fleet.vehicle_status(id).await?;
    Ok(Json(status))
}

/// Trailer currently towed by the vehicle, if any
#[utoipa::path(
    get,
    path = "/vehicles/{id}/trailer",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Assigned trailer or null", body = Option<Trailer>),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_vehicle_trailer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Option<Trailer>>> {
    claims.require_read_fleet()?;
    let trailer = state.services.vehicles.current_trailer(id).await?;
    Ok(Json(trailer))
}
