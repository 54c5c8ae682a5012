//! Driver endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::driver::{CreateDriver, Driver, UpdateDriver},
};

use super::AuthenticatedUser;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DriverQuery {
    /// Only drivers that can be assigned to a vehicle
    pub active_only: Option<bool>,
}

/// List drivers
#[utoipa::path(
    get,
    path = "/drivers",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(DriverQuery),
    responses(
        (status = 200, description = "Drivers", body = Vec<Driver>)
    )
)]
pub async fn list_drivers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<DriverQuery>,
) -> AppResult<Json<Vec<Driver>>> {
    claims.require_read_fleet()?;
    let drivers = state
        .services
        .drivers
        .list(query.active_only.unwrap_or(false))
        .await?;
    Ok(Json(drivers))
}

/// Get driver by ID
#[utoipa::path(
    get,
    path = "/drivers/{id}",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver", body = Driver),
        (status = 404, description = "Driver not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_driver(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Driver>> {
    claims.require_read_fleet()?;
    let driver = state.services.drivers.get_by_id(id).await?;
    Ok(Json(driver))
}

/// Create a driver
#[utoipa::path(
    post,
    path = "/drivers",
    tag = "drivers",
    security(("bearer_auth" = [])),
    request_body = CreateDriver,
    responses(
        (status = 201, description = "Driver created", body = Driver),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate RUT", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_driver(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateDriver>,
) -> AppResult<(StatusCode, Json<Driver>)> {
    claims.require_write_fleet()?;
    let driver = state.services.drivers.create(&data).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

/// Update a driver
#[utoipa::path(
    put,
    path = "/drivers/{id}",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Driver ID")),
    request_body = UpdateDriver,
    responses(
        (status = 200, description = "Driver updated", body = Driver),
        (status = 404, description = "Driver not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_driver(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateDriver>,
) -> AppResult<Json<Driver>> {
    claims.require_write_fleet()?;
    let driver = state.services.drivers.update(id, &data).await?;
    Ok(Json(driver))
}
