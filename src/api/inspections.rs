//! Inspection endpoints: checklist catalogue, form autofill and submission

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::InspectionType,
        inspection::{Autofill, CategoryWithItems, CreateInspection, InspectionDetail},
    },
};

use super::AuthenticatedUser;

/// Checklist sections and items of an inspection type
#[utoipa::path(
    get,
    path = "/inspections/categories/{inspection_type}",
    tag = "inspections",
    security(("bearer_auth" = [])),
    params(("inspection_type" = String, Path, description = "DIARIA or SEMANAL")),
    responses(
        (status = 200, description = "Checklist in form order", body = Vec<CategoryWithItems>),
        (status = 400, description = "Unknown inspection type", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_checklist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(inspection_type): Path<String>,
) -> AppResult<Json<Vec<CategoryWithItems>>> {
    claims.require_read_inspections()?;
    let inspection_type: InspectionType = inspection_type.parse().map_err(AppError::Validation)?;
    let categories = state.services.inspections.categories(inspection_type).await?;
    Ok(Json(categories))
}

/// Form data pre-filled from the vehicle, its driver, trailer and documents
#[utoipa::path(
    get,
    path = "/inspections/autofill/{vehicle_id}",
    tag = "inspections",
    security(("bearer_auth" = [])),
    params(("vehicle_id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Autofill data", body = Autofill),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_autofill(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(vehicle_id): Path<i32>,
) -> AppResult<Json<Autofill>> {
    claims.require_read_inspections()?;
    let autofill = state.services.inspections.autofill(vehicle_id).await?;
    Ok(Json(autofill))
}

/// Get inspection detail
#[utoipa::path(
    get,
    path = "/inspections/{id}",
    tag = "inspections",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Inspection ID")),
    responses(
        (status = 200, description = "Inspection with results and report", body = InspectionDetail),
        (status = 404, description = "Inspection not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_inspection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<InspectionDetail>> {
    claims.require_read_inspections()?;
    let detail = state.services.inspections.get_detail(id).await?;
    Ok(Json(detail))
}

/// Submit an inspection
///
/// Records the results, updates the vehicle mileage, registers the oil change
/// when declared and stores the generated PDF report. Nothing is kept when any
/// step fails.
#[utoipa::path(
    post,
    path = "/inspections",
    tag = "inspections",
    security(("bearer_auth" = [])),
    request_body = CreateInspection,
    responses(
        (status = 201, description = "Inspection recorded", body = InspectionDetail),
        (status = 400, description = "Invalid checklist or inactive vehicle", body = crate::error::ErrorResponse),
        (status = 404, description = "Vehicle or trailer not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Report generation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_inspection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateInspection>,
) -> AppResult<(StatusCode, Json<InspectionDetail>)> {
    claims.require_write_inspections()?;
    let detail = state.services.inspections.submit(&data).await?;
    tracing::info!(
        "Inspection {} submitted by {} for vehicle {}",
        detail.inspection.id,
        claims.sub,
        detail.inspection.vehicle_id
    );
    Ok((StatusCode::CREATED, Json(detail)))
}
