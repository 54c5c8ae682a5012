//! Tractor-trailer assignment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::assignment::{Assignment, AssignmentQuery, CreateAssignment},
};

use super::AuthenticatedUser;

/// List assignments
#[utoipa::path(
    get,
    path = "/assignments",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(AssignmentQuery),
    responses(
        (status = 200, description = "Assignments, newest first", body = Vec<Assignment>)
    )
)]
pub async fn list_assignments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<AssignmentQuery>,
) -> AppResult<Json<Vec<Assignment>>> {
    claims.require_read_fleet()?;
    let assignments = state.services.assignments.list(&query).await?;
    Ok(Json(assignments))
}

/// Get assignment by ID
#[utoipa::path(
    get,
    path = "/assignments/{id}",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment", body = Assignment),
        (status = 404, description = "Assignment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_assignment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Assignment>> {
    claims.require_read_fleet()?;
    let assignment = state.services.assignments.get_by_id(id).await?;
    Ok(Json(assignment))
}

/// Pair a tractor with a trailer
#[utoipa::path(
    post,
    path = "/assignments",
    tag = "assignments",
    security(("bearer_auth" = [])),
    request_body = CreateAssignment,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Tractor or trailer already in an active assignment", body = crate::error::ErrorResponse),
        (status = 404, description = "Vehicle or trailer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_assignment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateAssignment>,
) -> AppResult<(StatusCode, Json<Assignment>)> {
    claims.require_write_fleet()?;
    let assignment = state.services.assignments.create(&data).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Re-activate an ended assignment
#[utoipa::path(
    post,
    path = "/assignments/{id}/activate",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment active", body = Assignment),
        (status = 400, description = "Tractor or trailer already in an active assignment", body = crate::error::ErrorResponse),
        (status = 404, description = "Assignment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn activate_assignment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Assignment>> {
    claims.require_write_fleet()?;
    let assignment = state.services.assignments.activate(id).await?;
    Ok(Json(assignment))
}

/// End an assignment
#[utoipa::path(
    post,
    path = "/assignments/{id}/deactivate",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment ended", body = Assignment),
        (status = 404, description = "Assignment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn deactivate_assignment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Assignment>> {
    claims.require_write_fleet()?;
    let assignment = state.services.assignments.deactivate(id).await?;
    Ok(Json(assignment))
}
