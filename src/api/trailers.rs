//! Trailer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::trailer::{CreateTrailer, Trailer, TrailerDetail, TrailerSummary, UpdateTrailer},
    status::ChannelStatus,
};

use super::AuthenticatedUser;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TrailerQuery {
    pub include_inactive: Option<bool>,
}

/// List trailers
#[utoipa::path(
    get,
    path = "/trailers",
    tag = "trailers",
    security(("bearer_auth" = [])),
    params(TrailerQuery),
    responses(
        (status = 200, description = "Trailers", body = Vec<Trailer>)
    )
)]
pub async fn list_trailers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<TrailerQuery>,
) -> AppResult<Json<Vec<Trailer>>> {
    claims.require_read_fleet()?;
    let trailers = state
        .services
        .trailers
        .list(query.include_inactive.unwrap_or(false))
        .await?;
    Ok(Json(trailers))
}

/// Get trailer detail
#[utoipa::path(
    get,
    path = "/trailers/{id}",
    tag = "trailers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Trailer ID")),
    responses(
        (status = 200, description = "Trailer with maintenance, documents and towing vehicle", body = TrailerDetail),
        (status = 404, description = "Trailer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_trailer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<TrailerDetail>> {
    claims.require_read_fleet()?;
    let detail = state.services.trailers.get_detail(id).await?;
    Ok(Json(detail))
}

/// Register a trailer
#[utoipa::path(
    post,
    path = "/trailers",
    tag = "trailers",
    security(("bearer_auth" = [])),
    request_body = CreateTrailer,
    responses(
        (status = 201, description = "Trailer created", body = Trailer),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate plate", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_trailer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateTrailer>,
) -> AppResult<(StatusCode, Json<Trailer>)> {
    claims.require_write_fleet()?;
    let trailer = state.services.trailers.create(&data).await?;
    Ok((StatusCode::CREATED, Json(trailer)))
}

/// Update a trailer
#[utoipa::path(
    put,
    path = "/trailers/{id}",
    tag = "trailers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Trailer ID")),
    request_body = UpdateTrailer,
    responses(
        (status = 200, description = "Trailer updated", body = Trailer),
        (status = 404, description = "Trailer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_trailer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateTrailer>,
) -> AppResult<Json<Trailer>> {
    claims.require_write_fleet()?;
    let trailer = state.services.trailers.update(id, &data).await?;
    Ok(Json(trailer))
}

/// Compact summary for dashboard cards
#[utoipa::path(
    get,
    path = "/trailers/{id}/summary",
    tag = "trailers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Trailer ID")),
    responses(
        (status = 200, description = "Trailer summary", body = TrailerSummary),
        (status = 404, description = "Trailer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_trailer_summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<TrailerSummary>> {
    claims.require_read_fleet()?;
    let summary = state.services.trailers.summary(id).await?;
    Ok(Json(summary))
}

/// Combined maintenance and document status of a trailer
#[utoipa::path(
    get,
    path = "/trailers/{id}/status",
    tag = "trailers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Trailer ID")),
    responses(
        (status = 200, description = "Trailer status", body = ChannelStatus),
        (status = 404, description = "Trailer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_trailer_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ChannelStatus>> {
    claims.require_read_fleet()?;
    let status = state.services.fleet.trailer_status(id).await?;
    Ok(Json(status))
}
