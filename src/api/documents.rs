//! Compliance document endpoints (append-only)

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::document::{CreateDocument, Document, DocumentQuery, DocumentWithStatus},
};

use super::AuthenticatedUser;

/// List documents with their expiry status
#[utoipa::path(
    get,
    path = "/documents",
    tag = "documents",
    security(("bearer_auth" = [])),
    params(DocumentQuery),
    responses(
        (status = 200, description = "Documents, nearest expiry first", body = Vec<DocumentWithStatus>),
        (status = 400, description = "Unknown status code", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_documents(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<DocumentQuery>,
) -> AppResult<Json<Vec<DocumentWithStatus>>> {
    claims.require_read_fleet()?;
    let documents = state.services.documents.list(&query).await?;
    Ok(Json(documents))
}

/// Attach a document to a vehicle, trailer or driver
#[utoipa::path(
    post,
    path = "/documents",
    tag = "documents",
    security(("bearer_auth" = [])),
    request_body = CreateDocument,
    responses(
        (status = 201, description = "Document attached", body = Document),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Owner not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_document(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<Document>)> {
    claims.require_write_fleet()?;
    let document = state.services.documents.create(&data).await?;
    Ok((StatusCode::CREATED, Json(document)))
}
