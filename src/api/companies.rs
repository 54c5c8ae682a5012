//! Company endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::company::{Company, CreateCompany},
};

use super::AuthenticatedUser;

/// List companies
#[utoipa::path(
    get,
    path = "/companies",
    tag = "companies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Companies", body = Vec<Company>)
    )
)]
pub async fn list_companies(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Company>>> {
    claims.require_read_fleet()?;
    let companies = state.services.companies.list().await?;
    Ok(Json(companies))
}

/// Create a company
#[utoipa::path(
    post,
    path = "/companies",
    tag = "companies",
    security(("bearer_auth" = [])),
    request_body = CreateCompany,
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate company", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_company(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<Company>)> {
    claims.require_write_fleet()?;
    let company = state.services.companies.create(&data).await?;
    Ok((StatusCode::CREATED, Json(company)))
}
