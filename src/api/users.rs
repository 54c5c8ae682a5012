//! Staff user administration

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{error::AppResult, models::user::CreateUser};

use super::{auth::UserInfo, AuthenticatedUser};

/// List staff users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Staff users", body = Vec<UserInfo>),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    claims.require_write_users()?;
    let users = state.services.auth.list_users().await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

/// Create a staff user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse),
        (status = 409, description = "Login already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    claims.require_write_users()?;
    data.validate()?;
    let user = state.services.auth.create_user(&data).await?;
    tracing::info!("User {} created by {}", user.login, claims.sub);
    Ok((StatusCode::CREATED, Json(user.into())))
}
