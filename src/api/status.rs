//! Fleet status dashboard

use axum::{extract::State, Json};

use crate::{error::AppResult, models::fleet::FleetStatusEntry};

use super::AuthenticatedUser;

/// Status of every active vehicle and its assigned trailer
#[utoipa::path(
    get,
    path = "/status/vehicles",
    tag = "status",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One entry per active vehicle, ordered by plate", body = Vec<FleetStatusEntry>)
    )
)]
pub async fn fleet_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<FleetStatusEntry>>> {
    claims.require_read_fleet()?;
    let entries = state.services.fleet.dashboard().await?;
    Ok(Json(entries))
}
