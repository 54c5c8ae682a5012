//! Company model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Transport company owning vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Company {
    pub id: i32,
    pub name: String,
    /// Tax identifier (RUT)
    pub rut: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create company request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 3, max = 20, message = "RUT must be 3-20 characters"))]
    pub rut: String,
}
