//! Staff user model, roles and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::Role;
use crate::error::AppError;

/// Rights levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rights {
    None = 0,
    Read = 1,
    Write = 2,
}

/// Staff user as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create staff user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub full_name: Option<String>,
    pub role: Role,
}

/// Rights derived from a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRights {
    pub fleet_rights: Rights,
    pub inspections_rights: Rights,
    pub users_rights: Rights,
}

impl From<Role> for UserRights {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                fleet_rights: Rights::Write,
                inspections_rights: Rights::Write,
                users_rights: Rights::Write,
            },
            Role::Inspector => Self {
                fleet_rights: Rights::Read,
                inspections_rights: Rights::Write,
                users_rights: Rights::None,
            },
            Role::Viewer => Self {
                fleet_rights: Rights::Read,
                inspections_rights: Rights::Read,
                users_rights: Rights::None,
            },
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub rights: UserRights,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Decode and validate a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    fn require(&self, have: Rights, need: Rights, what: &str) -> Result<(), AppError> {
        if have >= need {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("Insufficient rights to {}", what)))
        }
    }

    // Authorization checks
    pub fn require_read_fleet(&self) -> Result<(), AppError> {
        self.require(self.rights.fleet_rights, Rights::Read, "read fleet data")
    }

    pub fn require_write_fleet(&self) -> Result<(), AppError> {
        self.require(self.rights.fleet_rights, Rights::Write, "modify fleet data")
    }

    pub fn require_read_inspections(&self) -> Result<(), AppError> {
        self.require(self.rights.inspections_rights, Rights::Read, "read inspections")
    }

    pub fn require_write_inspections(&self) -> Result<(), AppError> {
        self.require(self.rights.inspections_rights, Rights::Write, "submit inspections")
    }

    pub fn require_write_users(&self) -> Result<(), AppError> {
        self.require(self.rights.users_rights, Rights::Write, "manage users")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> UserClaims {
        UserClaims {
            sub: "tester".to_string(),
            user_id: 1,
            role,
            rights: role.into(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_inspector_rights() {
        let c = claims(Role::Inspector);
        assert!(c.require_read_fleet().is_ok());
        assert!(c.require_write_inspections().is_ok());
        assert!(c.require_write_fleet().is_err());
        assert!(c.require_write_users().is_err());
    }

    #[test]
    fn test_viewer_is_read_only() {
        let c = claims(Role::Viewer);
        assert!(c.require_read_inspections().is_ok());
        assert!(c.require_write_inspections().is_err());
    }

    #[test]
    fn test_token_round_trip() {
        let c = claims(Role::Admin);
        let token = c.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 1);
        assert_eq!(decoded.role, Role::Admin);
        assert!(UserClaims::from_token(&token, "other").is_err());
    }
}
