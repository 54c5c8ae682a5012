//! Authentication: login, JWT issuance and the bootstrap admin account

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, User, UserClaims},
    },
    repository::Repository,
};

const GENERATED_PASSWORD_LEN: usize = 20;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by login and password, returning a JWT and the user
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !verify_password(&user.password_hash, password)? {
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.login);
        Ok((token, user))
    }

    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            role: user.role,
            rights: user.role.into(),
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        let hash = hash_password(&data.password)?;
        self.repository
            .users
            .create(&data.login, &hash, data.full_name.as_deref(), data.role)
            .await
    }

    /// Create the admin account when no user exists. Without a configured
    /// password a random one is generated and logged once.
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<Option<User>> {
        if self.repository.users.count().await? > 0 {
            return Ok(None);
        }

        let (password, generated) = match self.config.bootstrap_admin_password.as_deref() {
            Some(p) if !p.is_empty() => (p.to_string(), false),
            _ => (
                rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(GENERATED_PASSWORD_LEN)
                    .map(char::from)
                    .collect::<String>(),
                true,
            ),
        };

        let user = self
            .create_user(&CreateUser {
                login: self.config.bootstrap_admin_login.clone(),
                password: password.clone(),
                full_name: Some("Administrator".to_string()),
                role: Role::Admin,
            })
            .await?;

        if generated {
            tracing::warn!(
                "Created bootstrap admin '{}' with generated password: {}",
                user.login,
                password
            );
        } else {
            tracing::info!("Created bootstrap admin '{}'", user.login);
        }
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "correct horse").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("not-a-hash", "x").is_err());
    }
}
