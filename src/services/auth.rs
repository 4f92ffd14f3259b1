// src/services/auth.rs

//! Password hashing/verification and opaque bearer tokens.

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};

/// Hashes a plain-text password using Argon2 with a random salt.
#[instrument(name = "auth::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
  Ok(hash.to_string())
}

/// Verifies a plain-text password against a stored Argon2 hash.
#[instrument(name = "auth::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool> {
  let parsed = PasswordHash::new(stored_hash)
    .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => Err(AppError::Internal(format!("Password verification failed: {}", e))),
  }
}

/// Issues a fresh opaque token for a user and stores it.
#[instrument(name = "auth::issue_token", skip(pool))]
pub async fn issue_token(pool: &PgPool, user_id: i64) -> Result<String> {
  let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
  sqlx::query("INSERT INTO auth_tokens (token, user_id) VALUES ($1, $2)")
    .bind(&token)
    .bind(user_id)
    .execute(pool)
    .await?;
  debug!(user_id, "Issued auth token");
  Ok(token)
}

/// Resolves a bearer token to the owning user id.
pub async fn resolve_token(pool: &PgPool, token: &str) -> Result<Option<i64>> {
  let user_id: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM auth_tokens WHERE token = $1")
    .bind(token)
    .fetch_optional(pool)
    .await?;
  Ok(user_id.map(|(id,)| id))
}

/// Removes the presented token. Idempotent.
#[instrument(name = "auth::revoke_token", skip_all)]
pub async fn revoke_token(pool: &PgPool, token: &str) -> Result<()> {
  sqlx::query("DELETE FROM auth_tokens WHERE token = $1")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(())
}
