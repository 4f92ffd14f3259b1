// src/services/users.rs

//! Registration and account lookup. Profile creation is an explicit step of
//! the registration transaction, not a hidden side effect.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::models::{User, UserProfile};
use crate::services::auth;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 24;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
  pub username: String,
  pub email: String,
  pub password: String,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
}

fn validate_registration(req: &RegisterRequest) -> Result<()> {
  if req.username.trim().is_empty() {
    return Err(AppError::InvalidInput("Имя пользователя обязательно".to_string()));
  }
  if !req.email.contains('@') {
    return Err(AppError::InvalidInput("Некорректный email".to_string()));
  }
  let len = req.password.chars().count();
  if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
    return Err(AppError::InvalidInput(format!(
      "Пароль должен быть от {} до {} символов",
      MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
    )));
  }
  Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  err
    .as_database_error()
    .and_then(|db| db.code())
    .map(|code| code == "23505")
    .unwrap_or(false)
}

/// Creates the user and their empty profile in one transaction.
#[instrument(name = "users::register", skip(pool, req), fields(username = %req.username))]
pub async fn register(pool: &PgPool, req: RegisterRequest) -> Result<User> {
  validate_registration(&req)?;
  let password_hash = auth::hash_password(&req.password)?;

  let mut tx = pool.begin().await?;

  let user = sqlx::query_as::<_, User>(
    r#"
    INSERT INTO users (username, email, password_hash, first_name, last_name)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, username, email, password_hash, first_name, last_name, created_at
    "#,
  )
  .bind(&req.username)
  .bind(&req.email)
  .bind(&password_hash)
  .bind(&req.first_name)
  .bind(&req.last_name)
  .fetch_one(&mut *tx)
  .await
  .map_err(|e| {
    if is_unique_violation(&e) {
      AppError::InvalidInput("Пользователь с таким именем или email уже существует".to_string())
    } else {
      AppError::Sqlx(e)
    }
  })?;

  sqlx::query("INSERT INTO user_profiles (user_id) VALUES ($1)")
    .bind(user.id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;
  info!(user_id = user.id, "User registered");
  Ok(user)
}

/// Verifies credentials and returns the user on success.
#[instrument(name = "users::authenticate", skip(pool, password))]
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User> {
  let user = sqlx::query_as::<_, User>(
    "SELECT id, username, email, password_hash, first_name, last_name, created_at FROM users WHERE username = $1",
  )
  .bind(username)
  .fetch_optional(pool)
  .await?;

  let invalid = || AppError::Auth("Неверное имя пользователя или пароль".to_string());
  let user = user.ok_or_else(invalid)?;

  if !auth::verify_password(&user.password_hash, password)? {
    return Err(invalid());
  }
  Ok(user)
}

pub async fn fetch_with_profile(pool: &PgPool, user_id: i64) -> Result<(User, UserProfile)> {
  let user = sqlx::query_as::<_, User>(
    "SELECT id, username, email, password_hash, first_name, last_name, created_at FROM users WHERE id = $1",
  )
  .bind(user_id)
  .fetch_one(pool)
  .await?;

  let profile = sqlx::query_as::<_, UserProfile>(
    "SELECT id, user_id, phone, tg_username, address FROM user_profiles WHERE user_id = $1",
  )
  .bind(user_id)
  .fetch_one(pool)
  .await?;

  Ok((user, profile))
}
