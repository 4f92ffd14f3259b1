// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub first_name: String,
  pub last_name: String,
  #[serde(skip_serializing)]
  pub created_at: DateTime<Utc>,
}

/// 1:1 companion row created together with the user, in the same transaction.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
  #[serde(skip_serializing)]
  pub id: i64,
  #[serde(skip_serializing)]
  pub user_id: i64,
  pub phone: String,
  pub tg_username: String,
  pub address: String,
}
