// src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One cart per user, created lazily on first access and removed with the
/// user. Line items live in `cart_items` and are owned exclusively by the
/// cart (cascade delete).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cart {
  pub id: i64,
  #[serde(skip_serializing)]
  pub user_id: i64,
  #[serde(skip_serializing)]
  pub created_at: DateTime<Utc>,
}
