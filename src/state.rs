// src/state.rs

use crate::cart::store::CartStore;
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  /// Cart data access behind a trait so cart logic is testable without Postgres.
  pub cart_store: Arc<dyn CartStore>,
  pub config: Arc<AppConfig>,
}
