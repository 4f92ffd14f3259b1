// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  /// Malformed request data: quantity out of bounds, bad field values.
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  /// The request is well-formed but the catalog state forbids it
  /// (hidden product, out of stock, over the per-variant cap).
  #[error("Invalid state: {0}")]
  InvalidState(String),

  /// Unknown resource, or a resource owned by another user. The response is
  /// identical in both cases so existence leaks nothing across users.
  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Authentication failed: {0}")]
  Auth(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal server error: {0}")]
  Internal(String),
}

// Handlers occasionally use `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      return AppError::Sqlx(err.downcast::<sqlx::Error>().unwrap());
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::InvalidInput(m) | AppError::InvalidState(m) => {
        HttpResponse::BadRequest().json(json!({ "detail": m }))
      }
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({ "detail": m })),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({ "detail": m })),
      // Never expose database or configuration details to clients.
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => {
        HttpResponse::InternalServerError().json(json!({ "detail": "Внутренняя ошибка сервера" }))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
