// src/web/auth.rs

//! Bearer-token request authentication.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::services::auth;
use crate::state::AppState;

/// Identity extracted from the `Authorization` header. The token itself is
/// kept so logout can revoke exactly the credential that was presented.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: i64,
  pub token: String,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, AppError>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let header_value = req
      .headers()
      .get(header::AUTHORIZATION)
      .and_then(|h| h.to_str().ok())
      .map(str::to_owned);

    Box::pin(async move {
      let state =
        state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

      let token = header_value
        .as_deref()
        .map(str::trim)
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("Token ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

      let token = match token {
        Some(t) => t,
        None => {
          warn!("Missing or malformed Authorization header.");
          return Err(AppError::Auth("Требуется аутентификация".to_string()));
        }
      };

      match auth::resolve_token(&state.db_pool, &token).await? {
        Some(user_id) => Ok(AuthenticatedUser { user_id, token }),
        None => Err(AppError::Auth("Требуется аутентификация".to_string())),
      }
    })
  }
}
