// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::models::{User, UserProfile};
use crate::services::{auth, users};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserView {
  #[serde(flatten)]
  pub user: User,
  pub profile: UserProfile,
}

#[instrument(name = "handler::register", skip(app_state, payload))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<users::RegisterRequest>,
) -> Result<HttpResponse, AppError> {
  let user = users::register(&app_state.db_pool, payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(user))
}

#[instrument(name = "handler::login", skip(app_state, payload), fields(username = %payload.username))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let user = users::authenticate(&app_state.db_pool, &payload.username, &payload.password).await?;
  let token = auth::issue_token(&app_state.db_pool, user.id).await?;
  Ok(HttpResponse::Ok().json(json!({ "token": token })))
}

#[instrument(name = "handler::logout", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn logout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth::revoke_token(&app_state.db_pool, &auth_user.token).await?;
  Ok(HttpResponse::Ok().json(json!({ "detail": "Выход из аккаунта выполнен успешно" })))
}

#[instrument(name = "handler::me", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (user, profile) = users::fetch_with_profile(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(UserView { user, profile }))
}
