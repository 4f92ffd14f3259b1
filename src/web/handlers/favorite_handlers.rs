// src/web/handlers/favorite_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::cart::pricing::Currency;
use crate::errors::AppError;
use crate::services::favorites;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct TogglePayload {
  pub product_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
  pub currency: Option<String>,
}

#[instrument(
  name = "handler::toggle_favorite",
  skip(app_state, payload, auth_user),
  fields(user_id = %auth_user.user_id, product_id = %payload.product_id)
)]
pub async fn toggle_favorite_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<TogglePayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let favorite = favorites::toggle(&app_state.db_pool, auth_user.user_id, payload.product_id).await?;
  Ok(HttpResponse::Ok().json(json!({
    "product_id": payload.product_id,
    "favorite": favorite
  })))
}

#[instrument(
  name = "handler::delete_favorite",
  skip(app_state, auth_user),
  fields(user_id = %auth_user.user_id, product_id = %product_id)
)]
pub async fn delete_favorite_handler(
  app_state: web::Data<AppState>,
  product_id: web::Path<i64>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  favorites::remove(&app_state.db_pool, auth_user.user_id, product_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[instrument(name = "handler::list_favorites", skip(app_state, query, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_favorites_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListQuery>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let data = favorites::list(
    &app_state.db_pool,
    auth_user.user_id,
    Currency::from_param(query.currency.as_deref()),
    &app_state.config.app_base_url,
  )
  .await?;
  Ok(HttpResponse::Ok().json(json!({ "data": data })))
}
