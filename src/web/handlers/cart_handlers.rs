// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::cart::policy;
use crate::cart::pricing::{build_cart_view, Currency, RequestCtx};
use crate::cart::store::AddOutcome;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct CurrencyQuery {
  pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddToCartPayload {
  pub variant: i64,
  pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityPayload {
  pub quantity: i32,
}

fn request_ctx(app_state: &AppState, auth_user: &AuthenticatedUser, currency: Option<&str>) -> RequestCtx {
  RequestCtx {
    user_id: auth_user.user_id,
    currency: Currency::from_param(currency),
    base_url: app_state.config.app_base_url.clone(),
  }
}

#[instrument(name = "handler::get_cart", skip(app_state, query, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  query: web::Query<CurrencyQuery>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let ctx = request_ctx(&app_state, &auth_user, query.currency.as_deref());
  let (cart, lines) = app_state.cart_store.fetch_cart(auth_user.user_id).await?;
  let view = build_cart_view(cart.id, &lines, &ctx);
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, payload, auth_user),
  fields(user_id = %auth_user.user_id, variant = %payload.variant, quantity = %payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddToCartPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  // Bounds-checked before any store access.
  policy::validate_requested_quantity(payload.quantity)?;

  let outcome = app_state
    .cart_store
    .add_item(auth_user.user_id, payload.variant, payload.quantity)
    .await?;

  // Created vs merged differ only by status, not payload.
  let body = json!({ "detail": "Товар добавлен в корзину" });
  Ok(match outcome {
    AddOutcome::Created => HttpResponse::Created().json(body),
    AddOutcome::Merged => HttpResponse::Ok().json(body),
  })
}

#[instrument(
  name = "handler::update_cart_item",
  skip(app_state, payload, auth_user),
  fields(user_id = %auth_user.user_id, item_id = %item_id)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  item_id: web::Path<i64>,
  payload: web::Json<UpdateQuantityPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  policy::validate_requested_quantity(payload.quantity)?;

  app_state
    .cart_store
    .update_item(auth_user.user_id, item_id.into_inner(), payload.quantity)
    .await?;

  Ok(HttpResponse::Ok().json(json!({ "detail": "Количество обновлено" })))
}

#[instrument(
  name = "handler::delete_cart_item",
  skip(app_state, auth_user),
  fields(user_id = %auth_user.user_id, item_id = %item_id)
)]
pub async fn delete_cart_item_handler(
  app_state: web::Data<AppState>,
  item_id: web::Path<i64>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state
    .cart_store
    .remove_item(auth_user.user_id, item_id.into_inner())
    .await?;
  Ok(HttpResponse::NoContent().finish())
}
