// src/web/handlers/catalog_handlers.rs

//! Public catalog endpoints; no authentication required.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::pricing::Currency;
use crate::errors::AppError;
use crate::services::catalog;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
  pub currency: Option<String>,
}

#[instrument(name = "handler::list_categories", skip(app_state, query))]
pub async fn list_categories_handler(
  app_state: web::Data<AppState>,
  query: web::Query<catalog::CategoryFilters>,
) -> Result<HttpResponse, AppError> {
  let categories = catalog::list_categories(&app_state.db_pool, &query).await?;
  Ok(HttpResponse::Ok().json(categories))
}

#[instrument(name = "handler::list_subcategories", skip(app_state, query))]
pub async fn list_subcategories_handler(
  app_state: web::Data<AppState>,
  query: web::Query<catalog::SubCategoryFilters>,
) -> Result<HttpResponse, AppError> {
  let subcategories =
    catalog::list_subcategories(&app_state.db_pool, &query, &app_state.config.app_base_url).await?;
  Ok(HttpResponse::Ok().json(subcategories))
}

#[instrument(name = "handler::list_products", skip(app_state, query))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<catalog::ProductFilters>,
) -> Result<HttpResponse, AppError> {
  let page = catalog::list_products(&app_state.db_pool, &query, &app_state.config.app_base_url).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::product_detail", skip(app_state, query), fields(product_id = %product_id))]
pub async fn product_detail_handler(
  app_state: web::Data<AppState>,
  product_id: web::Path<i64>,
  query: web::Query<DetailQuery>,
) -> Result<HttpResponse, AppError> {
  let detail = catalog::product_detail(
    &app_state.db_pool,
    product_id.into_inner(),
    Currency::from_param(query.currency.as_deref()),
    &app_state.config.app_base_url,
  )
  .await?;
  Ok(HttpResponse::Ok().json(detail))
}
