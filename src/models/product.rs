// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
  pub id: i64,
  pub name: String,
  /// 'M' / 'F'
  pub gender: String,
  pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubCategory {
  pub id: i64,
  pub category_id: i64,
  pub name: String,
  /// 'standard' (XXS..XXL) / 'uni'
  pub size_model: String,
  pub cover_image: Option<String>,
  pub show_on_main: bool,
  pub is_material: bool,
  pub description: String,
  pub sort_order: i32,
}

/// Prices are stored per supported currency as integer amounts; there is no
/// live conversion anywhere in the system.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub subcategory_id: i64,
  pub name: String,
  pub description: String,
  pub material: String,
  pub price_rub: i64,
  pub price_kzt: i64,
  pub price_byn: i64,
  pub is_visible: bool,
  pub main_image: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductImage {
  pub id: i64,
  #[serde(skip_serializing)]
  pub product_id: i64,
  pub image: String,
  pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductVariant {
  pub id: i64,
  #[serde(skip_serializing)]
  pub product_id: i64,
  pub color_name: String,
  pub color_hex: String,
  pub size: String,
  pub stock: i32,
}
