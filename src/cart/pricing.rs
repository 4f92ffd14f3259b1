// src/cart/pricing.rs

//! Currency selection and cart pricing. Totals are recomputed from live
//! stock/visibility on every read and never persisted, so a cart response
//! can never show a stale total.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
  Rub,
  Kzt,
  Byn,
}

impl Currency {
  /// Parses a `?currency=` query value; anything unrecognized silently
  /// falls back to rubles.
  pub fn from_param(param: Option<&str>) -> Self {
    match param {
      Some("kzt") => Currency::Kzt,
      Some("byn") => Currency::Byn,
      _ => Currency::Rub,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Currency::Rub => "rub",
      Currency::Kzt => "kzt",
      Currency::Byn => "byn",
    }
  }
}

/// Request-scoped context threaded explicitly through listing and pricing
/// instead of being looked up ambiently.
#[derive(Debug, Clone)]
pub struct RequestCtx {
  pub user_id: i64,
  pub currency: Currency,
  pub base_url: String,
}

impl RequestCtx {
  /// Absolute URL for a stored media path.
  pub fn media_url(&self, path: &str) -> String {
    format!("{}/media/{}", self.base_url.trim_end_matches('/'), path)
  }
}

/// One cart line joined with its variant and product, as loaded by the store.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
  pub item_id: i64,
  pub variant_id: i64,
  pub quantity: i32,
  pub product_id: i64,
  pub product_name: String,
  pub color_name: String,
  pub size: String,
  pub price_rub: i64,
  pub price_kzt: i64,
  pub price_byn: i64,
  pub is_visible: bool,
  pub stock: i32,
  pub main_image: Option<String>,
}

impl CartLine {
  pub fn unit_price(&self, currency: Currency) -> i64 {
    match currency {
      Currency::Rub => self.price_rub,
      Currency::Kzt => self.price_kzt,
      Currency::Byn => self.price_byn,
    }
  }

  /// Availability is computed, never stored.
  pub fn is_available(&self) -> bool {
    self.is_visible && self.stock > 0
  }

  pub fn availability_message(&self) -> Option<&'static str> {
    if !self.is_visible {
      return Some("Товар на текущий момент недоступен");
    }
    if self.stock <= 0 {
      return Some("Товар закончился на складе");
    }
    None
  }

  /// Unavailable items contribute nothing to totals but stay listed.
  pub fn line_total(&self, currency: Currency) -> i64 {
    if !self.is_available() {
      return 0;
    }
    self.unit_price(currency) * self.quantity as i64
  }
}

#[derive(Debug, Serialize)]
pub struct CartItemView {
  pub id: i64,
  pub variant: i64,
  pub product_id: i64,
  pub product_name: String,
  pub product_price: i64,
  pub product_image_url: Option<String>,
  pub color: String,
  pub size: String,
  pub quantity: i32,
  pub total_price: i64,
  pub is_available: bool,
  pub availability_message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CartView {
  pub id: i64,
  pub items: Vec<CartItemView>,
  pub total_price: i64,
}

/// Renders the cart for the selected currency. `lines` must already be
/// ordered by item id (insertion order).
pub fn build_cart_view(cart_id: i64, lines: &[CartLine], ctx: &RequestCtx) -> CartView {
  let items: Vec<CartItemView> = lines
    .iter()
    .map(|line| CartItemView {
      id: line.item_id,
      variant: line.variant_id,
      product_id: line.product_id,
      product_name: line.product_name.clone(),
      product_price: line.unit_price(ctx.currency),
      product_image_url: line.main_image.as_deref().map(|p| ctx.media_url(p)),
      color: line.color_name.clone(),
      size: line.size.clone(),
      quantity: line.quantity,
      total_price: line.line_total(ctx.currency),
      is_available: line.is_available(),
      availability_message: line.availability_message(),
    })
    .collect();

  let total_price = lines.iter().map(|l| l.line_total(ctx.currency)).sum();

  CartView {
    id: cart_id,
    items,
    total_price,
  }
}
