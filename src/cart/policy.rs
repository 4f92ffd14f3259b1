// src/cart/policy.rs

//! Business rules for cart mutations. Pure functions over plain state so the
//! same checks back both the Postgres store and test doubles.

use crate::errors::{AppError, Result};

/// Per-variant cap: at most this many units of one variant in a cart,
/// independent of stock.
pub const MAX_QUANTITY_PER_VARIANT: i32 = 5;

/// Per-request quantity bounds, checked before any store access.
pub const MIN_REQUEST_QUANTITY: i32 = 1;
pub const MAX_REQUEST_QUANTITY: i32 = 100;

/// Live catalog state a cart decision depends on. Stock is mutable external
/// state, so callers must pass a fresh snapshot at every mutation.
#[derive(Debug, Clone, Copy)]
pub struct VariantState {
  pub stock: i32,
  pub product_visible: bool,
}

/// Bounds check on the client-supplied quantity (1..=100).
pub fn validate_requested_quantity(quantity: i32) -> Result<()> {
  if !(MIN_REQUEST_QUANTITY..=MAX_REQUEST_QUANTITY).contains(&quantity) {
    return Err(AppError::InvalidInput(format!(
      "Количество должно быть от {} до {}",
      MIN_REQUEST_QUANTITY, MAX_REQUEST_QUANTITY
    )));
  }
  Ok(())
}

/// A variant can only be added while its product is visible and it has stock.
pub fn check_variant_available(variant: VariantState) -> Result<()> {
  if !variant.product_visible {
    return Err(AppError::InvalidState("Товар недоступен".to_string()));
  }
  if variant.stock <= 0 {
    return Err(AppError::InvalidState("Товар закончился на складе".to_string()));
  }
  Ok(())
}

/// Validates the quantity a line item would end up with after a mutation.
/// The cap is checked before stock, so the cap message wins when both are
/// violated.
pub fn check_target_quantity(target: i32, variant: VariantState) -> Result<()> {
  if target > MAX_QUANTITY_PER_VARIANT {
    return Err(AppError::InvalidState(format!(
      "Максимум {} единиц товара",
      MAX_QUANTITY_PER_VARIANT
    )));
  }
  if target > variant.stock {
    return Err(AppError::InvalidState("Превышен остаток на складе".to_string()));
  }
  Ok(())
}
