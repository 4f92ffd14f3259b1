// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use norde_maison::cart::policy::{self, VariantState};
use norde_maison::cart::pricing::CartLine;
use norde_maison::cart::store::{AddOutcome, CartStore};
use norde_maison::errors::{AppError, Result};
use norde_maison::models::Cart;

/// Catalog state the in-memory store serves. Mutable so tests can simulate
/// stock/visibility changing between requests.
#[derive(Debug, Clone)]
pub struct MemVariant {
  pub id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub color_name: String,
  pub size: String,
  pub price_rub: i64,
  pub price_kzt: i64,
  pub price_byn: i64,
  pub is_visible: bool,
  pub stock: i32,
}

impl MemVariant {
  fn state(&self) -> VariantState {
    VariantState {
      stock: self.stock,
      product_visible: self.is_visible,
    }
  }
}

#[derive(Debug, Clone)]
struct MemItem {
  id: i64,
  cart_id: i64,
  variant_id: i64,
  quantity: i32,
}

#[derive(Default)]
struct Inner {
  variants: HashMap<i64, MemVariant>,
  carts: HashMap<i64, i64>, // user_id -> cart_id
  items: Vec<MemItem>,
  next_id: i64,
}

impl Inner {
  fn next_id(&mut self) -> i64 {
    self.next_id += 1;
    self.next_id
  }

  fn get_or_create_cart(&mut self, user_id: i64) -> i64 {
    if let Some(&cart_id) = self.carts.get(&user_id) {
      return cart_id;
    }
    let cart_id = self.next_id();
    self.carts.insert(user_id, cart_id);
    cart_id
  }
}

/// In-memory `CartStore` sharing the same policy checks as the Postgres
/// implementation, so store-level semantics can be exercised without a
/// database.
#[derive(Default)]
pub struct MemCartStore {
  inner: Mutex<Inner>,
}

impl MemCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert_variant(&self, variant: MemVariant) {
    self.inner.lock().unwrap().variants.insert(variant.id, variant);
  }

  pub fn set_stock(&self, variant_id: i64, stock: i32) {
    let mut inner = self.inner.lock().unwrap();
    inner.variants.get_mut(&variant_id).unwrap().stock = stock;
  }

  pub fn set_visibility(&self, variant_id: i64, visible: bool) {
    let mut inner = self.inner.lock().unwrap();
    inner.variants.get_mut(&variant_id).unwrap().is_visible = visible;
  }

  /// Stored quantity for a (user, variant) pair, if a line item exists.
  pub fn quantity_of(&self, user_id: i64, variant_id: i64) -> Option<i32> {
    let inner = self.inner.lock().unwrap();
    let cart_id = *inner.carts.get(&user_id)?;
    inner
      .items
      .iter()
      .find(|i| i.cart_id == cart_id && i.variant_id == variant_id)
      .map(|i| i.quantity)
  }

  /// Number of stored rows for a (user, variant) pair; the uniqueness
  /// invariant says this is never more than 1.
  pub fn row_count(&self, user_id: i64, variant_id: i64) -> usize {
    let inner = self.inner.lock().unwrap();
    match inner.carts.get(&user_id) {
      Some(&cart_id) => inner
        .items
        .iter()
        .filter(|i| i.cart_id == cart_id && i.variant_id == variant_id)
        .count(),
      None => 0,
    }
  }

  pub fn item_id_of(&self, user_id: i64, variant_id: i64) -> Option<i64> {
    let inner = self.inner.lock().unwrap();
    let cart_id = *inner.carts.get(&user_id)?;
    inner
      .items
      .iter()
      .find(|i| i.cart_id == cart_id && i.variant_id == variant_id)
      .map(|i| i.id)
  }
}

#[async_trait]
impl CartStore for MemCartStore {
  async fn fetch_cart(&self, user_id: i64) -> Result<(Cart, Vec<CartLine>)> {
    let mut inner = self.inner.lock().unwrap();
    let cart_id = inner.get_or_create_cart(user_id);

    let mut lines: Vec<CartLine> = inner
      .items
      .iter()
      .filter(|i| i.cart_id == cart_id)
      .map(|item| {
        let v = &inner.variants[&item.variant_id];
        CartLine {
          item_id: item.id,
          variant_id: v.id,
          quantity: item.quantity,
          product_id: v.product_id,
          product_name: v.product_name.clone(),
          color_name: v.color_name.clone(),
          size: v.size.clone(),
          price_rub: v.price_rub,
          price_kzt: v.price_kzt,
          price_byn: v.price_byn,
          is_visible: v.is_visible,
          stock: v.stock,
          main_image: None,
        }
      })
      .collect();
    lines.sort_by_key(|l| l.item_id);

    let cart = Cart {
      id: cart_id,
      user_id,
      created_at: chrono::Utc::now(),
    };
    Ok((cart, lines))
  }

  async fn add_item(&self, user_id: i64, variant_id: i64, quantity: i32) -> Result<AddOutcome> {
    let mut inner = self.inner.lock().unwrap();

    let variant = inner
      .variants
      .get(&variant_id)
      .cloned()
      .ok_or_else(|| AppError::NotFound("Товар не найден".to_string()))?;
    policy::check_variant_available(variant.state())?;

    let cart_id = inner.get_or_create_cart(user_id);
    let existing = inner
      .items
      .iter()
      .position(|i| i.cart_id == cart_id && i.variant_id == variant_id);

    let target = match existing {
      Some(idx) => inner.items[idx].quantity + quantity,
      None => quantity,
    };
    // Checked before any write, mirroring the transactional rollback of the
    // Postgres store: a rejected add leaves the stored quantity unchanged.
    policy::check_target_quantity(target, variant.state())?;

    match existing {
      Some(idx) => {
        inner.items[idx].quantity = target;
        Ok(AddOutcome::Merged)
      }
      None => {
        let id = inner.next_id();
        inner.items.push(MemItem {
          id,
          cart_id,
          variant_id,
          quantity: target,
        });
        Ok(AddOutcome::Created)
      }
    }
  }

  async fn update_item(&self, user_id: i64, item_id: i64, quantity: i32) -> Result<()> {
    let mut inner = self.inner.lock().unwrap();

    let cart_id = inner.carts.get(&user_id).copied();
    let idx = inner
      .items
      .iter()
      .position(|i| Some(i.cart_id) == cart_id && i.id == item_id)
      .ok_or_else(|| AppError::NotFound("Позиция корзины не найдена".to_string()))?;

    let variant = inner.variants[&inner.items[idx].variant_id].clone();
    policy::check_target_quantity(quantity, variant.state())?;

    inner.items[idx].quantity = quantity;
    Ok(())
  }

  async fn remove_item(&self, user_id: i64, item_id: i64) -> Result<()> {
    let mut inner = self.inner.lock().unwrap();

    let cart_id = inner.carts.get(&user_id).copied();
    let idx = inner
      .items
      .iter()
      .position(|i| Some(i.cart_id) == cart_id && i.id == item_id)
      .ok_or_else(|| AppError::NotFound("Позиция корзины не найдена".to_string()))?;

    inner.items.remove(idx);
    Ok(())
  }
}

pub fn coat_variant(id: i64, stock: i32) -> MemVariant {
  MemVariant {
    id,
    product_id: 100 + id,
    product_name: "Пальто".to_string(),
    color_name: "Серый".to_string(),
    size: "M".to_string(),
    price_rub: 1000,
    price_kzt: 5500,
    price_byn: 35,
    is_visible: true,
    stock,
  }
}
