// src/cart/store.rs

//! Cart data access. The `CartStore` trait is the seam between HTTP handlers
//! and storage; `PgCartStore` is the Postgres implementation. Every mutation
//! runs inside one transaction, so a failed stock/cap check can never leave
//! a half-applied quantity behind.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use crate::cart::policy::{self, VariantState};
use crate::cart::pricing::CartLine;
use crate::errors::{AppError, Result};
use crate::models::Cart;

/// Whether an add created a new line item or merged into an existing one.
/// Clients see the difference only as 201 vs 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
  Created,
  Merged,
}

#[async_trait]
pub trait CartStore: Send + Sync {
  /// Returns the caller's cart (created lazily) with its line items joined
  /// with variant and product data, ordered by item id.
  async fn fetch_cart(&self, user_id: i64) -> Result<(Cart, Vec<CartLine>)>;

  /// Adds `quantity` of a variant to the caller's cart. Quantities for an
  /// already-present variant merge; the merged total is validated against
  /// live stock and the per-variant cap.
  async fn add_item(&self, user_id: i64, variant_id: i64, quantity: i32) -> Result<AddOutcome>;

  /// Sets the quantity of a line item owned by the caller.
  async fn update_item(&self, user_id: i64, item_id: i64, quantity: i32) -> Result<()>;

  /// Deletes a line item owned by the caller.
  async fn remove_item(&self, user_id: i64, item_id: i64) -> Result<()>;
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
  id: i64,
  stock: i32,
  is_visible: bool,
}

impl VariantRow {
  fn state(&self) -> VariantState {
    VariantState {
      stock: self.stock,
      product_visible: self.is_visible,
    }
  }
}

pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn find_variant(conn: &mut PgConnection, variant_id: i64) -> Result<Option<VariantRow>> {
    let row = sqlx::query_as::<_, VariantRow>(
      r#"
      SELECT pv.id, pv.stock, p.is_visible
      FROM product_variants pv
      JOIN products p ON p.id = pv.product_id
      WHERE pv.id = $1
      "#,
    )
    .bind(variant_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
  }

  /// Idempotent: the UNIQUE(user_id) constraint makes concurrent first
  /// accesses converge on the same row.
  async fn get_or_create_cart(conn: &mut PgConnection, user_id: i64) -> Result<Cart> {
    let inserted = sqlx::query_as::<_, Cart>(
      r#"
      INSERT INTO carts (user_id) VALUES ($1)
      ON CONFLICT (user_id) DO NOTHING
      RETURNING id, user_id, created_at
      "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(cart) = inserted {
      return Ok(cart);
    }

    let cart = sqlx::query_as::<_, Cart>("SELECT id, user_id, created_at FROM carts WHERE user_id = $1")
      .bind(user_id)
      .fetch_one(conn)
      .await?;
    Ok(cart)
  }

  async fn list_lines(conn: &mut PgConnection, cart_id: i64) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
      r#"
      SELECT ci.id AS item_id, ci.variant_id, ci.quantity,
             p.id AS product_id, p.name AS product_name,
             pv.color_name, pv.size,
             p.price_rub, p.price_kzt, p.price_byn,
             p.is_visible, pv.stock, p.main_image
      FROM cart_items ci
      JOIN product_variants pv ON pv.id = ci.variant_id
      JOIN products p ON p.id = pv.product_id
      WHERE ci.cart_id = $1
      ORDER BY ci.id
      "#,
    )
    .bind(cart_id)
    .fetch_all(conn)
    .await?;
    Ok(lines)
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  #[instrument(name = "cart_store::fetch_cart", skip(self))]
  async fn fetch_cart(&self, user_id: i64) -> Result<(Cart, Vec<CartLine>)> {
    let mut conn = self.pool.acquire().await?;
    let cart = Self::get_or_create_cart(&mut conn, user_id).await?;
    let lines = Self::list_lines(&mut conn, cart.id).await?;
    Ok((cart, lines))
  }

  #[instrument(name = "cart_store::add_item", skip(self))]
  async fn add_item(&self, user_id: i64, variant_id: i64, quantity: i32) -> Result<AddOutcome> {
    let mut tx = self.pool.begin().await?;

    let variant = Self::find_variant(&mut tx, variant_id)
      .await?
      .ok_or_else(|| AppError::NotFound("Товар не найден".to_string()))?;
    policy::check_variant_available(variant.state())?;

    let cart = Self::get_or_create_cart(&mut tx, user_id).await?;

    // Additive upsert: a concurrent insert that loses the race on the
    // (cart, variant) uniqueness constraint becomes an update, so two
    // concurrent adds can never produce duplicate rows.
    let (_item_id, target_quantity, created): (i64, i32, bool) = sqlx::query_as(
      r#"
      INSERT INTO cart_items (cart_id, variant_id, quantity)
      VALUES ($1, $2, $3)
      ON CONFLICT (cart_id, variant_id)
      DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
      RETURNING id, quantity, (xmax = 0) AS inserted
      "#,
    )
    .bind(cart.id)
    .bind(variant.id)
    .bind(quantity)
    .fetch_one(&mut *tx)
    .await?;

    // Validated after the merge; on error the transaction is dropped and
    // rolled back, leaving the stored quantity unchanged.
    policy::check_target_quantity(target_quantity, variant.state())?;

    tx.commit().await?;

    info!(user_id, variant_id, target_quantity, "Cart item upserted");
    Ok(if created { AddOutcome::Created } else { AddOutcome::Merged })
  }

  #[instrument(name = "cart_store::update_item", skip(self))]
  async fn update_item(&self, user_id: i64, item_id: i64, quantity: i32) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    // Scoped to the caller's cart: a foreign item id is indistinguishable
    // from a missing one.
    let row: Option<(i64, i32, bool)> = sqlx::query_as(
      r#"
      SELECT ci.id, pv.stock, p.is_visible
      FROM cart_items ci
      JOIN carts c ON c.id = ci.cart_id
      JOIN product_variants pv ON pv.id = ci.variant_id
      JOIN products p ON p.id = pv.product_id
      WHERE ci.id = $1 AND c.user_id = $2
      FOR UPDATE OF ci
      "#,
    )
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (id, stock, is_visible) =
      row.ok_or_else(|| AppError::NotFound("Позиция корзины не найдена".to_string()))?;

    policy::check_target_quantity(
      quantity,
      VariantState {
        stock,
        product_visible: is_visible,
      },
    )?;

    sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2")
      .bind(quantity)
      .bind(id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    info!(user_id, item_id, quantity, "Cart item quantity updated");
    Ok(())
  }

  #[instrument(name = "cart_store::remove_item", skip(self))]
  async fn remove_item(&self, user_id: i64, item_id: i64) -> Result<()> {
    let result = sqlx::query(
      r#"
      DELETE FROM cart_items ci USING carts c
      WHERE ci.cart_id = c.id AND ci.id = $1 AND c.user_id = $2
      "#,
    )
    .bind(item_id)
    .bind(user_id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(AppError::NotFound("Позиция корзины не найдена".to_string()));
    }
    info!(user_id, item_id, "Cart item deleted");
    Ok(())
  }
}
