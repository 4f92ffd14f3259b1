// src/services/favorites.rs

//! User favorites: toggle on/off, explicit removal, listing.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::cart::pricing::Currency;
use crate::errors::{AppError, Result};

/// Toggles a favorite for a visible product. Returns the resulting state:
/// `true` when the favorite now exists, `false` when it was removed.
#[instrument(name = "favorites::toggle", skip(pool))]
pub async fn toggle(pool: &PgPool, user_id: i64, product_id: i64) -> Result<bool> {
  let mut tx = pool.begin().await?;

  let product: Option<(i64,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1 AND is_visible = TRUE")
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?;
  if product.is_none() {
    return Err(AppError::NotFound("Товар не найден".to_string()));
  }

  // The UNIQUE(user_id, product_id) constraint turns a concurrent double
  // toggle into insert-then-delete instead of duplicate rows.
  let inserted: Option<(i64,)> = sqlx::query_as(
    r#"
    INSERT INTO favorites (user_id, product_id) VALUES ($1, $2)
    ON CONFLICT (user_id, product_id) DO NOTHING
    RETURNING id
    "#,
  )
  .bind(user_id)
  .bind(product_id)
  .fetch_optional(&mut *tx)
  .await?;

  let favorite = if inserted.is_some() {
    true
  } else {
    sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .execute(&mut *tx)
      .await?;
    false
  };

  tx.commit().await?;
  info!(user_id, product_id, favorite, "Favorite toggled");
  Ok(favorite)
}

/// Removes a favorite if present. Idempotent.
#[instrument(name = "favorites::remove", skip(pool))]
pub async fn remove(pool: &PgPool, user_id: i64, product_id: i64) -> Result<()> {
  sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = $2")
    .bind(user_id)
    .bind(product_id)
    .execute(pool)
    .await?;
  Ok(())
}

#[derive(Debug, Serialize)]
pub struct FavoriteView {
  pub product_id: i64,
  pub product_name: String,
  pub price: i64,
  pub currency: Currency,
  pub main_image_url: Option<String>,
  pub is_visible: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct FavoriteRow {
  product_id: i64,
  product_name: String,
  price_rub: i64,
  price_kzt: i64,
  price_byn: i64,
  main_image: Option<String>,
  is_visible: bool,
}

/// Lists the caller's favorites, newest first.
#[instrument(name = "favorites::list", skip(pool, base_url))]
pub async fn list(pool: &PgPool, user_id: i64, currency: Currency, base_url: &str) -> Result<Vec<FavoriteView>> {
  let rows = sqlx::query_as::<_, FavoriteRow>(
    r#"
    SELECT p.id AS product_id, p.name AS product_name,
           p.price_rub, p.price_kzt, p.price_byn,
           p.main_image, p.is_visible
    FROM favorites f
    JOIN products p ON p.id = f.product_id
    WHERE f.user_id = $1
    ORDER BY f.created_at DESC, f.id DESC
    "#,
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  let base = base_url.trim_end_matches('/').to_string();
  Ok(
    rows
      .into_iter()
      .map(|r| FavoriteView {
        product_id: r.product_id,
        product_name: r.product_name,
        price: match currency {
          Currency::Rub => r.price_rub,
          Currency::Kzt => r.price_kzt,
          Currency::Byn => r.price_byn,
        },
        currency,
        main_image_url: r.main_image.map(|p| format!("{}/media/{}", base, p)),
        is_visible: r.is_visible,
      })
      .collect(),
  )
}
