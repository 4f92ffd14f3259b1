// src/services/catalog.rs

//! Catalog browsing: categories, subcategories, product listing with
//! filters/sorting/pagination, and product detail. Read-only; the cart store
//! consumes the same tables through its own queries.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::cart::pricing::Currency;
use crate::errors::{AppError, Result};
use crate::models::{Category, Product, ProductImage, ProductVariant, SubCategory};

pub const PRODUCT_PAGE_SIZE: i64 = 16;

fn truthy(value: &str) -> bool {
  matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn media_url(base_url: &str, path: &str) -> String {
  format!("{}/media/{}", base_url.trim_end_matches('/'), path)
}

fn price_column(currency: Currency) -> &'static str {
  match currency {
    Currency::Rub => "price_rub",
    Currency::Kzt => "price_kzt",
    Currency::Byn => "price_byn",
  }
}

// --- Categories ---

#[derive(Debug, Deserialize)]
pub struct CategoryFilters {
  pub gender: Option<String>,
  pub is_material: Option<String>,
}

#[instrument(name = "catalog::list_categories", skip(pool))]
pub async fn list_categories(pool: &PgPool, filters: &CategoryFilters) -> Result<Vec<Category>> {
  let mut qb: QueryBuilder<Postgres> =
    QueryBuilder::new("SELECT c.id, c.name, c.gender, c.sort_order FROM categories c WHERE TRUE");

  if let Some(gender) = filters.gender.as_deref() {
    if gender == "M" || gender == "F" {
      qb.push(" AND c.gender = ").push_bind(gender.to_string());
    }
  }
  if let Some(is_material) = filters.is_material.as_deref() {
    qb.push(" AND EXISTS (SELECT 1 FROM subcategories s WHERE s.category_id = c.id AND s.is_material = ")
      .push_bind(truthy(is_material))
      .push(")");
  }
  qb.push(" ORDER BY c.sort_order, c.name");

  Ok(qb.build_query_as::<Category>().fetch_all(pool).await?)
}

// --- Subcategories ---

#[derive(Debug, Deserialize)]
pub struct SubCategoryFilters {
  pub category: Option<i64>,
  pub show_on_main: Option<String>,
  pub gender: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubCategoryView {
  #[serde(flatten)]
  pub subcategory: SubCategory,
  pub cover_image_url: Option<String>,
  pub category: Category,
}

#[instrument(name = "catalog::list_subcategories", skip(pool, base_url))]
pub async fn list_subcategories(
  pool: &PgPool,
  filters: &SubCategoryFilters,
  base_url: &str,
) -> Result<Vec<SubCategoryView>> {
  let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
    r#"
    SELECT s.id, s.category_id, s.name, s.size_model, s.cover_image, s.show_on_main,
           s.is_material, s.description, s.sort_order,
           c.id AS cat_id, c.name AS cat_name, c.gender AS cat_gender, c.sort_order AS cat_sort_order
    FROM subcategories s
    JOIN categories c ON c.id = s.category_id
    WHERE TRUE
    "#,
  );

  if let Some(category_id) = filters.category {
    qb.push(" AND s.category_id = ").push_bind(category_id);

    // Material subcategories are listed only under their dedicated category.
    let cat_name: Option<(String,)> = sqlx::query_as("SELECT name FROM categories WHERE id = $1")
      .bind(category_id)
      .fetch_optional(pool)
      .await?;
    if let Some((name,)) = cat_name {
      if name != "Материалы" {
        qb.push(" AND s.is_material = FALSE");
      }
    }
  }
  if let Some(show) = filters.show_on_main.as_deref() {
    if truthy(show) {
      qb.push(" AND s.show_on_main = TRUE");
    }
  }
  if let Some(gender) = filters.gender.as_deref() {
    if gender == "M" || gender == "F" {
      qb.push(" AND c.gender = ").push_bind(gender.to_string());
    }
  }
  qb.push(" ORDER BY s.sort_order, s.name");

  #[derive(sqlx::FromRow)]
  struct Row {
    id: i64,
    category_id: i64,
    name: String,
    size_model: String,
    cover_image: Option<String>,
    show_on_main: bool,
    is_material: bool,
    description: String,
    sort_order: i32,
    cat_id: i64,
    cat_name: String,
    cat_gender: String,
    cat_sort_order: i32,
  }

  let rows = qb.build_query_as::<Row>().fetch_all(pool).await?;

  Ok(
    rows
      .into_iter()
      .map(|r| SubCategoryView {
        cover_image_url: r.cover_image.as_deref().map(|p| media_url(base_url, p)),
        subcategory: SubCategory {
          id: r.id,
          category_id: r.category_id,
          name: r.name,
          size_model: r.size_model,
          cover_image: r.cover_image,
          show_on_main: r.show_on_main,
          is_material: r.is_material,
          description: r.description,
          sort_order: r.sort_order,
        },
        category: Category {
          id: r.cat_id,
          name: r.cat_name,
          gender: r.cat_gender,
          sort_order: r.cat_sort_order,
        },
      })
      .collect(),
  )
}

// --- Products ---

#[derive(Debug, Deserialize)]
pub struct ProductFilters {
  pub subcategory: Option<i64>,
  pub gender: Option<String>,
  /// Comma-separated size codes, e.g. `size=S,M`.
  pub size: Option<String>,
  /// Comma-separated HEX values, e.g. `color=%23000000,%23FFFFFF`.
  pub color: Option<String>,
  pub min_price: Option<i64>,
  pub max_price: Option<i64>,
  pub sort: Option<String>,
  pub page: Option<i64>,
  pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductCard {
  pub id: i64,
  pub name: String,
  pub price: i64,
  pub currency: Currency,
  pub main_image_url: Option<String>,
  pub subcategory: i64,
  pub material: String,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
  pub count: i64,
  pub results: Vec<ProductCard>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductCardRow {
  id: i64,
  name: String,
  price: i64,
  main_image: Option<String>,
  subcategory_id: i64,
  material: String,
}

fn split_csv(value: Option<&str>) -> Vec<String> {
  value
    .map(|v| {
      v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
    })
    .unwrap_or_default()
}

fn push_product_filters(qb: &mut QueryBuilder<Postgres>, filters: &ProductFilters, price_col: &str) {
  qb.push(" WHERE p.is_visible = TRUE");

  if let Some(subcategory_id) = filters.subcategory {
    qb.push(" AND p.subcategory_id = ").push_bind(subcategory_id);
  }
  if let Some(gender) = filters.gender.as_deref() {
    if gender == "M" || gender == "F" {
      qb.push(" AND c.gender = ").push_bind(gender.to_string());
    }
  }
  let sizes = split_csv(filters.size.as_deref());
  if !sizes.is_empty() {
    qb.push(" AND EXISTS (SELECT 1 FROM product_variants pv WHERE pv.product_id = p.id AND pv.size = ANY(")
      .push_bind(sizes)
      .push("))");
  }
  let colors = split_csv(filters.color.as_deref());
  if !colors.is_empty() {
    qb.push(" AND EXISTS (SELECT 1 FROM product_variants pv WHERE pv.product_id = p.id AND pv.color_hex = ANY(")
      .push_bind(colors)
      .push("))");
  }
  if let Some(min_price) = filters.min_price {
    qb.push(format!(" AND p.{} >= ", price_col)).push_bind(min_price);
  }
  if let Some(max_price) = filters.max_price {
    qb.push(format!(" AND p.{} <= ", price_col)).push_bind(max_price);
  }
}

fn order_clause(sort: Option<&str>, price_col: &str) -> String {
  match sort {
    Some("price_asc") => format!(" ORDER BY p.{} ASC, p.id", price_col),
    Some("price_desc") => format!(" ORDER BY p.{} DESC, p.id", price_col),
    // "default", "newest" and anything unknown sort by recency.
    _ => " ORDER BY p.created_at DESC, p.id".to_string(),
  }
}

#[instrument(name = "catalog::list_products", skip(pool, base_url))]
pub async fn list_products(pool: &PgPool, filters: &ProductFilters, base_url: &str) -> Result<ProductPage> {
  let currency = Currency::from_param(filters.currency.as_deref());
  let price_col = price_column(currency);
  let page = filters.page.unwrap_or(1).max(1);

  let mut count_qb: QueryBuilder<Postgres> =
    QueryBuilder::new("SELECT COUNT(*) FROM products p JOIN subcategories s ON s.id = p.subcategory_id JOIN categories c ON c.id = s.category_id");
  push_product_filters(&mut count_qb, filters, price_col);
  let (count,): (i64,) = count_qb.build_query_as().fetch_one(pool).await?;

  let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
    "SELECT p.id, p.name, p.{} AS price, p.main_image, p.subcategory_id, p.material \
     FROM products p JOIN subcategories s ON s.id = p.subcategory_id JOIN categories c ON c.id = s.category_id",
    price_col
  ));
  push_product_filters(&mut qb, filters, price_col);
  qb.push(order_clause(filters.sort.as_deref(), price_col));
  qb.push(" LIMIT ")
    .push_bind(PRODUCT_PAGE_SIZE)
    .push(" OFFSET ")
    .push_bind((page - 1) * PRODUCT_PAGE_SIZE);

  let rows = qb.build_query_as::<ProductCardRow>().fetch_all(pool).await?;

  Ok(ProductPage {
    count,
    results: rows
      .into_iter()
      .map(|r| ProductCard {
        id: r.id,
        name: r.name,
        price: r.price,
        currency,
        main_image_url: r.main_image.as_deref().map(|p| media_url(base_url, p)),
        subcategory: r.subcategory_id,
        material: r.material,
      })
      .collect(),
  })
}

// --- Product detail ---

#[derive(Debug, Serialize)]
pub struct ProductImageView {
  pub id: i64,
  pub image_url: String,
  pub sort_order: i32,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
  #[serde(flatten)]
  pub product: Product,
  pub price: i64,
  pub currency: Currency,
  pub main_image_url: Option<String>,
  pub images: Vec<ProductImageView>,
  pub variants: Vec<ProductVariant>,
  pub similar_products: Vec<ProductCard>,
}

#[instrument(name = "catalog::product_detail", skip(pool, base_url))]
pub async fn product_detail(
  pool: &PgPool,
  product_id: i64,
  currency: Currency,
  base_url: &str,
) -> Result<ProductDetail> {
  let product = sqlx::query_as::<_, Product>(
    r#"
    SELECT id, subcategory_id, name, description, material,
           price_rub, price_kzt, price_byn, is_visible, main_image, created_at
    FROM products WHERE id = $1
    "#,
  )
  .bind(product_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::NotFound("Товар не найден".to_string()))?;

  let images = sqlx::query_as::<_, ProductImage>(
    "SELECT id, product_id, image, sort_order FROM product_images WHERE product_id = $1 ORDER BY sort_order",
  )
  .bind(product_id)
  .fetch_all(pool)
  .await?;

  let variants = sqlx::query_as::<_, ProductVariant>(
    "SELECT id, product_id, color_name, color_hex, size, stock FROM product_variants WHERE product_id = $1 ORDER BY id",
  )
  .bind(product_id)
  .fetch_all(pool)
  .await?;

  let price_col = price_column(currency);
  let similar = sqlx::query_as::<_, ProductCardRow>(&format!(
    r#"
    SELECT id, name, {} AS price, main_image, subcategory_id, material
    FROM products
    WHERE subcategory_id = $1 AND id <> $2
    ORDER BY name
    LIMIT 4
    "#,
    price_col
  ))
  .bind(product.subcategory_id)
  .bind(product.id)
  .fetch_all(pool)
  .await?;

  let price = match currency {
    Currency::Rub => product.price_rub,
    Currency::Kzt => product.price_kzt,
    Currency::Byn => product.price_byn,
  };

  Ok(ProductDetail {
    price,
    currency,
    main_image_url: product.main_image.as_deref().map(|p| media_url(base_url, p)),
    images: images
      .into_iter()
      .map(|img| ProductImageView {
        id: img.id,
        image_url: media_url(base_url, &img.image),
        sort_order: img.sort_order,
      })
      .collect(),
    variants,
    similar_products: similar
      .into_iter()
      .map(|r| ProductCard {
        id: r.id,
        name: r.name,
        price: r.price,
        currency,
        main_image_url: r.main_image.as_deref().map(|p| media_url(base_url, p)),
        subcategory: r.subcategory_id,
        material: r.material,
      })
      .collect(),
    product,
  })
}
