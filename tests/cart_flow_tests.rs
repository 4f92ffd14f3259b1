// tests/cart_flow_tests.rs

mod common;

use common::{coat_variant, MemCartStore};
use norde_maison::cart::pricing::{build_cart_view, Currency, RequestCtx};
use norde_maison::cart::store::{AddOutcome, CartStore};
use norde_maison::errors::AppError;

fn ctx(currency: Currency) -> RequestCtx {
  RequestCtx {
    user_id: 1,
    currency,
    base_url: "http://localhost:8080".to_string(),
  }
}

#[tokio::test]
async fn first_add_creates_item_with_requested_quantity() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 5));

  let outcome = store.add_item(1, 10, 3).await.unwrap();
  assert_eq!(outcome, AddOutcome::Created);
  assert_eq!(store.quantity_of(1, 10), Some(3));
}

#[tokio::test]
async fn repeat_add_merges_quantities_without_duplicate_rows() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 5));

  store.add_item(1, 10, 2).await.unwrap();
  let outcome = store.add_item(1, 10, 2).await.unwrap();

  assert_eq!(outcome, AddOutcome::Merged);
  assert_eq!(store.quantity_of(1, 10), Some(4));
  assert_eq!(store.row_count(1, 10), 1);
}

#[tokio::test]
async fn add_beyond_stock_is_rejected_and_leaves_quantity_unchanged() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 3));

  store.add_item(1, 10, 2).await.unwrap();
  let err = store.add_item(1, 10, 2).await.unwrap_err();

  match err {
    AppError::InvalidState(m) => assert_eq!(m, "Превышен остаток на складе"),
    other => panic!("expected InvalidState, got {:?}", other),
  }
  assert_eq!(store.quantity_of(1, 10), Some(2));
}

#[tokio::test]
async fn add_beyond_cap_is_rejected_even_with_plenty_of_stock() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 50));

  store.add_item(1, 10, 4).await.unwrap();
  let err = store.add_item(1, 10, 2).await.unwrap_err();

  match err {
    AppError::InvalidState(m) => assert_eq!(m, "Максимум 5 единиц товара"),
    other => panic!("expected InvalidState, got {:?}", other),
  }
  assert_eq!(store.quantity_of(1, 10), Some(4));
}

#[tokio::test]
async fn cap_message_wins_when_cap_and_stock_are_both_exceeded() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 6));

  let err = store.add_item(1, 10, 7).await.unwrap_err();
  match err {
    AppError::InvalidState(m) => assert_eq!(m, "Максимум 5 единиц товара"),
    other => panic!("expected InvalidState, got {:?}", other),
  }
  assert_eq!(store.quantity_of(1, 10), None);
}

#[tokio::test]
async fn unknown_variant_is_not_found() {
  let store = MemCartStore::new();
  let err = store.add_item(1, 999, 1).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn hidden_product_cannot_be_added() {
  let store = MemCartStore::new();
  let mut variant = coat_variant(10, 5);
  variant.is_visible = false;
  store.insert_variant(variant);

  let err = store.add_item(1, 10, 1).await.unwrap_err();
  match err {
    AppError::InvalidState(m) => assert_eq!(m, "Товар недоступен"),
    other => panic!("expected InvalidState, got {:?}", other),
  }
}

#[tokio::test]
async fn sold_out_variant_cannot_be_added() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 0));

  let err = store.add_item(1, 10, 1).await.unwrap_err();
  match err {
    AppError::InvalidState(m) => assert_eq!(m, "Товар закончился на складе"),
    other => panic!("expected InvalidState, got {:?}", other),
  }
}

#[tokio::test]
async fn update_revalidates_against_live_stock() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 5));
  store.add_item(1, 10, 2).await.unwrap();
  let item_id = store.item_id_of(1, 10).unwrap();

  store.update_item(1, item_id, 4).await.unwrap();
  assert_eq!(store.quantity_of(1, 10), Some(4));

  // Stock dropped since the item was added; the update must see it.
  store.set_stock(10, 3);
  let err = store.update_item(1, item_id, 4).await.unwrap_err();
  assert!(matches!(err, AppError::InvalidState(_)));
  assert_eq!(store.quantity_of(1, 10), Some(4));
}

#[tokio::test]
async fn foreign_items_are_invisible_to_other_users() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 5));
  store.add_item(1, 10, 2).await.unwrap();
  let item_id = store.item_id_of(1, 10).unwrap();

  // User 2 can neither update nor delete user 1's item, and learns nothing.
  let err = store.update_item(2, item_id, 1).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
  let err = store.remove_item(2, item_id).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));

  assert_eq!(store.quantity_of(1, 10), Some(2));
}

#[tokio::test]
async fn delete_removes_the_single_row() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 5));
  store.add_item(1, 10, 2).await.unwrap();
  let item_id = store.item_id_of(1, 10).unwrap();

  store.remove_item(1, item_id).await.unwrap();
  assert_eq!(store.quantity_of(1, 10), None);

  let err = store.remove_item(1, item_id).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn fetch_cart_lazily_creates_an_empty_cart() {
  let store = MemCartStore::new();

  let (cart, lines) = store.fetch_cart(1).await.unwrap();
  assert!(lines.is_empty());

  // Idempotent: the same cart comes back on the next read.
  let (cart_again, _) = store.fetch_cart(1).await.unwrap();
  assert_eq!(cart.id, cart_again.id);
}

#[tokio::test]
async fn cart_total_reflects_live_availability() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 5));
  store.insert_variant(coat_variant(11, 5));

  store.add_item(1, 10, 3).await.unwrap();
  store.add_item(1, 11, 2).await.unwrap();

  // Variant 11 sells out after it was added to the cart.
  store.set_stock(11, 0);

  let (cart, lines) = store.fetch_cart(1).await.unwrap();
  let view = build_cart_view(cart.id, &lines, &ctx(Currency::Rub));

  // The sold-out line stays visible with a message but contributes nothing.
  assert_eq!(view.items.len(), 2);
  assert_eq!(view.total_price, 3000);
  let sold_out = view.items.iter().find(|i| i.variant == 11).unwrap();
  assert!(!sold_out.is_available);
  assert_eq!(sold_out.availability_message, Some("Товар закончился на складе"));
  assert_eq!(sold_out.total_price, 0);
}

#[tokio::test]
async fn unsupported_currency_falls_back_to_rub_pricing() {
  let store = MemCartStore::new();
  store.insert_variant(coat_variant(10, 5));
  store.add_item(1, 10, 3).await.unwrap();

  let (cart, lines) = store.fetch_cart(1).await.unwrap();
  let view = build_cart_view(cart.id, &lines, &ctx(Currency::from_param(Some("usd"))));
  assert_eq!(view.total_price, 3000);

  let view = build_cart_view(cart.id, &lines, &ctx(Currency::Kzt));
  assert_eq!(view.total_price, 16500);
}
