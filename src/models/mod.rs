// src/models/mod.rs

//! Data structures representing database entities.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::Cart;
pub use product::{Category, Product, ProductImage, ProductVariant, SubCategory};
pub use user::{User, UserProfile};
