// src/cart/mod.rs

//! Cart core: business rules (`policy`), currency pricing (`pricing`) and
//! data access (`store`). Policy and pricing are pure so they can be tested
//! without a database; the store enforces atomicity per mutation.

pub mod policy;
pub mod pricing;
pub mod store;
