// src/lib.rs

pub mod cart;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
