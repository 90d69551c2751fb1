//! Emporium storefront library.
//!
//! Identity resolution, carts, checkout, and the product catalog behind a
//! JSON HTTP API. The binary in `main.rs` is a thin wrapper around
//! [`routes::app`]; integration tests drive the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
