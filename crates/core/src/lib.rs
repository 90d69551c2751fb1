//! Emporium Core - Shared domain types.
//!
//! This crate provides the types used across the Emporium components:
//! - `storefront` - HTTP/JSON storefront backend
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Money math and pagination rules live here so every layer
//! agrees on them.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, email, money, order status, and page requests

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
