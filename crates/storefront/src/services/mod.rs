//! Business logic services for storefront.
//!
//! Services borrow the pool and are built per request.
//!
//! # Services
//!
//! - `identity` - Token subject to customer profile
//! - `cart` - Cart manipulation and pricing
//! - `orders` - Transactional checkout and order history
//! - `catalog` - Product CRUD

pub mod cart;
pub mod catalog;
mod error;
pub mod identity;
pub mod orders;

pub use cart::CartService;
pub use catalog::{CatalogService, ProductDraft, ProductDraftPatch};
pub use error::ServiceError;
pub use identity::IdentityService;
pub use orders::{CheckoutAddresses, OrderService, plan_order};
