//! Domain models for storefront.
//!
//! These types are validated domain objects, separate from database row
//! types. Response types serialize directly into the JSON the API returns.

pub mod cart;
pub mod customer;
pub mod order;
pub mod product;

pub use cart::{CartItemView, CartLine, CartView};
pub use customer::{Customer, ProfilePatch};
pub use order::{
    CheckoutLine, CheckoutProduct, Order, OrderItem, OrderPlan, OrderSummary, PlannedItem,
};
pub use product::{NewProduct, Product, ProductPatch};
