//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use emporium_core::{CustomerId, Money, OrderId, OrderItemId, OrderStatus, ProductId};

/// A placed order with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    #[serde(rename = "order_id")]
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Money,
    #[serde(rename = "order_status")]
    pub status: OrderStatus,
    pub shipping_address: String,
    pub billing_address: String,
    pub items: Vec<OrderItem>,
}

/// A purchased line. Name and price are frozen at purchase time.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    #[serde(rename = "order_item_id")]
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub name_at_purchase: String,
    pub quantity: u32,
    pub price_at_purchase: Money,
}

/// Order history entry.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    #[serde(rename = "order_id")]
    pub id: OrderId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Money,
    #[serde(rename = "order_status")]
    pub status: OrderStatus,
}

/// A cart line as seen by checkout: the product may have been deleted or
/// deactivated since it was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: Option<CheckoutProduct>,
}

/// Live product data read inside the checkout transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutProduct {
    pub name: String,
    pub price: Money,
    pub stock_quantity: u32,
    pub is_active: bool,
}

/// A line ready to be written as an order item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

/// The result of validating a cart for checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlan {
    pub items: Vec<PlannedItem>,
    pub total: Money,
}
