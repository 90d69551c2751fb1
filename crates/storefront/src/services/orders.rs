//! Order placement engine.
//!
//! Checkout runs in a single transaction: read the cart with live product
//! data, validate it, write the order with frozen prices, take stock, and
//! empty the cart. Any failure rolls the whole thing back.

use sqlx::PgPool;
use tracing::instrument;

use emporium_core::{CustomerId, Money, OrderId};

use super::ServiceError;
use crate::db::{CartRepository, OrderRepository, ProductRepository};
use crate::models::{CheckoutLine, Order, OrderPlan, OrderSummary, PlannedItem};

/// Shipping and billing addresses, trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutAddresses {
    shipping: String,
    billing: String,
}

impl CheckoutAddresses {
    /// # Errors
    ///
    /// Returns `ServiceError::BadRequest` naming the first blank field.
    pub fn new(shipping: &str, billing: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            shipping: required_address(shipping, "shipping_address")?.to_string(),
            billing: required_address(billing, "billing_address")?.to_string(),
        })
    }

    #[must_use]
    pub fn shipping(&self) -> &str {
        &self.shipping
    }

    #[must_use]
    pub fn billing(&self) -> &str {
        &self.billing
    }
}

pub struct OrderService<'a> {
    pool: &'a PgPool,
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(pool),
        }
    }

    /// Turn the customer's cart into a `PENDING` order.
    ///
    /// # Errors
    ///
    /// - `ServiceError::BadRequest` if the cart is missing or empty, or its
    ///   total is too large to record
    /// - `ServiceError::Conflict` if a product is gone, inactive, or short on
    ///   stock, including when a concurrent checkout took the last units
    /// - `ServiceError::Repository` on database failure
    #[instrument(skip(self, addresses))]
    pub async fn create_order(
        &self,
        customer_id: CustomerId,
        addresses: &CheckoutAddresses,
    ) -> Result<Order, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let (cart_id, lines) = CartRepository::checkout_lines(&mut *tx, customer_id)
            .await?
            .ok_or_else(empty_cart)?;
        let plan = plan_order(&lines)?;

        let order = OrderRepository::insert(
            &mut *tx,
            customer_id,
            plan.total,
            addresses.shipping(),
            addresses.billing(),
            &plan.items,
        )
        .await?;

        for item in &plan.items {
            let taken =
                ProductRepository::decrement_stock(&mut *tx, item.product_id, item.quantity)
                    .await?;
            if !taken {
                tracing::warn!(
                    product_id = %item.product_id,
                    requested = item.quantity,
                    "Stock changed during checkout"
                );
                return Err(ServiceError::Conflict(format!(
                    "Not enough stock for \"{}\". Requested: {}",
                    item.name, item.quantity
                )));
            }
        }

        CartRepository::clear_in(&mut *tx, cart_id).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            %customer_id,
            total = %order.total_amount,
            items = order.items.len(),
            "Order placed"
        );
        Ok(order)
    }

    /// The customer's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on database failure.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<OrderSummary>, ServiceError> {
        Ok(self.orders.list_for_customer(customer_id).await?)
    }

    /// A single order with items.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the order does not exist or
    /// belongs to another customer; the two cases are indistinguishable.
    #[instrument(skip(self))]
    pub async fn get_order_by_id(
        &self,
        customer_id: CustomerId,
        order_id: OrderId,
    ) -> Result<Order, ServiceError> {
        self.orders
            .get(order_id)
            .await?
            .filter(|order| order.customer_id == customer_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Order with ID {order_id} not found.")))
    }
}

fn empty_cart() -> ServiceError {
    ServiceError::BadRequest("Cannot create an order from an empty cart.".to_string())
}

fn required_address<'s>(value: &'s str, field: &str) -> Result<&'s str, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::BadRequest(format!("{field} should not be empty")));
    }
    Ok(trimmed)
}

/// Validate checkout lines and price them.
///
/// Pure: the caller supplies product data read inside its transaction.
/// Each line's name and unit price become the order item's snapshot.
///
/// # Errors
///
/// - `ServiceError::BadRequest` if `lines` is empty or the total exceeds
///   [`Money::max_order_total`]
/// - `ServiceError::Conflict` for the first line whose product is missing,
///   inactive, or short on stock
pub fn plan_order(lines: &[CheckoutLine]) -> Result<OrderPlan, ServiceError> {
    if lines.is_empty() {
        return Err(empty_cart());
    }

    let items = lines
        .iter()
        .map(|line| {
            let product = match &line.product {
                Some(product) if product.is_active => product,
                Some(product) => {
                    return Err(ServiceError::Conflict(format!(
                        "Product \"{}\" is no longer available.",
                        product.name
                    )));
                }
                None => {
                    return Err(ServiceError::Conflict(format!(
                        "Product \"{}\" is no longer available.",
                        line.product_id
                    )));
                }
            };

            if product.stock_quantity < line.quantity {
                return Err(ServiceError::Conflict(format!(
                    "Not enough stock for \"{}\". Available: {}, Requested: {}",
                    product.name, product.stock_quantity, line.quantity
                )));
            }

            Ok(PlannedItem {
                product_id: line.product_id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity: line.quantity,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total = items
        .iter()
        .map(|item| item.unit_price.times(item.quantity))
        .sum::<Money>()
        .rounded();
    if total > Money::max_order_total() {
        return Err(ServiceError::BadRequest(format!(
            "Order total exceeds the maximum of {}",
            Money::max_order_total()
        )));
    }

    Ok(OrderPlan { items, total })
}
