//! Order repository.
//!
//! Orders and their items are only ever written inside the checkout
//! transaction, so the write paths take the caller's connection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use emporium_core::{CustomerId, Money, OrderId, OrderItemId, OrderStatus, ProductId};

use super::{RepositoryError, to_count, to_db_int};
use crate::models::{Order, OrderItem, OrderSummary, PlannedItem};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: CustomerId,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
    status: String,
    shipping_address: String,
    billing_address: String,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            order_date: self.order_date,
            total_amount: Money::new(self.total_amount),
            status: parse_status(&self.status)?,
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            items,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    product_id: ProductId,
    name_at_purchase: String,
    quantity: i32,
    price_at_purchase: Decimal,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            name_at_purchase: row.name_at_purchase,
            quantity: to_count(row.quantity, "quantity")?,
            price_at_purchase: Money::new(row.price_at_purchase),
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderSummaryRow {
    id: OrderId,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
    status: String,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = RepositoryError;

    fn try_from(row: OrderSummaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            order_date: row.order_date,
            total_amount: Money::new(row.total_amount),
            status: parse_status(&row.status)?,
        })
    }
}

fn parse_status(raw: &str) -> Result<OrderStatus, RepositoryError> {
    raw.parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid order status in database: {e}")))
}

const ORDER_COLUMNS: &str =
    "id, customer_id, order_date, total_amount, status, shipping_address, billing_address";
const ORDER_ITEM_COLUMNS: &str = "id, product_id, name_at_purchase, quantity, price_at_purchase";

/// Repository for placed orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r"
            SELECT id, order_date, total_amount, status
            FROM shop.customer_order
            WHERE customer_id = $1
            ORDER BY order_date DESC, id DESC
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderSummary::try_from).collect()
    }

    /// An order with its items, regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM shop.order_item WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(OrderItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        row.into_order(items).map(Some)
    }

    /// Insert a `PENDING` order and its items on the caller's connection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn insert(
        conn: &mut PgConnection,
        customer_id: CustomerId,
        total: Money,
        shipping_address: &str,
        billing_address: &str,
        items: &[PlannedItem],
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO shop.customer_order
                (customer_id, total_amount, status, shipping_address, billing_address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(customer_id)
        .bind(total.amount())
        .bind(OrderStatus::Pending.as_str())
        .bind(shipping_address)
        .bind(billing_address)
        .fetch_one(&mut *conn)
        .await?;

        let mut order_items = Vec::with_capacity(items.len());
        for item in items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                r"
                INSERT INTO shop.order_item
                    (order_id, product_id, name_at_purchase, price_at_purchase, quantity)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {ORDER_ITEM_COLUMNS}
                "
            ))
            .bind(row.id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.unit_price.amount())
            .bind(to_db_int(item.quantity, "quantity")?)
            .fetch_one(&mut *conn)
            .await?;

            order_items.push(OrderItem::try_from(item_row)?);
        }

        row.into_order(order_items)
    }
}
