//! Cart repository.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use emporium_core::{CartId, CustomerId, Money, ProductId};

use super::{RepositoryError, to_count, to_db_int};
use crate::models::{CartLine, CheckoutLine, CheckoutProduct};

#[derive(sqlx::FromRow)]
struct CartLineRow {
    product_id: ProductId,
    name: String,
    quantity: i32,
    price: Decimal,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: row.product_id,
            name: row.name,
            quantity: to_count(row.quantity, "quantity")?,
            unit_price: Money::new(row.price),
        })
    }
}

/// Cart line left-joined to the product, as read during checkout.
#[derive(sqlx::FromRow)]
struct CheckoutRow {
    product_id: ProductId,
    quantity: i32,
    name: Option<String>,
    price: Option<Decimal>,
    stock_quantity: Option<i32>,
    is_active: Option<bool>,
}

impl CheckoutRow {
    fn into_line(self) -> Result<CheckoutLine, RepositoryError> {
        let product = match (self.name, self.price, self.stock_quantity, self.is_active) {
            (Some(name), Some(price), Some(stock), Some(is_active)) => Some(CheckoutProduct {
                name,
                price: Money::new(price),
                stock_quantity: to_count(stock, "stock_quantity")?,
                is_active,
            }),
            _ => None,
        };

        Ok(CheckoutLine {
            product_id: self.product_id,
            quantity: to_count(self.quantity, "quantity")?,
            product,
        })
    }
}

/// Repository for carts and their items.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Return the customer's cart id, creating the cart if needed.
    ///
    /// A single upsert, so concurrent first requests converge on one cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, customer_id: CustomerId) -> Result<CartId, RepositoryError> {
        let id = sqlx::query_scalar::<_, CartId>(
            r"
            INSERT INTO shop.cart (customer_id)
            VALUES ($1)
            ON CONFLICT (customer_id) DO UPDATE SET customer_id = EXCLUDED.customer_id
            RETURNING id
            ",
        )
        .bind(customer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Cart lines with live product name and price, in the order added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.product_id, p.name, ci.quantity, p.price
            FROM shop.cart_item ci
            JOIN shop.product p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.added_at, ci.product_id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartLine::try_from).collect()
    }

    /// Current quantity of a product in the cart, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Option<u32>, RepositoryError> {
        let quantity = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM shop.cart_item WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        quantity.map(|q| to_count(q, "quantity")).transpose()
    }

    /// Add `quantity` units, incrementing an existing line instead of
    /// duplicating it.
    ///
    /// Returns `false`, leaving the line untouched, if the combined quantity
    /// would not fit the column.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product vanished concurrently.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO shop.cart_item (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity
            WHERE cart_item.quantity <= 2147483647 - EXCLUDED.quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(to_db_int(quantity, "quantity")?)
        .execute(self.pool)
        .await
        .map_err(foreign_key_conflict)?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite a line's quantity. Returns `false` if the line is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.cart_item SET quantity = $3 WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(to_db_int(quantity, "quantity")?)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::from_constraint)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a line. Returns `false` if the line is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1 AND product_id = $2")
                .bind(cart_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every line in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Read the customer's cart for checkout on the caller's connection.
    ///
    /// Products are left-joined so a line whose product was deleted still
    /// shows up, with `product: None`. Returns `None` if the customer has no
    /// cart, or `Some` with an empty vec if the cart has no lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn checkout_lines(
        conn: &mut PgConnection,
        customer_id: CustomerId,
    ) -> Result<Option<(CartId, Vec<CheckoutLine>)>, RepositoryError> {
        let Some(cart_id) = sqlx::query_scalar::<_, CartId>(
            "SELECT id FROM shop.cart WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?
        else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, CheckoutRow>(
            r"
            SELECT ci.product_id, ci.quantity,
                   p.name, p.price, p.stock_quantity, p.is_active
            FROM shop.cart_item ci
            LEFT JOIN shop.product p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.added_at, ci.product_id
            ",
        )
        .bind(cart_id)
        .fetch_all(&mut *conn)
        .await?;

        let lines = rows
            .into_iter()
            .map(CheckoutRow::into_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some((cart_id, lines)))
    }

    /// Delete every line in the cart on the caller's connection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_in(conn: &mut PgConnection, cart_id: CartId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// A foreign-key violation on insert means the product was deleted between
/// the existence check and the write.
fn foreign_key_conflict(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            RepositoryError::NotFound
        }
        _ => RepositoryError::from_constraint(err),
    }
}
