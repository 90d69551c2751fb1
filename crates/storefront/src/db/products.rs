//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use emporium_core::{Money, PageRequest, ProductId};

use super::{RepositoryError, to_count, to_db_int};
use crate::models::{NewProduct, Product, ProductPatch};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock_quantity, image_url, \
                               is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock_quantity: i32,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: Money::new(row.price),
            stock_quantity: to_count(row.stock_quantity, "stock_quantity")?,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of products ordered by id, optionally filtered by the
    /// active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        page: PageRequest,
        is_active: Option<bool>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM shop.product
            WHERE ($1::BOOLEAN IS NULL OR is_active = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(is_active)
        .bind(i64::from(page.limit()))
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a table constraint rejects the row.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO shop.product
                (name, description, price, stock_quantity, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(product.price.amount())
        .bind(to_db_int(product.stock_quantity, "stock_quantity")?)
        .bind(product.image_url.as_deref())
        .bind(product.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_constraint)?;

        row.try_into()
    }

    /// Apply a partial update. Returns `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a table constraint rejects the row.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let stock = patch
            .stock_quantity
            .map(|stock| to_db_int(stock, "stock_quantity"))
            .transpose()?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE shop.product
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock_quantity = COALESCE($5, stock_quantity),
                image_url = COALESCE($6, image_url),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price.map(|price| price.amount()))
        .bind(stock)
        .bind(patch.image_url.as_deref())
        .bind(patch.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_constraint)?;

        row.map(Product::try_from).transpose()
    }

    /// Hard-delete a product. Returns `false` if it did not exist.
    ///
    /// Cart lines referencing the product cascade away; order items keep
    /// their snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Take `quantity` units out of stock, only if that many remain.
    ///
    /// Returns `false` when the guard fails, leaving stock untouched. Runs on
    /// the caller's connection so it joins the surrounding transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn decrement_stock(
        conn: &mut PgConnection,
        id: ProductId,
        quantity: u32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.product
            SET stock_quantity = stock_quantity - $2,
                updated_at = NOW()
            WHERE id = $1 AND stock_quantity >= $2
            ",
        )
        .bind(id)
        .bind(to_db_int(quantity, "quantity")?)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
