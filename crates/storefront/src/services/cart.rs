//! Cart engine.
//!
//! Every operation starts from the customer's cart, creating it on first
//! use, and answers with a freshly priced [`CartView`].

use sqlx::PgPool;
use tracing::instrument;

use emporium_core::{CartId, CustomerId, ProductId};

use super::ServiceError;
use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{CartView, Product};

pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// The customer's cart, created empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on database failure.
    #[instrument(skip(self))]
    pub async fn get_or_create_cart(&self, customer_id: CustomerId) -> Result<CartView, ServiceError> {
        let cart_id = self.carts.get_or_create(customer_id).await?;
        self.view(cart_id).await
    }

    /// Add units of a product, merging with an existing line.
    ///
    /// The stock check compares against the requested quantity only;
    /// checkout re-validates the accumulated quantity.
    ///
    /// # Errors
    ///
    /// - `ServiceError::BadRequest` if `quantity` is zero, the product is
    ///   inactive, stock is short, or the merged line would overflow
    /// - `ServiceError::NotFound` if the product does not exist
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartView, ServiceError> {
        if quantity == 0 {
            return Err(ServiceError::BadRequest(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| product_not_found(product_id))?;
        check_addable(&product, quantity)?;

        let cart_id = self.carts.get_or_create(customer_id).await?;
        let added = self
            .carts
            .add_item(cart_id, product_id, quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => product_not_found(product_id),
                other => other.into(),
            })?;
        if !added {
            return Err(quantity_too_large());
        }

        tracing::debug!(%cart_id, %product_id, quantity, "Item added to cart");
        self.view(cart_id).await
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// - `ServiceError::NotFound` if the product is not in the cart
    /// - `ServiceError::BadRequest` if `quantity` exceeds current stock
    #[instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartView, ServiceError> {
        let cart_id = self.carts.get_or_create(customer_id).await?;

        if self.carts.item_quantity(cart_id, product_id).await?.is_none() {
            return Err(not_in_cart(product_id));
        }

        if quantity == 0 {
            self.carts.remove_item(cart_id, product_id).await?;
            return self.view(cart_id).await;
        }

        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| not_in_cart(product_id))?;
        check_stock(&product, quantity)?;

        if !self.carts.set_quantity(cart_id, product_id, quantity).await? {
            return Err(not_in_cart(product_id));
        }

        self.view(cart_id).await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product is not in the cart.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<CartView, ServiceError> {
        let cart_id = self.carts.get_or_create(customer_id).await?;

        if !self.carts.remove_item(cart_id, product_id).await? {
            return Err(not_in_cart(product_id));
        }

        self.view(cart_id).await
    }

    /// Remove every line. Succeeds on an already-empty cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on database failure.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, customer_id: CustomerId) -> Result<CartView, ServiceError> {
        let cart_id = self.carts.get_or_create(customer_id).await?;
        let removed = self.carts.clear(cart_id).await?;
        tracing::debug!(%cart_id, removed, "Cart cleared");
        Ok(CartView::empty(cart_id))
    }

    async fn view(&self, cart_id: CartId) -> Result<CartView, ServiceError> {
        let lines = self.carts.lines(cart_id).await?;
        Ok(CartView::build(cart_id, lines))
    }
}

fn product_not_found(product_id: ProductId) -> ServiceError {
    ServiceError::NotFound(format!("Product with ID {product_id} not found."))
}

fn quantity_too_large() -> ServiceError {
    ServiceError::BadRequest("Quantity is too large".to_string())
}

fn not_in_cart(product_id: ProductId) -> ServiceError {
    ServiceError::NotFound(format!("Product with ID {product_id} not found in cart."))
}

/// A product can be added when it is active and has enough stock.
fn check_addable(product: &Product, quantity: u32) -> Result<(), ServiceError> {
    if !product.is_active {
        return Err(ServiceError::BadRequest(format!(
            "Product \"{}\" is not available.",
            product.name
        )));
    }
    check_stock(product, quantity)
}

fn check_stock(product: &Product, quantity: u32) -> Result<(), ServiceError> {
    if product.stock_quantity < quantity {
        return Err(ServiceError::BadRequest(format!(
            "Not enough stock for \"{}\". Available: {}",
            product.name, product.stock_quantity
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use emporium_core::Money;
    use rust_decimal::Decimal;

    use super::*;

    fn product(stock: u32, is_active: bool) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Teapot".to_string(),
            description: None,
            price: Money::new(Decimal::new(2500, 2)),
            stock_quantity: stock,
            image_url: None,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_addable_within_stock() {
        assert!(check_addable(&product(5, true), 5).is_ok());
    }

    #[test]
    fn test_inactive_product_rejected() {
        let err = check_addable(&product(5, false), 1).unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(msg) if msg == "Product \"Teapot\" is not available."));
    }

    #[test]
    fn test_short_stock_rejected() {
        let err = check_addable(&product(5, true), 6).unwrap_err();
        assert!(
            matches!(err, ServiceError::BadRequest(msg) if msg == "Not enough stock for \"Teapot\". Available: 5")
        );
    }

    #[test]
    fn test_quantity_update_ignores_active_flag() {
        // Lines already in a cart may be resized even if the product was
        // deactivated since; checkout rejects them later.
        assert!(check_stock(&product(3, false), 3).is_ok());
        assert!(check_stock(&product(3, false), 4).is_err());
    }
}
