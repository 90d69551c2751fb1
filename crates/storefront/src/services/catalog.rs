//! Catalog store: product CRUD with field validation.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::instrument;
use url::Url;

use emporium_core::{Money, PageRequest, ProductId};

use super::ServiceError;
use crate::db::ProductRepository;
use crate::models::{NewProduct, Product, ProductPatch};

const MAX_NAME_LENGTH: usize = 255;

/// Unvalidated product fields as submitted by a client.
///
/// `price` accepts a JSON number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Unvalidated partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraftPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl ProductDraft {
    /// # Errors
    ///
    /// Returns `ServiceError::BadRequest` naming the first invalid field.
    pub fn validate(self) -> Result<NewProduct, ServiceError> {
        Ok(NewProduct {
            name: validate_name(&self.name)?,
            description: self.description,
            price: validate_price(self.price)?,
            stock_quantity: validate_stock(self.stock_quantity)?,
            image_url: self.image_url.as_deref().map(validate_image_url).transpose()?,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

impl ProductDraftPatch {
    /// # Errors
    ///
    /// Returns `ServiceError::BadRequest` naming the first invalid field.
    pub fn validate(self) -> Result<ProductPatch, ServiceError> {
        Ok(ProductPatch {
            name: self.name.as_deref().map(validate_name).transpose()?,
            description: self.description,
            price: self.price.map(validate_price).transpose()?,
            stock_quantity: self.stock_quantity.map(validate_stock).transpose()?,
            image_url: self.image_url.as_deref().map(validate_image_url).transpose()?,
            is_active: self.is_active,
        })
    }
}

fn validate_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::BadRequest("name should not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ServiceError::BadRequest(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_price(price: Decimal) -> Result<Money, ServiceError> {
    Money::price(price).map_err(|e| ServiceError::BadRequest(e.to_string()))
}

fn validate_stock(stock: i64) -> Result<u32, ServiceError> {
    if stock < 0 {
        return Err(ServiceError::BadRequest(
            "stock_quantity must not be less than 0".to_string(),
        ));
    }
    u32::try_from(stock)
        .ok()
        .filter(|s| i32::try_from(*s).is_ok())
        .ok_or_else(|| ServiceError::BadRequest("stock_quantity is too large".to_string()))
}

fn validate_image_url(raw: &str) -> Result<String, ServiceError> {
    let invalid = || ServiceError::BadRequest("image_url must be a URL address".to_string());
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(invalid());
    }
    Ok(url.to_string())
}

fn product_not_found(id: ProductId) -> ServiceError {
    ServiceError::NotFound(format!("Product with ID \"{id}\" not found"))
}

pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// One page of products ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::BadRequest` if `page` or `limit` is below 1.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
        is_active: Option<bool>,
    ) -> Result<Vec<Product>, ServiceError> {
        let page = PageRequest::new(page, limit).map_err(|e| ServiceError::BadRequest(e.to_string()))?;
        Ok(self.products.list(page, is_active).await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::BadRequest` if a field is invalid.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        let product = self.products.create(&draft.validate()?).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    /// # Errors
    ///
    /// - `ServiceError::BadRequest` if a provided field is invalid
    /// - `ServiceError::NotFound` if the product does not exist
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductDraftPatch,
    ) -> Result<Product, ServiceError> {
        let patch = patch.validate()?;
        self.products
            .update(id, &patch)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    /// Hard delete.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: ProductId) -> Result<(), ServiceError> {
        if !self.products.delete(id).await? {
            return Err(product_not_found(id));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        serde_json::from_value(serde_json::json!({
            "name": "  Teapot ",
            "price": 24.99,
            "stock_quantity": 12
        }))
        .unwrap()
    }

    #[test]
    fn test_draft_defaults() {
        let product = draft().validate().unwrap();
        assert_eq!(product.name, "Teapot");
        assert_eq!(product.price.to_string(), "24.99");
        assert_eq!(product.stock_quantity, 12);
        assert!(product.is_active);
        assert!(product.image_url.is_none());
    }

    #[test]
    fn test_price_accepts_string() {
        let draft: ProductDraft = serde_json::from_value(serde_json::json!({
            "name": "Cup",
            "price": "3.50",
            "stock_quantity": 0
        }))
        .unwrap();
        assert_eq!(draft.validate().unwrap().price.amount(), Decimal::new(350, 2));
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let cases = [
            ProductDraft { name: "   ".into(), ..draft() },
            ProductDraft { price: Decimal::ZERO, ..draft() },
            ProductDraft { price: Decimal::new(1001, 3), ..draft() },
            ProductDraft { stock_quantity: -1, ..draft() },
            ProductDraft { stock_quantity: i64::from(i32::MAX) + 1, ..draft() },
            ProductDraft { image_url: Some("not a url".into()), ..draft() },
            ProductDraft { image_url: Some("/relative/path.png".into()), ..draft() },
            ProductDraft { image_url: Some("ftp://files.example.com/a.png".into()), ..draft() },
        ];
        for case in cases {
            assert!(
                matches!(case.clone().validate(), Err(ServiceError::BadRequest(_))),
                "expected rejection for {case:?}"
            );
        }
    }

    #[test]
    fn test_image_url_accepted() {
        let product = ProductDraft {
            image_url: Some("https://cdn.example.com/teapot.png".into()),
            ..draft()
        }
        .validate()
        .unwrap();
        assert_eq!(product.image_url.as_deref(), Some("https://cdn.example.com/teapot.png"));
    }

    #[test]
    fn test_patch_validates_only_present_fields() {
        let patch = ProductDraftPatch {
            stock_quantity: Some(0),
            ..ProductDraftPatch::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.stock_quantity, Some(0));
        assert!(patch.name.is_none());

        let bad = ProductDraftPatch {
            price: Some(Decimal::new(-100, 2)),
            ..ProductDraftPatch::default()
        };
        assert!(bad.validate().is_err());
    }
}
