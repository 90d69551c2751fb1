//! Seed the catalog from a YAML file.
//!
//! The file is a list of products with the same fields the create-product
//! endpoint accepts:
//!
//! ```yaml
//! - name: Ceramic Mug
//!   description: 350ml, dishwasher safe
//!   price: "12.50"
//!   stock_quantity: 40
//! ```
//!
//! Every entry is validated before the database is touched; one bad entry
//! aborts the whole seed.

use std::path::Path;

use tracing::{error, info};

use emporium_storefront::db;
use emporium_storefront::services::{CatalogService, ProductDraft, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: STOREFRONT_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to create product: {0}")]
    Service(#[from] ServiceError),
}

/// Parse a seed file's contents.
///
/// # Errors
///
/// Returns `SeedError::Yaml` if the document is not a list of products.
pub fn parse(content: &str) -> Result<Vec<ProductDraft>, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Validation failures as `"#index name: reason"` lines.
#[must_use]
pub fn validation_errors(drafts: &[ProductDraft]) -> Vec<String> {
    drafts
        .iter()
        .enumerate()
        .filter_map(|(i, draft)| {
            draft
                .clone()
                .validate()
                .err()
                .map(|e| format!("#{} {}: {e}", i + 1, draft.name))
        })
        .collect()
}

/// Insert every product in `file`.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, any entry is
/// invalid, or an insert fails.
pub async fn products(file: &Path, dry_run: bool) -> Result<(), SeedError> {
    info!(path = %file.display(), "Loading products from file");

    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| SeedError::Read {
            path: file.display().to_string(),
            source,
        })?;
    let drafts = parse(&content)?;
    info!(products = drafts.len(), "Parsed seed file");

    let errors = validation_errors(&drafts);
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    if dry_run {
        info!("Dry run: seed file is valid, nothing written");
        return Ok(());
    }

    let database_url = super::database_url().ok_or(SeedError::MissingDatabaseUrl)?;
    let pool = db::create_pool(&database_url, 1).await?;
    info!("Connected to database");

    let catalog = CatalogService::new(&pool);
    for draft in drafts {
        let product = catalog.create(draft).await?;
        info!(product_id = %product.id, name = %product.name, "Seeded product");
    }

    info!("Seeding complete");
    Ok(())
}
