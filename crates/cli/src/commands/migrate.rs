//! Database migration commands.
//!
//! Migration files live in `crates/storefront/migrations/` and are embedded
//! into the storefront crate at compile time.

use emporium_storefront::db;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: STOREFRONT_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply pending storefront migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the URL is unset, the database is
/// unreachable, or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    let database_url = super::database_url().ok_or(MigrationError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url, 1).await?;

    tracing::info!(
        available = db::MIGRATOR.iter().count(),
        "Running storefront migrations..."
    );
    db::run_migrations(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
