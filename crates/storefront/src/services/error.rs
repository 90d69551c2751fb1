//! Service-layer error type.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors produced by the storefront services.
///
/// The string payloads are client-facing messages.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced entity does not exist (or is not visible to the caller).
    #[error("{0}")]
    NotFound(String),

    /// The request is well-formed but violates a business rule.
    #[error("{0}")]
    BadRequest(String),

    /// The request conflicts with current state (stock, availability).
    #[error("{0}")]
    Conflict(String),

    /// Repository/database error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}
