//! Identity resolver: maps a verified token subject to a local customer.

use sqlx::PgPool;
use tracing::instrument;

use emporium_core::Email;

use super::ServiceError;
use crate::db::CustomerRepository;
use crate::models::{Customer, ProfilePatch};

/// Message returned when a token subject has no local profile yet.
fn profile_not_found(external_id: &str) -> ServiceError {
    ServiceError::NotFound(format!(
        "Customer profile for user ID {external_id} not found."
    ))
}

/// Resolves and maintains customer profiles for authenticated subjects.
pub struct IdentityService<'a> {
    customers: CustomerRepository<'a>,
}

impl<'a> IdentityService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
        }
    }

    /// The local profile for `external_id`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the profile has never been synced.
    #[instrument(skip(self))]
    pub async fn resolve(&self, external_id: &str) -> Result<Customer, ServiceError> {
        self.customers
            .get_by_external_id(external_id)
            .await?
            .ok_or_else(|| profile_not_found(external_id))
    }

    /// Create the profile on first call, refresh it on later calls.
    ///
    /// Idempotent: repeated calls with the same input leave one row with the
    /// same contents.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the upsert fails.
    #[instrument(skip(self, email, patch))]
    pub async fn sync_profile(
        &self,
        external_id: &str,
        email: &Email,
        patch: &ProfilePatch,
    ) -> Result<Customer, ServiceError> {
        let customer = self.customers.upsert(external_id, email, patch).await?;
        tracing::info!(customer_id = %customer.id, "Customer profile synced");
        Ok(customer)
    }

    /// Change the provided names; email is never touched.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the profile does not exist.
    #[instrument(skip(self, patch))]
    pub async fn update_profile(
        &self,
        external_id: &str,
        patch: &ProfilePatch,
    ) -> Result<Customer, ServiceError> {
        self.customers
            .update_names(external_id, patch)
            .await?
            .ok_or_else(|| profile_not_found(external_id))
    }
}
