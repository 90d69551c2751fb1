//! Customer repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use emporium_core::{CustomerId, Email};

use super::RepositoryError;
use crate::models::{Customer, ProfilePatch};

const CUSTOMER_COLUMNS: &str =
    "id, external_id, email, first_name, last_name, registration_date, updated_at";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    external_id: String,
    email: String,
    first_name: String,
    last_name: String,
    registration_date: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            external_id: row.external_id,
            email,
            first_name: row.first_name,
            last_name: row.last_name,
            registration_date: row.registration_date,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for customer profiles.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a customer by identity-provider subject.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.customer WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Create or refresh a customer in one statement.
    ///
    /// A new row stores absent names as empty strings. An existing row gets
    /// the new email, and only the names that were provided.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        external_id: &str,
        email: &Email,
        patch: &ProfilePatch,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            INSERT INTO shop.customer (external_id, email, first_name, last_name)
            VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''))
            ON CONFLICT (external_id) DO UPDATE
            SET email = EXCLUDED.email,
                first_name = COALESCE($3, customer.first_name),
                last_name = COALESCE($4, customer.last_name),
                updated_at = NOW()
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(external_id)
        .bind(email.as_str())
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply a name patch. Returns `None` if the customer does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_names(
        &self,
        external_id: &str,
        patch: &ProfilePatch,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            UPDATE shop.customer
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                updated_at = NOW()
            WHERE external_id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(external_id)
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }
}
