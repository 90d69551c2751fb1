//! Customer profile domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use emporium_core::{CustomerId, Email};

/// A local customer profile, created on first identity sync.
///
/// Serializes as the profile returned by `/auth/me`.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    #[serde(rename = "customer_id")]
    pub id: CustomerId,
    /// Subject of the identity provider's token.
    pub external_id: String,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub registration_date: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// Optional name changes. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
