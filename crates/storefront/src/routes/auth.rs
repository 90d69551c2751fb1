//! Profile route handlers.
//!
//! The identity provider owns sign-up and sign-in. These endpoints keep the
//! local customer profile in step with the verified token.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use emporium_core::Email;

use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::middleware::RequireIdentity;
use crate::models::{Customer, ProfilePatch};
use crate::services::IdentityService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SyncProfileRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

fn required_name(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} should not be empty")));
    }
    Ok(trimmed.to_string())
}

impl SyncProfileRequest {
    fn validate(&self) -> Result<ProfilePatch> {
        Ok(ProfilePatch {
            first_name: Some(required_name(&self.first_name, "first_name")?),
            last_name: Some(required_name(&self.last_name, "last_name")?),
        })
    }
}

impl UpdateProfileRequest {
    fn validate(&self) -> Result<ProfilePatch> {
        Ok(ProfilePatch {
            first_name: self
                .first_name
                .as_deref()
                .map(|v| required_name(v, "first_name"))
                .transpose()?,
            last_name: self
                .last_name
                .as_deref()
                .map(|v| required_name(v, "last_name"))
                .transpose()?,
        })
    }
}

/// Create or refresh the caller's profile from the token and submitted names.
#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn sync_profile(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiJson(body): ApiJson<SyncProfileRequest>,
) -> Result<Json<Customer>> {
    let patch = body.validate()?;
    let email = Email::parse(&identity.email)
        .map_err(|e| AppError::BadRequest(format!("token email is invalid: {e}")))?;

    let customer = IdentityService::new(state.pool())
        .sync_profile(&identity.subject, &email, &patch)
        .await?;
    Ok(Json(customer))
}

/// The caller's profile.
#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn me(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<Customer>> {
    let customer = IdentityService::new(state.pool())
        .resolve(&identity.subject)
        .await?;
    Ok(Json(customer))
}

/// Change the caller's names.
#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn update_me(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Customer>> {
    let patch = body.validate()?;
    let customer = IdentityService::new(state.pool())
        .update_profile(&identity.subject, &patch)
        .await?;
    Ok(Json(customer))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_requires_both_names() {
        let body = SyncProfileRequest {
            first_name: "Ada".into(),
            last_name: " ".into(),
        };
        assert!(matches!(body.validate(), Err(AppError::BadRequest(msg)) if msg.contains("last_name")));
    }

    #[test]
    fn test_update_keeps_absent_names_absent() {
        let body = UpdateProfileRequest {
            first_name: Some(" Grace ".into()),
            last_name: None,
        };
        let patch = body.validate().unwrap();
        assert_eq!(patch.first_name.as_deref(), Some("Grace"));
        assert!(patch.last_name.is_none());
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let body = UpdateProfileRequest {
            first_name: Some(String::new()),
            last_name: None,
        };
        assert!(body.validate().is_err());
    }
}
