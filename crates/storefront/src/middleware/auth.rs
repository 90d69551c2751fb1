//! Authentication extractor.
//!
//! Route handlers that need a caller take [`RequireIdentity`]; the token is
//! verified against the shared [`TokenVerifier`] in application state.
//! Resolving the identity to a local customer is left to the handler so it
//! can validate its input first.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use super::token::{Identity, TokenVerifier};
use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireIdentity(identity): RequireIdentity) -> String {
///     identity.subject
/// }
/// ```
pub struct RequireIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequireIdentity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let identity = authenticate(state.verifier(), header)?;
        Ok(Self(identity))
    }
}

fn authenticate(verifier: &TokenVerifier, header: Option<&str>) -> Result<Identity, AppError> {
    let identity = verifier.verify_header(header).map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        AppError::Unauthorized(e.to_string())
    })?;

    tracing::Span::current().record("subject", identity.subject.as_str());
    set_sentry_user(&identity.subject, &identity.email);
    Ok(identity)
}
