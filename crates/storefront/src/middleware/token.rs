//! Bearer token verification.
//!
//! Tokens are HS256 JWTs signed by the identity provider with a shared
//! secret. A valid token must carry `sub`, `email`, and `exp`; `aud` is
//! checked only when an audience is configured.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::JwtConfig;

/// Why a bearer token was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Missing bearer token")]
    Missing,
    #[error("Malformed bearer token")]
    Malformed,
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// The verified claims the storefront acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable identity-provider user id.
    pub subject: String,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    #[serde(default)]
    role: Option<String>,
}

/// Verifies bearer tokens against the configured secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("key", &"[REDACTED]")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(config.secret_bytes()),
            validation,
        }
    }

    /// Verify `token` and extract its identity claims.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing why the token was rejected.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    TokenError::Malformed
                }
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(TokenError::Invalid("empty subject".to_string()));
        }

        Ok(Identity {
            subject: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }

    /// Verify the value of an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Missing` if the header is absent and
    /// `TokenError::Malformed` if it is not a `Bearer` credential.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Identity, TokenError> {
        let header = header.ok_or(TokenError::Missing)?;
        let (scheme, token) = header.trim().split_once(' ').ok_or(TokenError::Malformed)?;
        if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
            return Err(TokenError::Malformed);
        }
        self.verify(token.trim())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{EncodingKey, Header, encode};
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;

    pub(crate) const TEST_SECRET: &str = "k4Qz!7vR#2mW9pL@xT5nB8cY$3hJ6fD0";

    pub(crate) fn jwt_config(audience: Option<&str>) -> JwtConfig {
        JwtConfig {
            secret: SecretString::from(TEST_SECRET),
            audience: audience.map(String::from),
        }
    }

    fn now() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    }

    pub(crate) fn mint(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    pub(crate) fn valid_token(subject: &str) -> String {
        mint(
            &json!({ "sub": subject, "email": "ada@example.com", "exp": now() + 3600 }),
            TEST_SECRET,
        )
    }

    #[test]
    fn test_valid_token() {
        let verifier = TokenVerifier::new(&jwt_config(None));
        let identity = verifier.verify(&valid_token("user-1")).unwrap();
        assert_eq!(identity.subject, "user-1");
        assert_eq!(identity.email, "ada@example.com");
        assert!(identity.role.is_none());
    }

    #[test]
    fn test_role_claim() {
        let verifier = TokenVerifier::new(&jwt_config(None));
        let token = mint(
            &json!({ "sub": "u", "email": "a@b.c", "role": "authenticated", "exp": now() + 60 }),
            TEST_SECRET,
        );
        assert_eq!(verifier.verify(&token).unwrap().role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn test_expired_token() {
        let verifier = TokenVerifier::new(&jwt_config(None));
        let token = mint(
            &json!({ "sub": "u", "email": "a@b.c", "exp": now() - 3600 }),
            TEST_SECRET,
        );
        assert_eq!(verifier.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret() {
        let verifier = TokenVerifier::new(&jwt_config(None));
        let token = mint(
            &json!({ "sub": "u", "email": "a@b.c", "exp": now() + 60 }),
            "a-completely-different-signing-key",
        );
        assert_eq!(verifier.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_missing_exp_rejected() {
        let verifier = TokenVerifier::new(&jwt_config(None));
        let token = mint(&json!({ "sub": "u", "email": "a@b.c" }), TEST_SECRET);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_audience_checked_when_configured() {
        let verifier = TokenVerifier::new(&jwt_config(Some("emporium")));
        let wrong = mint(
            &json!({ "sub": "u", "email": "a@b.c", "aud": "other", "exp": now() + 60 }),
            TEST_SECRET,
        );
        assert!(verifier.verify(&wrong).is_err());

        let right = mint(
            &json!({ "sub": "u", "email": "a@b.c", "aud": "emporium", "exp": now() + 60 }),
            TEST_SECRET,
        );
        assert!(verifier.verify(&right).is_ok());
    }

    #[test]
    fn test_header_parsing() {
        let verifier = TokenVerifier::new(&jwt_config(None));
        let token = valid_token("user-2");

        assert_eq!(verifier.verify_header(None), Err(TokenError::Missing));
        assert_eq!(verifier.verify_header(Some(&token)), Err(TokenError::Malformed));
        assert_eq!(
            verifier.verify_header(Some(&format!("Basic {token}"))),
            Err(TokenError::Malformed)
        );
        assert_eq!(verifier.verify_header(Some("Bearer garbage")), Err(TokenError::Malformed));
        assert!(verifier.verify_header(Some(&format!("bearer {token}"))).is_ok());
    }
}
