//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span with `request_id` and `subject` fields)
//! 3. Request ID (reuse or generate, echo on response)
//! 4. Security headers
//! 5. Request timeout
//!
//! Authentication is an extractor, not a layer: see [`RequireIdentity`].

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod token;

pub use auth::RequireIdentity;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use token::{Identity, TokenError, TokenVerifier};
