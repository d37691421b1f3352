//! Per-request CSP nonce and the policy built around it.
//!
//! `security_headers_middleware` generates one nonce per request, stores it in
//! the request extensions for handlers, and writes the matching policy header.
//! Every script tag a template renders carries the nonce.

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// Origin serving the hosted payment widget.
pub const PAYMENT_PROVIDER_JS: &str = "https://js.stripe.com";

/// A 128-bit random nonce, base64-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CspNonce(pub String);

impl CspNonce {
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Full `Content-Security-Policy` value for a page rendered with this nonce.
    #[must_use]
    pub fn policy(&self) -> String {
        format!(
            "default-src 'none'; \
             script-src 'self' 'nonce-{nonce}' {PAYMENT_PROVIDER_JS}; \
             style-src 'self'; \
             font-src 'self'; \
             img-src 'self' data: https://*.stripe.com; \
             connect-src 'self' https://api.stripe.com; \
             frame-src {PAYMENT_PROVIDER_JS} https://hooks.stripe.com; \
             object-src 'none'; \
             base-uri 'self'; \
             form-action 'self'; \
             frame-ancestors 'none'",
            nonce = self.0
        )
    }
}

impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!("CSP nonce missing from request extensions");
            Self(String::new())
        }))
    }
}
