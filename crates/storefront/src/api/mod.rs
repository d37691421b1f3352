//! Backend REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - The backend is the source of truth - no caching, no retries
//! - Every response body is a `{"data": ...}` envelope; failures carry
//!   `{"error": "..."}` and a non-success status
//!
//! # Endpoints
//!
//! ```text
//! GET  /cart/{user_id}              - Current cart
//! POST /cart                        - Add a product to the cart
//! GET  /products                    - Catalogue
//! POST /payments                    - Create a payment intent for a cart
//! GET  /payments/history/{user_id}  - Past payments
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use luxe_pay_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api);
//! let products = client.list_products().await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("(no error message)"))]
    Status {
        status: StatusCode,
        /// The backend's `error` field, if it sent one.
        message: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint path could not be joined onto the base URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Message fit to show a shopper, if the backend provided one.
    ///
    /// Only backend-authored `error` text qualifies; transport and parse
    /// errors stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Whether the backend refused the request (4xx) rather than failing.
    #[must_use]
    pub fn is_backend_rejection(&self) -> bool {
        matches!(self, Self::Status { status, .. } if status.is_client_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some("Cart is empty".to_string()),
        };
        assert_eq!(err.to_string(), "Backend returned 400 Bad Request: Cart is empty");

        let err = ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "Backend returned 502 Bad Gateway: (no error message)"
        );
    }

    #[test]
    fn test_user_message_only_for_backend_text() {
        let err = ApiError::Status {
            status: StatusCode::CONFLICT,
            message: Some("Out of stock".to_string()),
        };
        assert_eq!(err.user_message(), Some("Out of stock"));

        let err = ApiError::Status {
            status: StatusCode::CONFLICT,
            message: Some("   ".to_string()),
        };
        assert_eq!(err.user_message(), None);

        let parse_err = serde_json::from_str::<u32>("x").unwrap_err();
        assert_eq!(ApiError::Parse(parse_err).user_message(), None);
    }

    #[test]
    fn test_is_backend_rejection() {
        let err = ApiError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: None,
        };
        assert!(err.is_backend_rejection());

        let err = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert!(!err.is_backend_rejection());
    }
}
