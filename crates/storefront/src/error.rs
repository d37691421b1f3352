//! Storefront error type and its HTTP mapping.
//!
//! Views render their own error states for failed fetches; `AppError` only
//! covers failures with no view to fall back to (unknown paths, a session
//! store that refuses a write). Server-side variants are reported to Sentry
//! before responding.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Session store rejected a read or write.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// No route for this path.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Text safe to show a visitor.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::Session(_) => "Internal server error",
            Self::NotFound(_) => "Page not found",
        }
    }

    const fn is_server_fault(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request failed"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a user action as a Sentry breadcrumb.
///
/// Shows up in the trail attached to any later error report.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let data = data
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}
