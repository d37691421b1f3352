//! Session-related types.
//!
//! The session only carries one-shot flash messages between a form post and
//! the page it redirects to. Nothing else is stored client-side.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS class for the message banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
        }
    }
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Store this flash for the next page render.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn store(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::FLASH, self).await
    }

    /// Remove and return the pending flash, if any.
    ///
    /// Store errors are logged and treated as "no flash".
    pub async fn take(session: &Session) -> Option<Self> {
        match session.remove::<Self>(keys::FLASH).await {
            Ok(flash) => flash,
            Err(e) => {
                tracing::warn!("Failed to read flash from session: {e}");
                None
            }
        }
    }
}
