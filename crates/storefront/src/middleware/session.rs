//! Session middleware configuration.
//!
//! Sessions hold nothing but one-shot flash messages, so an in-memory store
//! is enough; a restart only drops a pending "Added to cart!" banner.

use tower_sessions::{Expiry, SessionManagerLayer};

use super::session_store::BoundedMemoryStore;
use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "luxe_session";

/// Session expiry time in seconds (1 hour).
const SESSION_EXPIRY_SECONDS: i64 = 60 * 60;

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<BoundedMemoryStore> {
    SessionManagerLayer::new(BoundedMemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
