//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LUXE_API_URL` - Base URL of the backend REST service
//! - `STRIPE_PUBLISHABLE_KEY` - Payment provider publishable key (`pk_...`)
//!
//! ## Optional
//! - `LUXE_HOST` - Bind address (default: 127.0.0.1)
//! - `LUXE_PORT` - Listen port (default: 3000)
//! - `LUXE_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `LUXE_DEMO_USER_ID` - User the demo acts as (default: 1)
//! - `LUXE_STATIC_DIR` - Directory served under `/static` (default: crates/storefront/static)
//! - `LUXE_TRUST_PROXY_HEADERS` - Key rate limits on `X-Forwarded-For`/`X-Real-IP`
//!   instead of the socket peer (default: false; only behind a trusted proxy)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use luxe_pay_core::UserId;
use thiserror::Error;
use url::Url;

/// Static asset directory, relative to the workspace root.
pub const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";

/// Prefix every publishable key carries.
const PUBLISHABLE_KEY_PREFIX: &str = "pk_";

/// Prefixes of provider keys that must stay on a server.
const SERVER_ONLY_KEY_PREFIXES: &[&str] = &["sk_", "rk_"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure key in {0}: {1}")]
    InsecureKey(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Backend REST API configuration
    pub api: ApiConfig,
    /// Payment provider configuration
    pub payments: PaymentsConfig,
    /// The user every request acts as
    pub demo_user_id: UserId,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Trust client-address headers set by a reverse proxy
    pub trust_proxy_headers: bool,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it.
    pub base_url: Url,
}

/// Payment provider configuration.
///
/// Only the publishable key lives here. It is rendered into the checkout page,
/// so a secret key in this slot would be published to every visitor.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// Publishable key (safe to expose in browser)
    pub publishable_key: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the payment key is not a publishable key.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("LUXE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("LUXE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("LUXE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("LUXE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("LUXE_BASE_URL", "http://localhost:3000");
        let demo_user_id = get_env_or_default("LUXE_DEMO_USER_ID", "1")
            .parse::<UserId>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LUXE_DEMO_USER_ID".to_string(), e.to_string())
            })?;

        let api = ApiConfig::from_env()?;
        let payments = PaymentsConfig::from_env()?;
        let static_dir = PathBuf::from(get_env_or_default("LUXE_STATIC_DIR", DEFAULT_STATIC_DIR));
        let trust_proxy_headers =
            parse_bool(&get_env_or_default("LUXE_TRUST_PROXY_HEADERS", "false"))
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "LUXE_TRUST_PROXY_HEADERS".to_string(),
                        "expected true or false".to_string(),
                    )
                })?;
        let log_format = LogFormat::parse(&get_env_or_default("LOG_FORMAT", "text"));

        Ok(Self {
            host,
            port,
            base_url,
            api,
            payments,
            demo_user_id,
            static_dir,
            trust_proxy_headers,
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    /// Build from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_api_url(base_url, "LUXE_API_URL")?,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        Self::new(&get_required_env("LUXE_API_URL")?)
    }
}

impl PaymentsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let key = get_required_env("STRIPE_PUBLISHABLE_KEY")?;
        validate_publishable_key(&key, "STRIPE_PUBLISHABLE_KEY")?;
        Ok(Self {
            publishable_key: key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`).
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Parse the backend base URL.
///
/// A trailing slash is added so `Url::join` appends endpoint paths instead of
/// replacing the last path segment.
fn parse_api_url(raw: &str, var_name: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Validate that a payment key is safe to render into a public page.
fn validate_publishable_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    let key = key.trim();

    for prefix in SERVER_ONLY_KEY_PREFIXES {
        if key.starts_with(prefix) {
            return Err(ConfigError::InsecureKey(
                var_name.to_string(),
                format!("'{prefix}' keys are server-side secrets and must never reach the browser"),
            ));
        }
    }

    if !key.starts_with(PUBLISHABLE_KEY_PREFIX) || key.len() <= PUBLISHABLE_KEY_PREFIX.len() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected a publishable key starting with '{PUBLISHABLE_KEY_PREFIX}'"),
        ));
    }

    Ok(())
}
