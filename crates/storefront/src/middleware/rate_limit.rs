//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Only the cart mutation endpoint is limited: it is the one route that
//! writes to the backend on every request.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor for the client's IP address.
///
/// By default the key is the socket peer (`ConnectInfo<SocketAddr>`), which a
/// client cannot forge. Behind a reverse proxy every peer is the proxy, so
/// `trust_proxy_headers` switches to `X-Forwarded-For` (first hop) and then
/// `X-Real-IP`, falling back to the peer. Only enable it when a proxy that
/// overwrites those headers sits in front of the storefront.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    fn from_proxy_headers<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        self.trust_proxy_headers
            .then(|| Self::from_proxy_headers(req))
            .flatten()
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Requests a single client may send back to back.
pub const CART_BURST: u32 = 10;

/// Create rate limiter for cart mutations: ~30 requests per minute per IP.
///
/// Configuration: 1 token every 2 seconds, burst of [`CART_BURST`].
///
/// # Panics
///
/// This function will not panic. `per_second(2)` and `burst_size(10)` are
/// positive and always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn cart_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(2)
        .burst_size(CART_BURST)
        .finish()
        .expect("rate limiter config with per_second(2) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: false,
    };
    const PROXIED: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: true,
    };

    fn request_from(peer: &str) -> axum::http::request::Builder {
        Request::builder()
            .uri("/cart/add")
            .extension(ConnectInfo(peer.parse::<SocketAddr>().unwrap()))
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_direct_mode_ignores_client_headers() {
        let req = request_from("192.0.2.9:5555")
            .header("x-forwarded-for", "203.0.113.7")
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(DIRECT.extract(&req).unwrap(), ip("192.0.2.9"));
    }

    #[test]
    fn test_proxied_forwarded_for_first_hop_wins() {
        let req = request_from("10.0.0.1:443")
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(PROXIED.extract(&req).unwrap(), ip("203.0.113.7"));
    }

    #[test]
    fn test_proxied_real_ip_then_peer_fallback() {
        let req = request_from("10.0.0.1:443")
            .header("x-forwarded-for", "garbage")
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(PROXIED.extract(&req).unwrap(), ip("198.51.100.2"));

        let req = request_from("10.0.0.1:443").body(()).unwrap();
        assert_eq!(PROXIED.extract(&req).unwrap(), ip("10.0.0.1"));
    }

    #[test]
    fn test_no_source_is_an_error() {
        let req = Request::builder().uri("/cart/add").body(()).unwrap();
        assert!(DIRECT.extract(&req).is_err());
        assert!(PROXIED.extract(&req).is_err());
    }
}
