//! Security headers middleware.
//!
//! Pages are locked down to same-origin resources except for the hosted
//! payment widget, which needs its script, frames and API origin. The CSP
//! itself comes from the request's [`CspNonce`].

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Permissions Policy: everything off except the Payment Request API for the
/// provider's frames.
const PERMISSIONS_POLICY_VALUE: &str = "accelerometer=(), \
     camera=(), \
     display-capture=(), \
     geolocation=(), \
     gyroscope=(), \
     magnetometer=(), \
     microphone=(), \
     payment=(self \"https://js.stripe.com\"), \
     usb=()";

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin` (the provider's 3-D
///   Secure flow needs the origin)
/// - `Content-Security-Policy` (see [`CspNonce::policy`])
/// - `Permissions-Policy`
/// - `Cross-Origin-Opener-Policy: same-origin-allow-popups`
/// - `Cache-Control: no-store, max-age=0` unless the handler set one
pub async fn security_headers_middleware(mut request: Request, next: Next) -> Response {
    let nonce = CspNonce::generate();
    request.extensions_mut().insert(nonce.clone());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    if let Ok(value) = HeaderValue::from_str(&nonce.policy()) {
        headers.insert(CONTENT_SECURITY_POLICY, value);
    }
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(PERMISSIONS_POLICY_VALUE),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin-allow-popups"),
    );

    // Hashed static assets set their own long-lived cache header
    headers
        .entry(CACHE_CONTROL)
        .or_insert_with(|| HeaderValue::from_static("no-store, max-age=0"));

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router, body::Body, http::Request as HttpRequest, middleware, response::IntoResponse,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    async fn send(app: Router, uri: &str) -> Response {
        app.oneshot(HttpRequest::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn app() -> Router {
        Router::new()
            .route("/page", get(|| async { "page" }))
            .route(
                "/asset",
                get(|| async {
                    (
                        [(CACHE_CONTROL, "public, max-age=31536000, immutable")],
                        "asset",
                    )
                        .into_response()
                }),
            )
            .route(
                "/nonce",
                get(|nonce: CspNonce| async move { nonce.value().to_string() }),
            )
            .layer(middleware::from_fn(security_headers_middleware))
    }

    #[tokio::test]
    async fn test_csp_admits_payment_provider() {
        let response = send(app(), "/page").await;
        let csp = response
            .headers()
            .get(CONTENT_SECURITY_POLICY)
            .unwrap()
            .to_str()
            .unwrap();

        assert!(csp.contains("script-src 'self' 'nonce-"));
        assert!(csp.contains("https://js.stripe.com"));
        assert!(csp.contains("frame-src https://js.stripe.com"));
        assert!(csp.contains("connect-src 'self' https://api.stripe.com"));
        assert!(csp.contains("frame-ancestors 'none'"));
        assert_eq!(response.headers().get(X_FRAME_OPTIONS).unwrap(), "DENY");
    }

    #[tokio::test]
    async fn test_handler_nonce_matches_header() {
        use http_body_util::BodyExt;

        let response = send(app(), "/nonce").await;
        let csp = response
            .headers()
            .get(CONTENT_SECURITY_POLICY)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let nonce = String::from_utf8(body.to_vec()).unwrap();

        assert!(!nonce.is_empty());
        assert!(csp.contains(&format!("'nonce-{nonce}'")));
    }

    #[tokio::test]
    async fn test_cache_control_defaults_to_no_store() {
        let response = send(app(), "/page").await;
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "no-store, max-age=0"
        );
    }

    #[tokio::test]
    async fn test_cache_control_respects_handler_value() {
        let response = send(app(), "/asset").await;
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "public, max-age=31536000, immutable"
        );
    }
}
