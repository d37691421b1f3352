//! Integration test harness for the Luxe Pay storefront.
//!
//! Each test stands up a fake backend (an axum router on an ephemeral port)
//! and drives the real storefront router against it with
//! `tower::ServiceExt::oneshot`. No external services are needed:
//!
//! ```bash
//! cargo test -p luxe-pay-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode, header, request},
};
use http_body_util::BodyExt;
use luxe_pay_core::UserId;
use luxe_pay_storefront::{
    build_router,
    config::{ApiConfig, LogFormat, PaymentsConfig, StorefrontConfig},
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

/// Publishable key every test storefront is configured with.
pub const TEST_PUBLISHABLE_KEY: &str = "pk_test_luxe";

/// Socket peer attached to form posts so the rate limiter can key them.
pub const TEST_CLIENT_ADDR: &str = "203.0.113.7:50123";

/// Serve `router` on `127.0.0.1:0` and return its base URL.
pub async fn spawn_backend(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// A base URL nothing listens on.
pub async fn unreachable_backend() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// The storefront crate's `static/` directory, independent of the test's
/// working directory.
pub fn storefront_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static")
}

/// Storefront configuration pointed at `backend`.
pub fn test_config(backend: &Url) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        api: ApiConfig::new(backend.as_str()).unwrap(),
        payments: PaymentsConfig {
            publishable_key: TEST_PUBLISHABLE_KEY.to_string(),
        },
        demo_user_id: UserId::new(1),
        static_dir: storefront_static_dir(),
        trust_proxy_headers: false,
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Full storefront router backed by a fake backend.
pub async fn storefront_with(backend: Router) -> Router {
    let url = spawn_backend(backend).await;
    build_router(AppState::new(test_config(&url)))
}

/// Full storefront router backed by a fake backend, with a tweaked config.
pub async fn storefront_with_config(
    backend: Router,
    configure: impl FnOnce(&mut StorefrontConfig),
) -> Router {
    let url = spawn_backend(backend).await;
    let mut config = test_config(&url);
    configure(&mut config);
    build_router(AppState::new(config))
}

/// Full storefront router whose backend is down.
pub async fn storefront_without_backend() -> Router {
    let url = unreachable_backend().await;
    build_router(AppState::new(test_config(&url)))
}

/// A collected response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `name=value` of the session cookie, if one was set.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("luxe_session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Send one request through a clone of `app` and collect the response.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// `GET uri`, optionally with a cookie.
pub async fn get_page(app: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// Builder for a url-encoded `POST uri` arriving from [`TEST_CLIENT_ADDR`].
///
/// `oneshot` bypasses the listener, so the peer address a served request
/// would carry is attached by hand.
pub fn form_request(uri: &str) -> request::Builder {
    let peer: SocketAddr = TEST_CLIENT_ADDR.parse().unwrap();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .extension(ConnectInfo(peer))
}

/// `POST uri` with a url-encoded form body.
pub async fn post_form(app: &Router, uri: &str, form: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = form_request(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(form.to_string())).unwrap()).await
}

/// Every `/static/...` URL referenced by an `href` or `src` attribute.
pub fn static_urls(body: &str) -> Vec<&str> {
    ["href=\"", "src=\""]
        .iter()
        .flat_map(|attr| body.split(attr).skip(1))
        .filter_map(|rest| rest.split('"').next())
        .filter(|url| url.starts_with("/static/"))
        .collect()
}

// =============================================================================
// Backend fixtures
// =============================================================================

/// `{"data": value}`.
pub fn envelope(value: Value) -> Value {
    json!({ "data": value })
}

pub fn product_json(id: i64, name: &str, price: i64, stock: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "stock": stock,
    })
}

pub fn cart_json(status: &str, items: &[(i64, i64)], total: i64) -> Value {
    let items: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, (unit_price, quantity))| {
            let id = i64::try_from(i).unwrap() + 1;
            json!({
                "id": id,
                "product_id": id,
                "quantity": quantity,
                "unit_price": unit_price,
                "product_name": format!("Item {id}"),
            })
        })
        .collect();

    json!({
        "id": 42,
        "user_id": 1,
        "status": status,
        "items": items,
        "total": total,
    })
}

pub fn payment_json(id: i64, amount: i64, status: &str, created_at: &str, reference: &str) -> Value {
    json!({
        "id": id,
        "amount": amount,
        "currency": "usd",
        "status": status,
        "created_at": created_at,
        "stripe_payment_intent_id": reference,
    })
}
