//! Rendering of the catalogue, cart and history pages against a fake backend.

#![allow(clippy::unwrap_used)]

use axum::{Json, Router, http::StatusCode, routing::get};
use luxe_pay_integration_tests::{
    cart_json, envelope, get_page, payment_json, product_json, static_urls, storefront_with,
    storefront_without_backend,
};
use serde_json::{Value, json};

fn backend_with_cart(cart: Value) -> Router {
    Router::new().route(
        "/cart/{user_id}",
        get(move || {
            let cart = cart.clone();
            async move { Json(envelope(cart)) }
        }),
    )
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_is_ok_without_backend() {
    let app = storefront_without_backend().await;
    let response = get_page(&app, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_readiness_reflects_backend() {
    let backend = Router::new().route("/products", get(|| async { Json(envelope(json!([]))) }));
    let app = storefront_with(backend).await;
    assert_eq!(get_page(&app, "/health/ready", None).await.status, StatusCode::OK);

    let app = storefront_without_backend().await;
    assert_eq!(
        get_page(&app, "/health/ready", None).await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = storefront_without_backend().await;
    assert_eq!(get_page(&app, "/nope", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hashed_stylesheet_is_served_immutable() {
    let app = storefront_without_backend().await;
    let page = get_page(&app, "/", None).await;

    let stylesheet = static_urls(&page.body)
        .into_iter()
        .find(|url| url.ends_with(".css"))
        .unwrap();
    assert!(stylesheet.starts_with("/static/css/"));

    let response = get_page(&app, stylesheet, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.is_empty());
    assert_eq!(
        response.headers.get("cache-control").unwrap(),
        "public, max-age=31536000, immutable"
    );
}

#[tokio::test]
async fn test_home_links_to_products_and_cart() {
    let app = storefront_without_backend().await;
    let response = get_page(&app, "/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("href=\"/products\""));
    assert!(response.body.contains("href=\"/cart\""));
}

#[tokio::test]
async fn test_pages_carry_security_headers() {
    let app = storefront_without_backend().await;
    let response = get_page(&app, "/", None).await;

    let csp = response
        .headers
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.contains("'nonce-"));
    assert!(csp.contains("https://js.stripe.com"));
    assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers.contains_key("x-request-id"));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_products_grid() {
    let backend = Router::new().route(
        "/products",
        get(|| async {
            Json(envelope(json!([
                product_json(1, "Chronograph", 129_900, 3),
                product_json(2, "Signet Ring", 45_000, 0),
            ])))
        }),
    );
    let app = storefront_with(backend).await;
    let response = get_page(&app, "/products", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Chronograph"));
    assert!(response.body.contains("$1299.00"));
    assert!(response.body.contains("Signet Ring"));
    assert!(response.body.contains("$450.00"));
}

#[tokio::test]
async fn test_sold_out_product_has_disabled_control() {
    let backend = Router::new().route(
        "/products",
        get(|| async { Json(envelope(json!([product_json(2, "Signet Ring", 45_000, 0)]))) }),
    );
    let app = storefront_with(backend).await;
    let body = get_page(&app, "/products", None).await.body;

    assert!(body.contains("Sold out"));
    assert!(body.contains("disabled"));
    assert!(!body.contains("Add to Cart"));
    assert!(!body.contains("action=\"/cart/add\""));
}

#[tokio::test]
async fn test_empty_catalogue() {
    let backend = Router::new().route("/products", get(|| async { Json(envelope(json!([]))) }));
    let app = storefront_with(backend).await;
    let body = get_page(&app, "/products", None).await.body;
    assert!(body.contains("No products available"));
}

#[tokio::test]
async fn test_products_fetch_failure_renders_error_state() {
    let app = storefront_without_backend().await;
    let response = get_page(&app, "/products", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Unable to load products"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_cart_shows_backend_total() {
    let app = storefront_with(backend_with_cart(cart_json(
        "active",
        &[(1000, 2), (500, 1)],
        2500,
    )))
    .await;
    let body = get_page(&app, "/cart", None).await.body;

    assert!(body.contains("$25.00"));
    assert!(body.contains("$20.00"));
    assert!(body.contains("Proceed to Checkout"));
    assert!(body.contains("/checkout?cart_id=42"));
}

#[tokio::test]
async fn test_empty_cart_has_no_checkout_control() {
    let app = storefront_with(backend_with_cart(cart_json("active", &[], 0))).await;
    let body = get_page(&app, "/cart", None).await.body;

    assert!(body.contains("Your cart is empty"));
    assert!(!body.contains("Proceed to Checkout"));
}

#[tokio::test]
async fn test_missing_cart_is_empty_state() {
    let app = storefront_with(backend_with_cart(Value::Null)).await;
    let body = get_page(&app, "/cart", None).await.body;
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_checked_out_cart_has_no_checkout_control() {
    let app = storefront_with(backend_with_cart(cart_json(
        "checked_out",
        &[(1000, 1)],
        1000,
    )))
    .await;
    let body = get_page(&app, "/cart", None).await.body;

    assert!(body.contains("This cart has been checked out"));
    assert!(!body.contains("Proceed to Checkout"));
    assert!(!body.contains("/checkout?cart_id"));
}

#[tokio::test]
async fn test_cart_fetch_failure_is_empty_state() {
    let app = storefront_without_backend().await;
    let response = get_page(&app, "/cart", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Your cart is empty"));
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history_rows() {
    let backend = Router::new().route(
        "/payments/history/{user_id}",
        get(|| async {
            Json(envelope(json!([
                payment_json(2, 2500, "succeeded", "2026-03-03T14:15:00Z", "pi_newer"),
                payment_json(1, 990, "failed", "2026-02-28T09:05:00Z", "pi_older"),
            ])))
        }),
    );
    let app = storefront_with(backend).await;
    let body = get_page(&app, "/history", None).await.body;

    assert!(body.contains("March 3, 2026"));
    assert!(body.contains("02:15 PM"));
    assert!(body.contains("$25.00"));
    assert!(body.contains("$9.90"));
    assert!(body.contains("badge-success"));
    assert!(body.contains("badge-error"));
    assert!(body.find("pi_newer").unwrap() < body.find("pi_older").unwrap());
}

#[tokio::test]
async fn test_unlisted_currency_row_does_not_hide_history() {
    let backend = Router::new().route(
        "/payments/history/{user_id}",
        get(|| async {
            let mut foreign = payment_json(2, 2500, "succeeded", "2026-03-03T14:15:00Z", "pi_jpy");
            foreign["currency"] = json!("jpy");
            Json(envelope(json!([
                foreign,
                payment_json(1, 990, "failed", "2026-02-28T09:05:00Z", "pi_usd"),
            ])))
        }),
    );
    let app = storefront_with(backend).await;
    let body = get_page(&app, "/history", None).await.body;

    assert!(!body.contains("Unable to load order history"));
    assert!(body.contains("pi_jpy"));
    assert!(body.contains("25.00 JPY"));
    assert!(body.contains("pi_usd"));
    assert!(body.contains("$9.90"));
}

#[tokio::test]
async fn test_empty_history_is_not_an_error() {
    let backend = Router::new().route(
        "/payments/history/{user_id}",
        get(|| async { Json(envelope(json!([]))) }),
    );
    let app = storefront_with(backend).await;
    let body = get_page(&app, "/history", None).await.body;

    assert!(body.contains("No orders yet"));
    assert!(!body.contains("Unable to load order history"));
}

#[tokio::test]
async fn test_history_fetch_failure() {
    let backend = Router::new().route(
        "/payments/history/{user_id}",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "database unavailable" })),
            )
        }),
    );
    let app = storefront_with(backend).await;
    let body = get_page(&app, "/history", None).await.body;

    assert!(body.contains("Unable to load order history"));
    assert!(!body.contains("No orders yet"));
}
