//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//!
//! # Catalogue
//! GET  /products               - Product grid (+ pending flash message)
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart, 303 back to /products (rate limited)
//!
//! # Checkout
//! GET  /checkout?cart_id=N     - Create payment intent, mount payment widget
//! GET  /checkout/success       - Provider redirect landing
//!
//! # Orders
//! GET  /history                - Payment history
//! ```
//!
//! Every view fetches its data once per request. A failed fetch is logged and
//! rendered as the view's error or empty state; it never fails the request.

pub mod cart;
pub mod checkout;
pub mod history;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::cart_rate_limiter;
use crate::state::AppState;

/// Create the cart routes router.
///
/// `trust_proxy_headers` selects how the add-to-cart limiter identifies clients.
pub fn cart_routes(trust_proxy_headers: bool) -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(products::add_to_cart))
        .route_layer(cart_rate_limiter(trust_proxy_headers));

    Router::new().route("/", get(cart::show)).merge(mutations)
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/success", get(checkout::success))
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .nest("/cart", cart_routes(config.trust_proxy_headers))
        .nest("/checkout", checkout_routes())
        .route("/history", get(history::index))
}
