//! Cart page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::api::{Cart, CartItem};
use crate::filters;
use crate::state::AppState;

/// Line item display data.
#[derive(Clone, Debug)]
pub struct CartItemView {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price().display(),
            line_total: item.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone, Debug, Default)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Backend total, formatted.
    pub total: String,
    /// Link to the payment form; only set while the cart accepts checkout.
    pub checkout_url: Option<String>,
    pub checked_out: bool,
}

impl CartView {
    /// Build the view for an optional cart.
    ///
    /// A missing cart and a cart without items both produce the empty view.
    #[must_use]
    pub fn from_cart(cart: Option<&Cart>) -> Self {
        let Some(cart) = cart.filter(|c| !c.items.is_empty()) else {
            return Self::default();
        };

        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            checkout_url: cart
                .status
                .accepts_checkout()
                .then(|| format!("/checkout?cart_id={}", cart.id)),
            checked_out: !cart.status.accepts_checkout(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Display the demo user's cart.
///
/// A failed fetch is logged and shown as an empty cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let user_id = state.config().demo_user_id;

    let cart = match state.api().get_cart(user_id).await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!(%user_id, "Failed to fetch cart: {e}");
            None
        }
    };

    CartShowTemplate {
        cart: CartView::from_cart(cart.as_ref()),
    }
}
