//! Checkout handlers: payment form and the provider's redirect landing.
//!
//! The handshake is split between server and browser. The server asks the
//! backend for a payment intent for the cart (the backend computes the
//! amount) and renders the hosted payment widget with the returned client
//! secret. Card details are entered into the provider's frames and confirmed
//! by `static/js/checkout.js` directly with the provider; this application
//! never receives them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use luxe_pay_core::CartId;
use serde::Deserialize;
use tracing::instrument;

use crate::api::{CreatePaymentRequest, PaymentSetup};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

pub const MISSING_CART_MESSAGE: &str = "Missing cart reference";
pub const INIT_FAILED_MESSAGE: &str = "Failed to initialize payment";
pub const PAYMENT_FAILED_MESSAGE: &str = "Payment failed";

/// Path the provider redirects back to after an off-page confirmation.
pub const SUCCESS_PATH: &str = "/checkout/success";

/// Query of `GET /checkout`.
///
/// `cart_id` stays a string so a malformed value renders the error view
/// instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub cart_id: Option<String>,
}

impl CheckoutQuery {
    fn cart_id(&self) -> Option<CartId> {
        self.cart_id.as_deref()?.trim().parse().ok()
    }
}

/// Query the provider appends when redirecting to [`SUCCESS_PATH`].
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub payment_intent: Option<String>,
    pub redirect_status: Option<String>,
}

/// Outcome of a confirmation that finished with a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Succeeded,
    Processing,
    Failed,
}

impl ConfirmationOutcome {
    /// Map the provider's `redirect_status`.
    ///
    /// No status means the page was reached from the inline success panel.
    #[must_use]
    pub fn from_redirect_status(status: Option<&str>) -> Self {
        match status {
            None | Some("succeeded") => Self::Succeeded,
            Some("processing") => Self::Processing,
            Some(_) => Self::Failed,
        }
    }
}

/// Everything `checkout.js` needs to mount the payment widget.
#[derive(Clone)]
pub struct PaymentFormView {
    pub publishable_key: String,
    pub client_secret: String,
    /// Server-computed amount, formatted.
    pub amount: String,
    pub return_url: String,
}

impl PaymentFormView {
    #[must_use]
    pub fn new(publishable_key: &str, base_url: &str, setup: PaymentSetup) -> Self {
        Self {
            publishable_key: publishable_key.to_string(),
            amount: setup.payment.amount().display(),
            client_secret: setup.client_secret,
            return_url: format!("{}{SUCCESS_PATH}", base_url.trim_end_matches('/')),
        }
    }
}

impl std::fmt::Debug for PaymentFormView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentFormView")
            .field("amount", &self.amount)
            .field("return_url", &self.return_url)
            .finish_non_exhaustive()
    }
}

/// Payment form page.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/pay.html")]
pub struct CheckoutPayTemplate {
    pub form: PaymentFormView,
    pub nonce: String,
}

/// Terminal error view with a link back to the cart.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/error.html")]
pub struct CheckoutErrorTemplate {
    pub message: String,
}

impl CheckoutErrorTemplate {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Confirmation view.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    /// Provider still settling the payment.
    pub processing: bool,
    pub payment_reference: Option<String>,
}

/// Create a payment intent for the cart and render the payment form.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<CheckoutQuery>,
    nonce: CspNonce,
) -> Response {
    let Some(cart_id) = query.cart_id() else {
        tracing::debug!("Checkout without a usable cart_id");
        return CheckoutErrorTemplate::new(MISSING_CART_MESSAGE).into_response();
    };

    let config = state.config();
    let request = CreatePaymentRequest {
        user_id: config.demo_user_id,
        cart_id,
    };

    match state.api().create_payment(&request).await {
        Ok(setup) => {
            add_breadcrumb(
                "checkout",
                "Payment intent created",
                Some(&[("payment_id", &setup.payment.id.to_string())]),
            );
            CheckoutPayTemplate {
                form: PaymentFormView::new(
                    &config.payments.publishable_key,
                    &config.base_url,
                    setup,
                ),
                nonce: nonce.value().to_string(),
            }
            .into_response()
        }
        Err(e) => {
            tracing::warn!(%cart_id, "Failed to create payment intent: {e}");
            CheckoutErrorTemplate::new(e.user_message().unwrap_or(INIT_FAILED_MESSAGE))
                .into_response()
        }
    }
}

/// Landing page for provider redirects and the inline success link.
#[instrument]
pub async fn success(Query(query): Query<RedirectQuery>) -> Response {
    let outcome = ConfirmationOutcome::from_redirect_status(query.redirect_status.as_deref());

    match outcome {
        ConfirmationOutcome::Succeeded | ConfirmationOutcome::Processing => {
            add_breadcrumb("checkout", "Payment confirmed", None);
            CheckoutSuccessTemplate {
                processing: outcome == ConfirmationOutcome::Processing,
                payment_reference: query.payment_intent,
            }
            .into_response()
        }
        ConfirmationOutcome::Failed => {
            tracing::info!(
                status = query.redirect_status.as_deref().unwrap_or_default(),
                "Payment redirect reported failure"
            );
            CheckoutErrorTemplate::new(PAYMENT_FAILED_MESSAGE).into_response()
        }
    }
}
