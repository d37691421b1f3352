//! Backend REST client implementation.
//!
//! Uses `reqwest` for HTTP. Each method is one request; there is no caching
//! and no retry. The caller decides how a failure is shown.

use std::sync::Arc;

use luxe_pay_core::UserId;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::instrument;
use url::Url;

use super::ApiError;
use super::types::{
    AddToCartRequest, Cart, CreatePaymentRequest, Envelope, ErrorBody, Payment, PaymentSetup,
    Product,
};
use crate::config::ApiConfig;

/// Client for the backend REST API.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.inner.client.get(url).send().await?;
        Self::read_envelope(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::read_envelope(response).await
    }

    /// Unwrap `{"data": ...}` or turn `{"error": ...}` into `ApiError::Status`.
    async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&response_text)
                .ok()
                .and_then(|body| body.error);
            let err = ApiError::Status { status, message };
            let body = response_text.chars().take(500).collect::<String>();
            if err.is_backend_rejection() {
                tracing::debug!(status = %status, body = %body, "Backend rejected request");
            } else {
                tracing::warn!(status = %status, body = %body, "Backend returned non-success status");
            }
            return Err(err);
        }

        match serde_json::from_str::<Envelope<T>>(&response_text) {
            Ok(envelope) => Ok(envelope.data),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the user's current cart.
    ///
    /// Returns `None` when the backend reports no cart (`"data": null`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response is malformed.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<Option<Cart>, ApiError> {
        self.get(&format!("cart/{user_id}")).await
    }

    /// Add a product to the user's cart.
    ///
    /// The updated cart in the response is not needed by any view and is
    /// skipped without decoding.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the backend rejects it.
    #[instrument(skip_all, fields(product_id = %request.product_id))]
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<(), ApiError> {
        let _: IgnoredAny = self.post("cart", request).await?;
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch the product catalogue.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("products").await
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Create a payment intent for a cart.
    ///
    /// Only the user and cart are sent; the backend computes the amount.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the backend rejects the cart.
    #[instrument(skip_all, fields(cart_id = %request.cart_id))]
    pub async fn create_payment(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<PaymentSetup, ApiError> {
        let setup: PaymentSetup = self.post("payments", request).await?;
        tracing::info!(
            payment_id = %setup.payment.id,
            amount = setup.payment.amount,
            "Payment intent created"
        );
        Ok(setup)
    }

    /// Fetch the user's payment history.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response is malformed.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn payment_history(&self, user_id: UserId) -> Result<Vec<Payment>, ApiError> {
        self.get(&format!("payments/history/{user_id}")).await
    }
}
