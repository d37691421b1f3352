//! Wire types for the backend REST API.
//!
//! All records are owned by the backend and consumed read-only. Amounts are
//! integers in minor currency units; [`Money`] gives them a display form.

use chrono::{DateTime, Utc};
use luxe_pay_core::{
    CartId, CartItemId, CartStatus, Currency, Money, PaymentId, PaymentStatus, ProductId, UserId,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Envelopes
// =============================================================================

/// Success envelope: every backend response wraps its payload in `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// A product offered in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in minor units.
    pub price: i64,
    /// Units available; zero means sold out.
    pub stock: i64,
}

impl Product {
    /// Unit price as money.
    #[must_use]
    pub const fn price(&self) -> Money {
        Money::usd(self.price)
    }

    /// Whether the product can still be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A line in a cart, with price and name snapshotted at the time of adding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price snapshot in minor units.
    pub unit_price: i64,
    /// Product name snapshot.
    pub product_name: String,
}

impl CartItem {
    /// Unit price as money.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        Money::usd(self.unit_price)
    }

    /// `unit_price * quantity`, for display only.
    ///
    /// Falls back to the unit price if the product overflows.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price()
            .checked_mul(self.quantity)
            .unwrap_or_else(|| self.unit_price())
    }
}

/// A user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub status: CartStatus,
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Backend-computed total in minor units.
    pub total: i64,
}

impl Cart {
    /// Backend total as money.
    #[must_use]
    pub const fn total(&self) -> Money {
        Money::usd(self.total)
    }
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCartRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
}

// =============================================================================
// Payments
// =============================================================================

/// A payment recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// Amount in minor units, computed by the backend from the cart.
    pub amount: i64,
    #[serde(default)]
    pub currency: Currency,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    /// Payment provider reference (payment intent id).
    pub stripe_payment_intent_id: String,
}

impl Payment {
    /// Amount as money.
    #[must_use]
    pub fn amount(&self) -> Money {
        Money::new(self.amount, self.currency.clone())
    }
}

/// Body of `POST /payments`.
///
/// Carries no amount; the backend prices the cart.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentRequest {
    pub user_id: UserId,
    pub cart_id: CartId,
}

/// Response of `POST /payments`.
///
/// Implements `Debug` manually to keep the client secret out of logs.
#[derive(Clone, Deserialize)]
pub struct PaymentSetup {
    /// Secret authorising one client-side confirmation.
    pub client_secret: String,
    pub payment: Payment,
}

impl std::fmt::Debug for PaymentSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSetup")
            .field("client_secret", &"[REDACTED]")
            .field("payment", &self.payment)
            .finish()
    }
}
