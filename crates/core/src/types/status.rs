//! Status enums for backend-owned entities.

use serde::{Deserialize, Serialize};

/// Cart lifecycle status.
///
/// A cart is `active` while the user is shopping and becomes `checked_out`
/// once the backend records a payment for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[default]
    Active,
    CheckedOut,
}

impl CartStatus {
    /// Whether a checkout may be started from a cart in this status.
    #[must_use]
    pub const fn accepts_checkout(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::CheckedOut => write!(f, "checked_out"),
        }
    }
}

/// Payment status as recorded by the backend.
///
/// Unrecognised values decode as [`PaymentStatus::Unknown`] so one odd row
/// never hides the rest of the order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// CSS badge class used when listing payments.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Succeeded => "badge-success",
            Self::Failed => "badge-error",
            Self::Pending | Self::Unknown => "badge-warning",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_status_wire_format() {
        let status: CartStatus = serde_json::from_str("\"checked_out\"").unwrap();
        assert_eq!(status, CartStatus::CheckedOut);
        assert_eq!(status.to_string(), "checked_out");
        assert!(serde_json::from_str::<CartStatus>("\"abandoned\"").is_err());
    }

    #[test]
    fn test_only_active_cart_accepts_checkout() {
        assert!(CartStatus::Active.accepts_checkout());
        assert!(!CartStatus::CheckedOut.accepts_checkout());
    }

    #[test]
    fn test_payment_status_unknown_fallback() {
        let status: PaymentStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
        assert_eq!(status.badge_class(), "badge-warning");
    }

    #[test]
    fn test_payment_status_badges() {
        assert_eq!(PaymentStatus::Succeeded.badge_class(), "badge-success");
        assert_eq!(PaymentStatus::Pending.badge_class(), "badge-warning");
        assert_eq!(PaymentStatus::Failed.badge_class(), "badge-error");
    }
}
