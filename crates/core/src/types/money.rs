//! Money in integer minor currency units.
//!
//! The backend reports every amount as an integer count of the currency's
//! smallest unit (cents for USD). Nothing here does arithmetic beyond line
//! totals; totals always come from the backend.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes.
///
/// The backend sends lowercase codes (`"usd"`); parsing is case-insensitive.
/// Codes without a known symbol decode to [`Currency::Other`] and display
/// with the code after the amount, so a single unexpected code never makes a
/// response unreadable. Amounts are always shown with two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
    /// Any other code, stored uppercase.
    Other(String),
}

impl Currency {
    /// Display symbol placed before the amount, if the currency has one.
    #[must_use]
    pub const fn symbol(&self) -> Option<&'static str> {
        match self {
            Self::Usd | Self::Cad | Self::Aud => Some("$"),
            Self::Eur => Some("€"),
            Self::Gbp => Some("£"),
            Self::Other(_) => None,
        }
    }

    /// Lowercase ISO code, as the backend and the payment provider use it.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Usd => "usd".to_string(),
            Self::Eur => "eur".to_string(),
            Self::Gbp => "gbp".to_string(),
            Self::Cad => "cad".to_string(),
            Self::Aud => "aud".to_string(),
            Self::Other(code) => code.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for Currency {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Self::Usd,
            "eur" => Self::Eur,
            "gbp" => Self::Gbp,
            "cad" => Self::Cad,
            "aud" => Self::Aud,
            other => Self::Other(other.to_ascii_uppercase()),
        })
    }
}

impl From<String> for Currency {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(currency) => currency,
            Err(never) => match never {},
        }
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code()
    }
}

/// An amount of money in minor units.
///
/// # Example
///
/// ```
/// use luxe_pay_core::{Currency, Money};
///
/// let total = Money::new(2500, Currency::Usd);
/// assert_eq!(total.display(), "$25.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the currency's smallest unit (e.g., cents for USD).
    pub amount: i64,
    /// ISO 4217 currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a USD amount from cents.
    #[must_use]
    pub const fn usd(cents: i64) -> Self {
        Self::new(cents, Currency::Usd)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: i64) -> Option<Self> {
        self.amount
            .checked_mul(quantity)
            .map(|amount| Self::new(amount, self.currency))
    }

    /// Format for display (e.g., "$19.99", "-$1.50").
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        let (major, minor) = (abs / 100, abs % 100);
        match (self.currency.symbol(), &self.currency) {
            (Some(symbol), _) => write!(f, "{sign}{symbol}{major}.{minor:02}"),
            (None, Currency::Other(code)) => write!(f, "{sign}{major}.{minor:02} {code}"),
            (None, _) => write!(f, "{sign}{major}.{minor:02}"),
        }
    }
}
