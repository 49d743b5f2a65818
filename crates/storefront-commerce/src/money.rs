//! Money type for representing monetary values.
//!
//! Amounts are held as integers in the currency's minor unit (paise for
//! INR, cents for USD) so that sums and products never drift.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "INR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol (e.g., "₹").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
        }
    }

    /// Number of minor units in one whole unit.
    pub fn minor_per_unit(&self) -> i64 {
        100
    }

    /// Parse a currency code string, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a Money value from whole currency units.
    ///
    /// Saturates at the i64 bounds.
    pub fn from_units(units: i64, currency: Currency) -> Self {
        Self::new(units.saturating_mul(currency.minor_per_unit()), currency)
    }

    /// Create a Money value from a decimal amount, rounding to the nearest
    /// minor unit.
    ///
    /// ```
    /// use storefront_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(1299.5, Currency::INR);
    /// assert_eq!(price.amount_minor, 129950);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_minor = (amount * currency.minor_per_unit() as f64).round() as i64;
        Self::new(amount_minor, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / self.currency.minor_per_unit() as f64
    }

    /// Round to whole currency units, halves rounding up.
    pub fn rounded_units(&self) -> i64 {
        round_half_up(self.amount_minor, self.currency.minor_per_unit())
    }

    /// Format as a display string (e.g., "₹1299.00").
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.to_decimal())
    }

    /// Try to add another Money value, returning None on currency mismatch
    /// or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_minor
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Divide `value` by `divisor` rounding halves towards positive infinity.
///
/// `divisor` must be positive. Saturates near `i64::MAX`.
pub fn round_half_up(value: i64, divisor: i64) -> i64 {
    value.saturating_add(divisor / 2).div_euclid(divisor)
}
