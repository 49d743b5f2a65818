//! Pricing engine.
//!
//! Turns (unit price, quantity) pairs into the four figures shown at
//! checkout. Item sums are exact in minor units; each published figure is
//! rounded half-up to whole currency units.

use crate::error::CommerceError;
use crate::money::{round_half_up, Currency, Money};
use serde::{Deserialize, Serialize};

/// GST rate applied to the item subtotal, in percent.
pub const TAX_RATE_PERCENT: i64 = 18;

/// Item subtotals strictly above this many whole units ship free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 999;

/// Flat shipping fee in whole units below the threshold.
pub const FLAT_SHIPPING_FEE: i64 = 50;

/// Price figures for a set of lines, in whole currency units.
///
/// `total_price == items_price + tax_price + shipping_price` always holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Number of units across all lines.
    pub items: i64,
    pub items_price: i64,
    pub tax_price: i64,
    pub shipping_price: i64,
    pub total_price: i64,
}

impl PriceBreakdown {
    /// Check the total identity.
    pub fn is_consistent(&self) -> bool {
        self.items_price
            .checked_add(self.tax_price)
            .and_then(|sum| sum.checked_add(self.shipping_price))
            == Some(self.total_price)
    }
}

/// Price a list of lines.
///
/// Every line must be in `currency` and have a positive quantity.
pub fn price_lines<I>(lines: I, currency: Currency) -> Result<PriceBreakdown, CommerceError>
where
    I: IntoIterator<Item = (Money, i64)>,
{
    let mut exact_minor: i64 = 0;
    let mut items: i64 = 0;

    for (unit_price, quantity) in lines {
        if unit_price.currency != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: unit_price.currency.code().to_string(),
            });
        }
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let line = unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        exact_minor = exact_minor
            .checked_add(line.amount_minor)
            .ok_or(CommerceError::Overflow)?;
        items = items.checked_add(quantity).ok_or(CommerceError::Overflow)?;
    }

    let per_unit = currency.minor_per_unit();
    let items_price = round_half_up(exact_minor, per_unit);
    let tax_price = round_half_up(
        exact_minor
            .checked_mul(TAX_RATE_PERCENT)
            .ok_or(CommerceError::Overflow)?,
        per_unit * 100,
    );
    let shipping_price = if exact_minor > FREE_SHIPPING_THRESHOLD * per_unit {
        0
    } else {
        FLAT_SHIPPING_FEE
    };
    let total_price = items_price
        .checked_add(tax_price)
        .and_then(|sum| sum.checked_add(shipping_price))
        .ok_or(CommerceError::Overflow)?;

    Ok(PriceBreakdown {
        items,
        items_price,
        tax_price,
        shipping_price,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inr(units: i64) -> Money {
        Money::from_units(units, Currency::INR)
    }

    fn single(units: i64) -> PriceBreakdown {
        price_lines(vec![(inr(units), 1)], Currency::INR).unwrap()
    }

    #[test]
    fn test_two_units_at_500_ship_free() {
        let pricing = price_lines(vec![(inr(500), 2)], Currency::INR).unwrap();
        assert_eq!(pricing.items_price, 1000);
        assert_eq!(pricing.tax_price, 180);
        assert_eq!(pricing.shipping_price, 0);
        assert_eq!(pricing.total_price, 1180);
        assert_eq!(pricing.items, 2);
    }

    #[test]
    fn test_single_unit_at_100_pays_shipping() {
        let pricing = single(100);
        assert_eq!(pricing.items_price, 100);
        assert_eq!(pricing.tax_price, 18);
        assert_eq!(pricing.shipping_price, 50);
        assert_eq!(pricing.total_price, 168);
    }

    #[test]
    fn test_tax_rounding() {
        assert_eq!(single(1).tax_price, 0); // 0.18
        assert_eq!(single(999).tax_price, 180); // 179.82
        assert_eq!(single(1000).tax_price, 180);
        assert_eq!(single(12345).tax_price, 2222); // 2222.1
        let empty = price_lines(Vec::new(), Currency::INR).unwrap();
        assert_eq!(empty.tax_price, 0);
    }

    #[test]
    fn test_shipping_threshold() {
        assert_eq!(single(999).shipping_price, 50);
        assert_eq!(single(1000).shipping_price, 0);
        // 999.50 is above the threshold even though it displays as 1000
        let pricing =
            price_lines(vec![(Money::new(99950, Currency::INR), 1)], Currency::INR).unwrap();
        assert_eq!(pricing.shipping_price, 0);
        assert_eq!(pricing.items_price, 1000);
    }

    #[test]
    fn test_total_identity_holds() {
        let cases = vec![
            vec![(Money::new(33333, Currency::INR), 3)],
            vec![(inr(799), 1), (Money::new(19950, Currency::INR), 2)],
            vec![(inr(1), 1)],
            Vec::new(),
        ];
        for lines in cases {
            let pricing = price_lines(lines, Currency::INR).unwrap();
            assert!(pricing.is_consistent(), "{:?}", pricing);
        }
    }

    #[test]
    fn test_order_of_lines_is_irrelevant() {
        let a = price_lines(vec![(inr(250), 1), (inr(799), 3)], Currency::INR).unwrap();
        let b = price_lines(vec![(inr(799), 3), (inr(250), 1)], Currency::INR).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_currency_mismatch() {
        let result = price_lines(
            vec![(Money::from_units(10, Currency::USD), 1)],
            Currency::INR,
        );
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let result = price_lines(vec![(inr(10), 0)], Currency::INR);
        assert_eq!(result, Err(CommerceError::InvalidQuantity(0)));
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = price_lines(vec![(Money::new(i64::MAX, Currency::INR), 2)], Currency::INR);
        assert_eq!(result, Err(CommerceError::Overflow));
    }
}
