//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are persisted as integer cents and handled in memory as a
//! [`Decimal`] amount in dollars, so arithmetic never goes through floats.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount has more precision than whole cents.
    #[error("price must be a whole number of cents (got {0})")]
    FractionalCents(Decimal),
    /// The amount does not fit in the cents representation.
    #[error("price is out of range (got {0})")]
    OutOfRange(Decimal),
}

/// A non-negative price in dollars.
///
/// ```
/// use cafego_core::Price;
///
/// let price = Price::from_cents(1250);
/// assert_eq!(price.to_string(), "$12.50");
/// assert_eq!(price.cents(), 1250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a dollar amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the amount is negative, has sub-cent
    /// precision, or is too large to store as cents.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount.round_dp(2) != amount {
            return Err(PriceError::FractionalCents(amount));
        }
        if amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .is_none()
        {
            return Err(PriceError::OutOfRange(amount));
        }
        Ok(Self(amount.normalize()))
    }

    /// Create a price from an integer number of cents.
    ///
    /// Negative inputs are clamped to zero; the database enforces
    /// `price_cents >= 0` so this only guards against corrupted rows.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents.max(0), 2))
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in whole cents, saturating at `i64::MAX`.
    #[must_use]
    pub fn cents(&self) -> i64 {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .unwrap_or(i64::MAX)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// Totals saturate at `Decimal::MAX` instead of panicking on overflow.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<Quantity> for Price {
    type Output = Self;

    fn mul(self, rhs: Quantity) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(rhs.get())))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_from_cents_display() {
        assert_eq!(Price::from_cents(0).to_string(), "$0.00");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::from_cents(300).to_string(), "$3.00");
    }

    #[test]
    fn test_cents_round_trip_through_decimal() {
        let price = Price::new(Decimal::from_str("4.50").unwrap()).unwrap();
        assert_eq!(price.cents(), 450);
        assert_eq!(Price::from_cents(450), price);
    }

    #[test]
    fn test_new_rejects_negative() {
        let result = Price::new(Decimal::from_str("-1.00").unwrap());
        assert!(matches!(result, Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_new_rejects_sub_cent_precision() {
        let result = Price::new(Decimal::from_str("1.005").unwrap());
        assert!(matches!(result, Err(PriceError::FractionalCents(_))));
    }

    #[test]
    fn test_line_total_and_sum() {
        let latte = Price::from_cents(450) * Quantity::new(2).unwrap();
        let muffin = Price::from_cents(325) * Quantity::new(1).unwrap();
        assert_eq!(latte.cents(), 900);

        let total: Price = [latte, muffin].into_iter().sum();
        assert_eq!(total.to_string(), "$12.25");
    }

    #[test]
    fn test_huge_totals_saturate_instead_of_panicking() {
        let line = Price::from_cents(i64::MAX) * Quantity::new(u32::MAX).unwrap();
        let total: Price = std::iter::repeat_n(line, 300).sum();

        assert_eq!(total.amount(), Decimal::MAX);
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!((total * Quantity::new(2).unwrap()).amount(), Decimal::MAX);
    }

    #[test]
    fn test_deserialize_from_string() {
        let price: Price = serde_json::from_str("\"2.75\"").unwrap();
        assert_eq!(price.cents(), 275);
    }
}
