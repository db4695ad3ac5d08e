//! Positive item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a [`Quantity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// The input is not an integer.
    #[error("quantity must be a whole number (got {0:?})")]
    NotANumber(String),
    /// The input is zero or negative.
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i64),
    /// The input is larger than a `u32`.
    #[error("quantity is too large (got {0})")]
    TooLarge(i64),
}

/// A strictly positive number of units of a product.
///
/// ```
/// use cafego_core::Quantity;
///
/// assert_eq!(Quantity::parse("2").unwrap().get(), 2);
/// assert!(Quantity::parse("0").is_err());
/// assert!(Quantity::parse("two").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// Create a quantity from a raw count.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` if `count` is zero.
    pub fn new(count: u32) -> Result<Self, QuantityError> {
        NonZeroU32::new(count)
            .map(Self)
            .ok_or(QuantityError::NotPositive(0))
    }

    /// Parse a quantity from form input.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError` if the input is not an integer or is not
    /// strictly positive.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| QuantityError::NotANumber(s.to_owned()))?;
        Self::try_from(value)
    }

    /// The number of units.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }
        let count = u32::try_from(value).map_err(|_| QuantityError::TooLarge(value))?;
        Self::new(count)
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        Self::from(quantity.get())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Quantity::parse("1").unwrap().get(), 1);
        assert_eq!(Quantity::parse(" 12 ").unwrap().get(), 12);
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(Quantity::parse("0"), Err(QuantityError::NotPositive(0)));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Quantity::parse("-3"), Err(QuantityError::NotPositive(-3)));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert!(matches!(
            Quantity::parse("lots"),
            Err(QuantityError::NotANumber(_))
        ));
        assert!(matches!(
            Quantity::parse(""),
            Err(QuantityError::NotANumber(_))
        ));
    }

    #[test]
    fn test_too_large() {
        let too_big = i64::from(u32::MAX) + 1;
        assert_eq!(
            Quantity::try_from(too_big),
            Err(QuantityError::TooLarge(too_big))
        );
    }

    #[test]
    fn test_into_i64() {
        let q = Quantity::new(5).unwrap();
        assert_eq!(i64::from(q), 5);
    }
}
