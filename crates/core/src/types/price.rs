//! Type-safe price representation using decimal arithmetic.
//!
//! The marketplace trades in a single currency, so a price is just a
//! non-negative decimal amount. Arithmetic stays in `Decimal` so cart totals
//! never accumulate floating point error.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a number.
    #[error("price must be a number (got '{0}')")]
    NotANumber(String),
}

/// A non-negative amount in the store currency.
///
/// ## Examples
///
/// ```
/// use candy_market_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::try_new(Decimal::new(1000, 0)).unwrap();
/// assert_eq!(price.display(), "$1000.00");
/// assert!(Price::try_new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn try_new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Parse a price from free-form user input.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` for non-numeric input and
    /// `PriceError::Negative` for amounts below zero.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        let amount: Decimal = trimmed
            .parse()
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::try_new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity (used for line subtotals).
    ///
    /// Saturates at `Decimal::MAX`; prices come from the server unbounded.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at `Decimal::MAX`.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accepts both JSON numbers and numeric strings
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::try_new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::try_new(Decimal::new(-5, 1)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::try_new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_parse_user_input() {
        assert_eq!(Price::parse(" 12.50 ").unwrap().amount(), Decimal::new(1250, 2));
        assert!(matches!(Price::parse("doce"), Err(PriceError::NotANumber(_))));
        assert!(matches!(Price::parse(""), Err(PriceError::NotANumber(_))));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_units(2500).display(), "$2500.00");
        assert_eq!(Price::parse("3.5").unwrap().to_string(), "$3.50");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_units(1000).times(2), Price::from_units(500)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_units(2500));
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_overflowing() {
        let huge = Price::parse("50000000000000000000000000000").unwrap();

        assert_eq!(huge.times(2).amount(), Decimal::MAX);
        assert_eq!((huge + huge).amount(), Decimal::MAX);
        let total: Price = [huge.times(3), huge, Price::from_units(1)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("1000.0").unwrap();
        assert_eq!(price, Price::from_units(1000));

        let price: Price = serde_json::from_str("\"12.99\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(1299, 2));

        assert!(serde_json::from_str::<Price>("-1").is_err());
    }

    #[test]
    fn test_serialize_as_json_number() {
        let json = serde_json::to_string(&Price::parse("4.25").unwrap()).unwrap();
        assert_eq!(json, "4.25");
    }
}
