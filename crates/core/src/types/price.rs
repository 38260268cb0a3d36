//! Non-negative money amounts.
//!
//! The shop trades in a single currency, so a [`Price`] is just a
//! [`Decimal`] that is known to be `>= 0`, rounded to cents for display.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input was blank.
    #[error("price is required")]
    Empty,
    /// The input is not a decimal number.
    #[error("enter a number")]
    NotANumber,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More than two decimal places.
    #[error("ensure there are no more than 2 decimal places")]
    TooPrecise,
}

/// A non-negative amount of money.
///
/// ```
/// use aiza_tasty_core::Price;
///
/// let croissant = Price::parse("3.50").unwrap();
/// assert_eq!(croissant.times(2).to_string(), "$7.00");
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Build a price from whole cents, e.g. `from_cents(350)` is 3.50.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Parse user input such as `"4.25"`.
    ///
    /// # Errors
    ///
    /// Returns an error for blank, non-numeric, negative or sub-cent input.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount = Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber)?;
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The line total for `quantity` units at this price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// The amount without a currency symbol, e.g. `"13.00"`.
    ///
    /// Used for CSV export and form values.
    #[must_use]
    pub fn plain(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("5").unwrap(), Price::from_cents(500));
        assert_eq!(Price::parse(" 3.5 ").unwrap(), Price::from_cents(350));
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
        assert_eq!(Price::parse("12.50").unwrap(), Price::from_cents(1250));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("cake"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
        assert_eq!(Price::parse("1.999"), Err(PriceError::TooPrecise));
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::from_cents(1300).to_string(), "$13.00");
        assert_eq!(Price::from_cents(5).plain(), "0.05");
    }

    #[test]
    fn test_sum_and_times() {
        let total: Price = [Price::from_cents(500).times(2), Price::from_cents(300)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(1300));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-2.00\"").is_err());
        assert_eq!(
            serde_json::from_str::<Price>("\"2.00\"").unwrap(),
            Price::from_cents(200)
        );
    }
}
