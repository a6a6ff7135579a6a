//! Money amounts with decimal precision.
//!
//! Never use floating-point for balances or payment amounts. Amounts are stored as
//! `NUMERIC(10, 2)`, so values are displayed with two fractional digits and parsed
//! amounts beyond the column's magnitude are refused. Extra fractional digits are
//! left to the storage layer.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fractional digits kept by the storage columns.
pub const MONEY_SCALE: u32 = 2;

/// Largest magnitude a `NUMERIC(10, 2)` column holds.
pub const MONEY_MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Errors produced when reading an amount from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The input was empty or whitespace.
    #[error("amount is required")]
    Empty,

    /// The input is not a decimal number.
    #[error("invalid amount: {0}")]
    Invalid(String),

    /// The input does not fit a stored amount.
    #[error("amount out of range: {0}")]
    OutOfRange(String),
}

/// A monetary amount in the single currency the application bills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parses a decimal amount. Sign is not checked here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Empty);
        }
        let amount =
            Decimal::from_str(trimmed).map_err(|_| MoneyError::Invalid(trimmed.to_string()))?;
        if amount.abs() > MONEY_MAX {
            return Err(MoneyError::OutOfRange(trimmed.to_string()));
        }
        Ok(Self(amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.0.round_dp(MONEY_SCALE);
        rounded.rescale(MONEY_SCALE);
        write!(f, "{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100.00", dec!(100.00))]
    #[case("  50 ", dec!(50))]
    #[case("-5.25", dec!(-5.25))]
    #[case("0", dec!(0))]
    #[case("99999999.99", dec!(99999999.99))]
    #[case("-99999999.99", dec!(-99999999.99))]
    fn test_parse_accepts_decimals(#[case] input: &str, #[case] expected: Decimal) {
        let money: Money = input.parse().unwrap();
        assert_eq!(money.amount(), expected);
    }

    #[rstest]
    #[case("", MoneyError::Empty)]
    #[case("   ", MoneyError::Empty)]
    #[case("abc", MoneyError::Invalid("abc".to_string()))]
    #[case("1.2.3", MoneyError::Invalid("1.2.3".to_string()))]
    #[case("100000000", MoneyError::OutOfRange("100000000".to_string()))]
    #[case(
        "79228162514264337593543950335",
        MoneyError::OutOfRange("79228162514264337593543950335".to_string())
    )]
    #[case("-100000000.00", MoneyError::OutOfRange("-100000000.00".to_string()))]
    fn test_parse_rejects_garbage(#[case] input: &str, #[case] expected: MoneyError) {
        assert_eq!(input.parse::<Money>().unwrap_err(), expected);
    }

    #[test]
    fn test_display_uses_two_fraction_digits() {
        assert_eq!(Money::new(dec!(150)).to_string(), "150.00");
        assert_eq!(Money::new(dec!(40.5)).to_string(), "40.50");
        assert_eq!(Money::new(dec!(-3.456)).to_string(), "-3.46");
    }

    #[test]
    fn test_max_matches_column_width() {
        assert_eq!(MONEY_MAX, dec!(99999999.99));
    }

    #[test]
    fn test_sign_helpers() {
        assert!(Money::new(dec!(0.01)).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
        assert!(Money::new(dec!(-1)).is_negative());
    }
}
