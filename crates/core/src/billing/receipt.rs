use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Column width of `payments.receipt_number`.
pub const RECEIPT_MAX_LEN: usize = 100;

/// Rejected receipt number input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    /// Blank receipt number.
    #[error("receipt number is required")]
    Empty,

    /// Longer than the storage column.
    #[error("receipt number exceeds {RECEIPT_MAX_LEN} characters")]
    TooLong,
}

/// External identifier of a payment. Uniqueness is enforced by storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReceiptNumber(String);

impl ReceiptNumber {
    /// Validates a caller-supplied receipt number.
    ///
    /// # Errors
    ///
    /// Returns `ReceiptError` if the value is blank or too long.
    pub fn parse(raw: &str) -> Result<Self, ReceiptError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReceiptError::Empty);
        }
        if trimmed.chars().count() > RECEIPT_MAX_LEN {
            return Err(ReceiptError::TooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generates a receipt for a payment the system creates itself.
    ///
    /// Format: `{PREFIX}-{32 hex digits}` from a time-ordered UUID.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let id = Uuid::now_v7().simple().to_string().to_ascii_uppercase();
        Self(format!("{}-{id}", prefix.to_ascii_uppercase()))
    }

    /// Returns the receipt text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ReceiptNumber {
    type Error = ReceiptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReceiptNumber> for String {
    fn from(value: ReceiptNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let receipt = ReceiptNumber::parse("  RCPT-001 ").unwrap();
        assert_eq!(receipt.as_str(), "RCPT-001");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(ReceiptNumber::parse("   "), Err(ReceiptError::Empty));
    }

    #[test]
    fn test_parse_length_limit() {
        let at_limit = "R".repeat(RECEIPT_MAX_LEN);
        assert!(ReceiptNumber::parse(&at_limit).is_ok());

        let over = "R".repeat(RECEIPT_MAX_LEN + 1);
        assert_eq!(ReceiptNumber::parse(&over), Err(ReceiptError::TooLong));
    }

    #[test]
    fn test_generated_receipts_are_distinct_and_fit() {
        let a = ReceiptNumber::generate("bill");
        let b = ReceiptNumber::generate("bill");

        assert_ne!(a, b);
        assert!(a.as_str().starts_with("BILL-"));
        assert_eq!(a.as_str().len(), "BILL-".len() + 32);
        assert!(ReceiptNumber::parse(a.as_str()).is_ok());
    }
}
