use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Utility category of a bill payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillType {
    /// Electricity bill.
    Electricity,
    /// Water bill.
    Water,
    /// Gas bill.
    Gas,
}

impl BillType {
    /// All categories, in display order.
    pub const ALL: [Self; 3] = [Self::Electricity, Self::Water, Self::Gas];

    /// Stable lowercase name used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Water => "water",
            Self::Gas => "gas",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bill type string outside the known categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bill type '{0}', expected electricity, water or gas")]
pub struct UnknownBillType(pub String);

impl FromStr for BillType {
    type Err = UnknownBillType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electricity" => Ok(Self::Electricity),
            "water" => Ok(Self::Water),
            "gas" => Ok(Self::Gas),
            other => Err(UnknownBillType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("electricity", BillType::Electricity)]
    #[case("Water", BillType::Water)]
    #[case(" GAS ", BillType::Gas)]
    fn test_parse(#[case] input: &str, #[case] expected: BillType) {
        assert_eq!(input.parse::<BillType>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "internet".parse::<BillType>().unwrap_err();
        assert_eq!(err, UnknownBillType("internet".to_string()));
    }

    #[test]
    fn test_display_matches_parse() {
        for bill_type in BillType::ALL {
            assert_eq!(bill_type.to_string().parse::<BillType>().unwrap(), bill_type);
        }
    }
}
