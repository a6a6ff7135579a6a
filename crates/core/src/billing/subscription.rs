use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected subscription definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The period ends before it starts.
    #[error("subscription ends on {end} before it starts on {start}")]
    EndsBeforeStart {
        /// First day covered.
        start: NaiveDate,
        /// Last day covered.
        end: NaiveDate,
    },
}

/// Recurring fee agreed between a user and a building.
///
/// Not a ledger entry. Paying it records a payment of `amount` that keeps no
/// reference back to the subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionTerms {
    /// Fee charged per payment.
    pub amount: Decimal,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered.
    pub end_date: NaiveDate,
}

impl SubscriptionTerms {
    /// Builds terms, checking the period is ordered.
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError::EndsBeforeStart` if `end_date < start_date`.
    pub fn new(
        amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, SubscriptionError> {
        if end_date < start_date {
            return Err(SubscriptionError::EndsBeforeStart {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            amount,
            start_date,
            end_date,
        })
    }

    /// Returns true if `date` falls inside the period, both ends inclusive.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Amount a payment for this subscription is recorded with.
    #[must_use]
    pub const fn charge(&self) -> Decimal {
        self.amount
    }
}
