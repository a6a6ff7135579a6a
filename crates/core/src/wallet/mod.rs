//! Per-user wallet balance.
//!
//! A wallet has exactly two mutating operations:
//! - [`Wallet::deposit`] adds any amount, including zero or negative ones,
//!   refusing only a sum that overflows
//! - [`Wallet::withdraw`] subtracts only when the balance covers the amount
//!
//! The `is_locked` flag is carried for display and never consulted.
//!
//! # Concurrency
//!
//! A `Wallet` is a snapshot. Callers load it, mutate it, then persist the new
//! balance. Two callers working from the same snapshot both pass the
//! `withdraw` guard and the later write wins, losing one update. Persisting
//! layers that need exact balances must re-check inside a serializable
//! transaction or use an atomic conditional update.

#[cfg(test)]
mod props;

use domus_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A deposit whose sum does not fit in a decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("depositing {amount} into a balance of {balance} overflows")]
pub struct BalanceOverflow {
    /// Balance before the deposit.
    pub balance: Decimal,
    /// Rejected amount.
    pub amount: Decimal,
}

/// A user's monetary balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    owner: UserId,
    balance: Decimal,
    is_locked: bool,
}

impl Wallet {
    /// Creates an empty, unlocked wallet for a new account.
    #[must_use]
    pub const fn open(owner: UserId) -> Self {
        Self {
            owner,
            balance: Decimal::ZERO,
            is_locked: false,
        }
    }

    /// Rebuilds a wallet from stored state.
    #[must_use]
    pub const fn from_parts(owner: UserId, balance: Decimal, is_locked: bool) -> Self {
        Self {
            owner,
            balance,
            is_locked,
        }
    }

    /// The account this wallet belongs to.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Stored lock flag. No operation reads it.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// Adds `amount` to the balance. No sign or size policy is applied.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceOverflow`] if the sum cannot be represented; the
    /// balance is left untouched.
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), BalanceOverflow> {
        self.balance = self.balance.checked_add(amount).ok_or(BalanceOverflow {
            balance: self.balance,
            amount,
        })?;
        Ok(())
    }

    /// Subtracts `amount` if the balance covers it.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    #[must_use]
    pub fn withdraw(&mut self, amount: Decimal) -> bool {
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }
}
