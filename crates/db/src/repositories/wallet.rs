//! Wallet repository.
//!
//! Balance changes are read-modify-write: the row is loaded, the domain
//! [`Wallet`] applies the change, and the new absolute balance is written
//! back. There is no row lock and no transaction around the pair, so two
//! concurrent withdrawals can both pass the guard against the same stale
//! balance and the later write wins. Closing that gap needs either a
//! `SELECT ... FOR UPDATE` inside a transaction or a conditional
//! `UPDATE wallets SET balance = balance - $1 WHERE balance >= $1`.

use domus_core::wallet::{BalanceOverflow, Wallet};
use domus_shared::{AppError, types::UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use tracing::debug;

use crate::entities::wallets;

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The user has no wallet row.
    #[error("Wallet not found for user {0}")]
    NotFound(i64),

    /// The deposit cannot be represented.
    #[error("{0}")]
    Overflow(#[from] BalanceOverflow),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotFound(_) => Self::NotFound(err.to_string()),
            WalletError::Overflow(_) => Self::Validation(err.to_string()),
            WalletError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Result of a guarded withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawOutcome {
    /// Whether the balance covered the amount.
    pub withdrawn: bool,
    /// Wallet state after the attempt.
    pub wallet: wallets::Model,
}

/// Wallet repository for balance operations.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts an empty wallet for a user.
    ///
    /// Takes any connection so account creation can open the wallet inside
    /// its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when the user already
    /// has a wallet.
    pub async fn open<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<wallets::Model, DbErr> {
        let wallet = Wallet::open(UserId::new(user_id));
        let now = chrono::Utc::now().into();

        wallets::ActiveModel {
            user_id: Set(wallet.owner().into_inner()),
            balance: Set(wallet.balance()),
            is_locked: Set(wallet.is_locked()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Finds the wallet owned by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user(&self, user_id: i64) -> Result<Option<wallets::Model>, DbErr> {
        wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    async fn load(&self, user_id: i64) -> Result<(wallets::Model, Wallet), WalletError> {
        let model = self
            .find_by_user(user_id)
            .await?
            .ok_or(WalletError::NotFound(user_id))?;
        let wallet = Wallet::from_parts(UserId::new(model.user_id), model.balance, model.is_locked);
        Ok((model, wallet))
    }

    async fn store(&self, model: wallets::Model, wallet: &Wallet) -> Result<wallets::Model, DbErr> {
        let mut active: wallets::ActiveModel = model.into();
        active.balance = Set(wallet.balance());
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await
    }

    /// Adds `amount` to the user's balance. Any representable amount is accepted.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::NotFound` if the user has no wallet and
    /// `WalletError::Overflow` if the new balance cannot be represented.
    pub async fn deposit(&self, user_id: i64, amount: Decimal) -> Result<wallets::Model, WalletError> {
        let (model, mut wallet) = self.load(user_id).await?;
        wallet.deposit(amount)?;
        debug!(user_id, %amount, balance = %wallet.balance(), "wallet deposit");
        Ok(self.store(model, &wallet).await?)
    }

    /// Subtracts `amount` if the stored balance covers it.
    ///
    /// A refused withdrawal writes nothing and reports `withdrawn: false`.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::NotFound` if the user has no wallet.
    pub async fn withdraw(&self, user_id: i64, amount: Decimal) -> Result<WithdrawOutcome, WalletError> {
        let (model, mut wallet) = self.load(user_id).await?;
        if !wallet.withdraw(amount) {
            debug!(user_id, %amount, balance = %wallet.balance(), "wallet withdraw refused");
            return Ok(WithdrawOutcome {
                withdrawn: false,
                wallet: model,
            });
        }
        debug!(user_id, %amount, balance = %wallet.balance(), "wallet withdraw");
        let wallet = self.store(model, &wallet).await?;
        Ok(WithdrawOutcome {
            withdrawn: true,
            wallet,
        })
    }
}
