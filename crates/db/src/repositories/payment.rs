//! Payment and bill payment repository.
//!
//! Every payment carries a receipt number that is unique across all
//! payments; a duplicate surfaces as `PaymentError::DuplicateReceipt` from the
//! storage constraint and is never retried.

use domus_core::billing::{BillType, ReceiptNumber};
use domus_shared::{AppError, types::PageRequest};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use super::is_unique_violation;
use crate::entities::{bill_payments, buildings, payments, subscriptions};

/// Receipt prefix for payments the system numbers itself.
pub const BILL_RECEIPT_PREFIX: &str = "BILL";

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// A payment with this receipt number exists.
    #[error("Receipt number '{0}' already exists")]
    DuplicateReceipt(String),

    /// Subscription not found.
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(i64),

    /// Building not found.
    #[error("Building not found: {0}")]
    BuildingNotFound(i64),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::DuplicateReceipt(_) => Self::Conflict(err.to_string()),
            PaymentError::SubscriptionNotFound(_)
            | PaymentError::BuildingNotFound(_)
            | PaymentError::UserNotFound(_) => Self::NotFound(err.to_string()),
            PaymentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A bill payment with the payment it is linked to.
#[derive(Debug, Clone)]
pub struct BillPaymentRecord {
    /// The underlying payment.
    pub payment: payments::Model,
    /// The bill row.
    pub bill: bill_payments::Model,
}

/// Inserts a payment row on any connection.
async fn insert_payment<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    amount: Decimal,
    receipt: &ReceiptNumber,
) -> Result<payments::Model, PaymentError> {
    let now = chrono::Utc::now().into();
    let payment = payments::ActiveModel {
        user_id: Set(user_id),
        amount: Set(amount),
        date: Set(now),
        receipt_number: Set(receipt.as_str().to_string()),
        modified_at: Set(now),
        ..Default::default()
    };

    payment.insert(db).await.map_err(|e| {
        if is_unique_violation(&e) {
            PaymentError::DuplicateReceipt(receipt.to_string())
        } else {
            PaymentError::Database(e)
        }
    })
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records money received from a user. The amount is not validated.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::DuplicateReceipt` if the receipt number exists.
    pub async fn record(
        &self,
        user_id: i64,
        amount: Decimal,
        receipt: &ReceiptNumber,
    ) -> Result<payments::Model, PaymentError> {
        insert_payment(&self.db, user_id, amount, receipt).await
    }

    /// Records a payment of the subscription's amount for `user_id`.
    ///
    /// The payment keeps no reference to the subscription, and nothing stops
    /// the same subscription being paid again under another receipt.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::SubscriptionNotFound` for an unknown id and
    /// `PaymentError::DuplicateReceipt` for a reused receipt number.
    pub async fn pay_subscription(
        &self,
        user_id: i64,
        subscription_id: i64,
        receipt: &ReceiptNumber,
    ) -> Result<payments::Model, PaymentError> {
        let subscription = subscriptions::Entity::find_by_id(subscription_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentError::SubscriptionNotFound(subscription_id))?;

        let payment = insert_payment(&self.db, user_id, subscription.amount, receipt).await?;

        info!(
            user_id,
            subscription_id,
            payment_id = payment.id,
            receipt = %receipt,
            "subscription paid"
        );
        Ok(payment)
    }

    /// Records a utility bill for a building.
    ///
    /// The payment (with a generated receipt) and the bill row are inserted in
    /// one transaction, so a failed bill insert leaves no orphan payment.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::BuildingNotFound` for an unknown building.
    pub async fn pay_bill(
        &self,
        user_id: i64,
        building_id: i64,
        amount: Decimal,
        bill_type: BillType,
    ) -> Result<BillPaymentRecord, PaymentError> {
        let txn = self.db.begin().await?;

        if buildings::Entity::find_by_id(building_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(PaymentError::BuildingNotFound(building_id));
        }

        let receipt = ReceiptNumber::generate(BILL_RECEIPT_PREFIX);
        let payment = insert_payment(&txn, user_id, amount, &receipt).await?;

        let bill = bill_payments::ActiveModel {
            building_id: Set(building_id),
            payment_id: Set(payment.id),
            amount: Set(amount),
            bill_type: Set(bill_type.into()),
            paid_by: Set(user_id),
            date: Set(payment.date),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            user_id,
            building_id,
            payment_id = payment.id,
            bill_type = %bill_type,
            "bill paid"
        );
        Ok(BillPaymentRecord { payment, bill })
    }

    /// Finds a payment by receipt number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_receipt(&self, receipt: &str) -> Result<Option<payments::Model>, DbErr> {
        payments::Entity::find()
            .filter(payments::Column::ReceiptNumber.eq(receipt))
            .one(&self.db)
            .await
    }

    /// Lists a user's payments, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<payments::Model>, u64), DbErr> {
        let query = payments::Entity::find().filter(payments::Column::UserId.eq(user_id));

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(payments::Column::Date)
            .order_by_desc(payments::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Lists bill payments for a building, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_bills_for_building(
        &self,
        building_id: i64,
    ) -> Result<Vec<bill_payments::Model>, DbErr> {
        bill_payments::Entity::find()
            .filter(bill_payments::Column::BuildingId.eq(building_id))
            .order_by_desc(bill_payments::Column::Date)
            .all(&self.db)
            .await
    }
}
