//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod building;
pub mod catalog;
pub mod engagement;
pub mod faq;
pub mod issue;
pub mod messaging;
pub mod payment;
pub mod session;
pub mod subscription;
pub mod user;
pub mod wallet;

pub use building::{BuildingError, BuildingRepository};
pub use catalog::{ServiceError, ServiceRepository};
pub use engagement::{EngagementError, EngagementRepository};
pub use faq::{FaqError, FaqRepository};
pub use issue::{IssueReportError, IssueRepository};
pub use messaging::{MessageRepository, MessagingError, NotificationRepository, ReminderRepository};
pub use payment::{BillPaymentRecord, PaymentError, PaymentRepository};
pub use session::SessionRepository;
pub use subscription::SubscriptionRepository;
pub use user::{CreateUserInput, UserError, UserRepository};
pub use wallet::{WalletError, WalletRepository, WithdrawOutcome};

use sea_orm::{DbErr, SqlErr};

/// Returns true if the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
