//! Payment recording rules.
//!
//! - Bill categories for building utility payments
//! - Receipt numbers, unique across all payments
//! - Subscription terms that priced a payment

mod bill;
mod receipt;
mod subscription;

pub use bill::{BillType, UnknownBillType};
pub use receipt::{RECEIPT_MAX_LEN, ReceiptError, ReceiptNumber};
pub use subscription::{SubscriptionError, SubscriptionTerms};
