//! Integration tests for payments, bills and subscriptions.

mod common;

use chrono::NaiveDate;
use domus_core::{
    auth::AccountRole,
    billing::{BillType, ReceiptNumber, SubscriptionTerms},
};
use domus_db::{
    PaymentRepository, SubscriptionRepository,
    entities::sea_orm_active_enums,
    repositories::PaymentError,
};
use domus_shared::types::PageRequest;
use rust_decimal_macros::dec;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

fn unique_receipt() -> ReceiptNumber {
    ReceiptNumber::parse(&format!("RCPT-{}", Uuid::new_v4().simple())).unwrap()
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_receipt_keeps_first_payment() {
    let db = common::connect().await;
    let (first_user, _) = common::create_user(&db, AccountRole::Resident).await;
    let (second_user, _) = common::create_user(&db, AccountRole::Resident).await;
    let repo = PaymentRepository::new(db.clone());
    let receipt = unique_receipt();

    let first = repo.record(first_user.id, dec!(25.00), &receipt).await.unwrap();
    let err = repo
        .record(second_user.id, dec!(99.00), &receipt)
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::DuplicateReceipt(_)));

    let stored = repo.find_by_receipt(receipt.as_str()).await.unwrap().unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.user_id, first_user.id);
    assert_eq!(stored.amount, dec!(25.00));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pay_subscription_charges_subscription_amount() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Resident).await;
    let building = common::create_building(&db).await;
    let terms = SubscriptionTerms::new(
        dec!(75.50),
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
    )
    .unwrap();
    let subscription = SubscriptionRepository::new(db.clone())
        .create(building.id, user.id, &terms)
        .await
        .unwrap();

    let payment = PaymentRepository::new(db.clone())
        .pay_subscription(user.id, subscription.id, &unique_receipt())
        .await
        .unwrap();

    assert_eq!(payment.user_id, user.id);
    assert_eq!(payment.amount, dec!(75.50));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pay_unknown_subscription() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Resident).await;

    let err = PaymentRepository::new(db)
        .pay_subscription(user.id, i64::MAX, &unique_receipt())
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::SubscriptionNotFound(_)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pay_bill_links_payment_and_bill() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Manager).await;
    let building = common::create_building(&db).await;
    let repo = PaymentRepository::new(db.clone());

    let record = repo
        .pay_bill(user.id, building.id, dec!(310.20), BillType::Water)
        .await
        .unwrap();

    assert_eq!(record.bill.payment_id, record.payment.id);
    assert_eq!(record.bill.amount, record.payment.amount);
    assert_eq!(record.bill.bill_type, sea_orm_active_enums::BillType::Water);
    assert!(record.payment.receipt_number.starts_with("BILL-"));

    let bills = repo.list_bills_for_building(building.id).await.unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].id, record.bill.id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pay_bill_for_unknown_building_records_nothing() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Manager).await;
    let repo = PaymentRepository::new(db.clone());

    let err = repo
        .pay_bill(user.id, i64::MAX, dec!(10.00), BillType::Gas)
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::BuildingNotFound(_)));

    let (payments, total) = repo
        .list_for_user(user.id, &PageRequest::default())
        .await
        .unwrap();
    assert!(payments.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_payments_is_paginated_newest_first() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Resident).await;
    let repo = PaymentRepository::new(db.clone());

    for amount in [dec!(1.00), dec!(2.00), dec!(3.00)] {
        repo.record(user.id, amount, &unique_receipt()).await.unwrap();
    }

    let page = PageRequest {
        page: 1,
        per_page: 2,
    };
    let (payments, total) = repo.list_for_user(user.id, &page).await.unwrap();

    assert_eq!(total, 3);
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0].amount, dec!(3.00));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_failed_bill_insert_leaves_no_orphan_payment() {
    let db = common::connect().await;
    let (payer, _) = common::create_user(&db, AccountRole::Resident).await;
    let building = common::create_building(&db).await;
    let trigger = format!("reject_bills_{}", building.id);

    // Refuse bill rows for this building only, after the payment row is in.
    db.execute_unprepared(&format!(
        r"
        CREATE OR REPLACE FUNCTION {trigger}() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'bill rejected for building {id}';
        END;
        $$ LANGUAGE plpgsql;

        CREATE TRIGGER {trigger}
            BEFORE INSERT ON bill_payments
            FOR EACH ROW WHEN (NEW.building_id = {id})
            EXECUTE FUNCTION {trigger}();
        ",
        id = building.id,
    ))
    .await
    .unwrap();

    let repo = PaymentRepository::new(db.clone());
    let result = repo
        .pay_bill(payer.id, building.id, dec!(48.00), BillType::Electricity)
        .await;

    db.execute_unprepared(&format!(
        "DROP TRIGGER {trigger} ON bill_payments; DROP FUNCTION {trigger}();"
    ))
    .await
    .unwrap();

    assert!(matches!(result, Err(PaymentError::Database(_))));

    let (payments, total) = repo
        .list_for_user(payer.id, &PageRequest::default())
        .await
        .unwrap();
    assert!(payments.is_empty());
    assert_eq!(total, 0);
    assert!(repo.list_bills_for_building(building.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_subscription_can_be_paid_repeatedly() {
    let db = common::connect().await;
    let (resident, _) = common::create_user(&db, AccountRole::Resident).await;
    let building = common::create_building(&db).await;
    let terms = SubscriptionTerms::new(
        dec!(80.00),
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    )
    .unwrap();
    let subscription = SubscriptionRepository::new(db.clone())
        .create(building.id, resident.id, &terms)
        .await
        .unwrap();
    let repo = PaymentRepository::new(db.clone());

    let march = repo
        .pay_subscription(resident.id, subscription.id, &unique_receipt())
        .await
        .unwrap();
    let again = repo
        .pay_subscription(resident.id, subscription.id, &unique_receipt())
        .await
        .unwrap();

    assert_ne!(march.id, again.id);
    assert_ne!(march.receipt_number, again.receipt_number);

    let (payments, total) = repo
        .list_for_user(resident.id, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(payments.iter().all(|p| p.amount == dec!(80.00)));
}
