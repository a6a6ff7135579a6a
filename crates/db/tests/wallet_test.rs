//! Integration tests for wallet balance operations.

mod common;

use std::sync::Arc;

use domus_core::auth::AccountRole;
use domus_db::{WalletRepository, repositories::WalletError};
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_new_account_has_empty_unlocked_wallet() {
    let db = common::connect().await;
    let (user, wallet) = common::create_user(&db, AccountRole::Resident).await;

    assert_eq!(wallet.user_id, user.id);
    assert_eq!(wallet.balance, dec!(0.00));
    assert!(!wallet.is_locked);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_deposit_then_withdraw() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Resident).await;
    let repo = WalletRepository::new(db.clone());

    let wallet = repo.deposit(user.id, dec!(100.00)).await.unwrap();
    assert_eq!(wallet.balance, dec!(100.00));

    let wallet = repo.deposit(user.id, dec!(50.00)).await.unwrap();
    assert_eq!(wallet.balance, dec!(150.00));

    let outcome = repo.withdraw(user.id, dec!(150.00)).await.unwrap();
    assert!(outcome.withdrawn);
    assert_eq!(outcome.wallet.balance, dec!(0.00));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_withdraw_over_balance_leaves_wallet_unchanged() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Resident).await;
    let repo = WalletRepository::new(db.clone());

    repo.deposit(user.id, dec!(100.00)).await.unwrap();
    let outcome = repo.withdraw(user.id, dec!(150.00)).await.unwrap();

    assert!(!outcome.withdrawn);
    assert_eq!(outcome.wallet.balance, dec!(100.00));

    let stored = repo.find_by_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.balance, dec!(100.00));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_missing_wallet_is_not_found() {
    let db = common::connect().await;
    let repo = WalletRepository::new(db);

    let err = repo.deposit(i64::MAX, dec!(1.00)).await.unwrap_err();
    assert!(matches!(err, WalletError::NotFound(id) if id == i64::MAX));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_overflowing_deposit_is_refused_without_writing() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Resident).await;
    let repo = WalletRepository::new(db.clone());
    repo.deposit(user.id, dec!(100.00)).await.unwrap();

    let err = repo.deposit(user.id, Decimal::MAX).await.unwrap_err();
    assert!(matches!(err, WalletError::Overflow(_)));

    let stored = repo.find_by_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.balance, dec!(100.00));
}

/// Two withdrawals of 60 against 100 end at 40 whether they serialize (one
/// fails) or interleave (both pass against the same snapshot and one write
/// is lost).
#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_withdrawals_end_at_forty() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Resident).await;
    let repo = WalletRepository::new(db.clone());
    repo.deposit(user.id, dec!(100.00)).await.unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let tasks = (0..2).map(|_| {
        let repo = repo.clone();
        let barrier = Arc::clone(&barrier);
        let user_id = user.id;
        tokio::spawn(async move {
            barrier.wait().await;
            repo.withdraw(user_id, dec!(60.00)).await
        })
    });

    let succeeded = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .filter(|outcome| outcome.withdrawn)
        .count();

    let stored = repo.find_by_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.balance, dec!(40.00));
    assert!((1..=2).contains(&succeeded));
}
