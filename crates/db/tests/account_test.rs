//! Integration tests for accounts and sessions.

mod common;

use chrono::{Duration, Utc};
use domus_core::auth::AccountRole;
use domus_db::{
    SessionRepository, UserRepository, WalletRepository,
    entities::sea_orm_active_enums,
    repositories::{CreateUserInput, UserError, session::USER_AGENT_MAX_CHARS},
};

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_username_is_rejected_without_wallet() {
    let db = common::connect().await;
    let (user, _) = common::create_user(&db, AccountRole::Business).await;
    let repo = UserRepository::new(db.clone());

    let err = repo
        .create_with_wallet(CreateUserInput {
            username: user.username.clone(),
            email: Some("other@example.com".to_string()),
            password_hash: "$argon2id$test".to_string(),
            role: AccountRole::Resident,
            is_admin: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::UsernameTaken(name) if name == user.username));

    let found = repo.find_by_username(&user.username).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.role, sea_orm_active_enums::AccountRole::Business);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_every_account_has_a_wallet() {
    let db = common::connect().await;
    let (user, wallet) = common::create_user(&db, AccountRole::Resident).await;

    let stored = WalletRepository::new(db)
        .find_by_user(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, wallet.id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_resident_signs_in_refreshes_and_logs_out() {
    let db = common::connect().await;
    let (resident, _) = common::create_user(&db, AccountRole::Resident).await;
    let sessions = SessionRepository::new(db.clone());
    let token = format!("resident-refresh-{}", uuid::Uuid::new_v4());

    let session = sessions
        .create(resident.id, &token, Utc::now() + Duration::days(7), Some("lobby-kiosk/2.1"))
        .await
        .unwrap();
    assert_eq!(session.refresh_token_hash, SessionRepository::hash_token(&token));
    assert_eq!(session.refresh_token_hash.len(), 64);
    assert_eq!(session.user_agent.as_deref(), Some("lobby-kiosk/2.1"));

    let live = sessions.find_by_token(&token).await.unwrap().unwrap();
    assert_eq!(live.id, session.id);
    assert_eq!(live.user_id, resident.id);

    assert!(sessions.revoke_by_token(&token).await.unwrap());
    assert!(sessions.find_by_token(&token).await.unwrap().is_none());
    assert!(!sessions.revoke_by_token(&token).await.unwrap());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_manager_devices_hold_separate_sessions() {
    let db = common::connect().await;
    let (manager, _) = common::create_user(&db, AccountRole::Manager).await;
    let sessions = SessionRepository::new(db.clone());
    let phone = format!("manager-phone-{}", uuid::Uuid::new_v4());
    let desk = format!("manager-desk-{}", uuid::Uuid::new_v4());
    let expires = Utc::now() + Duration::days(7);

    sessions.create(manager.id, &phone, expires, None).await.unwrap();
    sessions.create(manager.id, &desk, expires, None).await.unwrap();

    assert!(sessions.revoke_by_token(&phone).await.unwrap());
    let desk_session = sessions.find_by_token(&desk).await.unwrap().unwrap();
    assert_eq!(desk_session.user_id, manager.id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_long_user_agent_is_cut() {
    let db = common::connect().await;
    let (business, _) = common::create_user(&db, AccountRole::Business).await;
    let token = format!("business-refresh-{}", uuid::Uuid::new_v4());
    let agent = "x".repeat(USER_AGENT_MAX_CHARS + 40);

    let session = SessionRepository::new(db)
        .create(business.id, &token, Utc::now() + Duration::hours(1), Some(&agent))
        .await
        .unwrap();

    assert_eq!(
        session.user_agent.map(|ua| ua.chars().count()),
        Some(USER_AGENT_MAX_CHARS)
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_expired_session_cannot_refresh_but_can_log_out() {
    let db = common::connect().await;
    let (resident, _) = common::create_user(&db, AccountRole::Resident).await;
    let sessions = SessionRepository::new(db.clone());
    let token = format!("resident-stale-{}", uuid::Uuid::new_v4());

    sessions
        .create(resident.id, &token, Utc::now() - Duration::minutes(1), None)
        .await
        .unwrap();

    assert!(sessions.find_by_token(&token).await.unwrap().is_none());
    assert!(sessions.revoke_by_token(&token).await.unwrap());
}
