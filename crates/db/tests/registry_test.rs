//! Integration tests for the building registry and service catalog.

mod common;

use chrono::{Duration, Utc};
use domus_core::{
    auth::AccountRole,
    catalog::{CatalogError, RequestStatus, ServiceDefinition, TransitionError},
    profile::{ProfileError, ResidentType},
};
use domus_db::{
    BuildingRepository, NotificationRepository, ServiceRepository,
    entities::sea_orm_active_enums,
    repositories::{BuildingError, ServiceError},
};
use rust_decimal_macros::dec;

fn definition() -> ServiceDefinition {
    let now = Utc::now();
    ServiceDefinition {
        name: "Window cleaning".to_string(),
        description: "Outside windows, all floors".to_string(),
        cost: dec!(45.00),
        available_from: now,
        available_to: now + Duration::days(30),
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_register_manager_switches_role() {
    let db = common::connect().await;
    let building = common::create_building(&db).await;
    let (user, _) = common::create_user(&db, AccountRole::Resident).await;
    let repo = BuildingRepository::new(db.clone());

    let manager = repo.register_manager(building.id, user.id).await.unwrap();
    assert!(manager.approved_by_admin);
    assert!(!manager.verified);
    assert!(repo.is_manager_of(user.id, building.id).await.unwrap());

    let (other, _) = common::create_user(&db, AccountRole::Resident).await;
    let err = repo.register_manager(building.id, other.id).await.unwrap_err();
    assert!(matches!(err, BuildingError::ManagerExists { .. }));

    let verified = repo.verify_manager(manager.id).await.unwrap();
    assert!(verified.verified);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_resident_profile_requires_resident_role() {
    let db = common::connect().await;
    let building = common::create_building(&db).await;
    let (business, _) = common::create_user(&db, AccountRole::Business).await;
    let (resident, _) = common::create_user(&db, AccountRole::Resident).await;
    let repo = BuildingRepository::new(db.clone());

    let err = repo
        .add_resident(building.id, business.id, ResidentType::Tenant)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BuildingError::Profile(ProfileError::RoleMismatch { .. })
    ));

    let profile = repo
        .add_resident(building.id, resident.id, ResidentType::Owner)
        .await
        .unwrap();
    assert_eq!(profile.resident_type, sea_orm_active_enums::ResidentType::Owner);

    let err = repo
        .add_resident(building.id, resident.id, ResidentType::Owner)
        .await
        .unwrap_err();
    assert!(matches!(err, BuildingError::ProfileExists(_)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_transfer_moves_manager_profile() {
    let db = common::connect().await;
    let building = common::create_building(&db).await;
    let (old_manager, _) = common::create_user(&db, AccountRole::Resident).await;
    let (new_manager, _) = common::create_user(&db, AccountRole::Manager).await;
    let repo = BuildingRepository::new(db.clone());

    let original = repo.register_manager(building.id, old_manager.id).await.unwrap();
    let transfer = repo.request_transfer(building.id, new_manager.id).await.unwrap();

    let moved = repo.approve_transfer(transfer.id).await.unwrap();
    assert_eq!(moved.id, original.id);
    assert_eq!(moved.user_id, new_manager.id);
    assert!(!repo.is_manager_of(old_manager.id, building.id).await.unwrap());

    let err = repo.approve_transfer(transfer.id).await.unwrap_err();
    assert!(matches!(err, BuildingError::TransferAlreadyApproved(_)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_service_lifecycle_notifies_requester() {
    let db = common::connect().await;
    let building = common::create_building(&db).await;
    let (manager_user, _) = common::create_user(&db, AccountRole::Resident).await;
    let (owner_user, _) = common::create_user(&db, AccountRole::Business).await;
    let (requester, _) = common::create_user(&db, AccountRole::Resident).await;
    let registry = BuildingRepository::new(db.clone());
    let catalog = ServiceRepository::new(db.clone());

    let manager = registry
        .register_manager(building.id, manager_user.id)
        .await
        .unwrap();
    let owner = registry
        .create_business_owner(owner_user.id, "Sparkle Ltd")
        .await
        .unwrap();

    let err = catalog
        .define(owner_user.id, manager.id, &definition())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotVerifiedOwner));

    registry.verify_business_owner(owner.id).await.unwrap();
    let service = catalog
        .define(owner_user.id, manager.id, &definition())
        .await
        .unwrap();
    assert!(!service.is_active);

    let err = catalog.request(requester.id, service.id, None).await.unwrap_err();
    assert!(matches!(err, ServiceError::Inactive(_)));

    let err = catalog.activate(service.id, owner_user.id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Catalog(CatalogError::NotServiceManager)
    ));
    catalog.activate(service.id, manager_user.id).await.unwrap();

    let listed = catalog.list_active(Some(building.id)).await.unwrap();
    assert!(listed.iter().any(|s| s.id == service.id));

    let request = catalog
        .request(requester.id, service.id, Some("Ground floor".to_string()))
        .await
        .unwrap();

    let err = catalog
        .update_request_status(request.id, requester.id, RequestStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transition(TransitionError::RequesterMayOnlyCancel)
    ));

    let approved = catalog
        .update_request_status(request.id, owner_user.id, RequestStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, sea_orm_active_enums::RequestStatus::Approved);

    let notices = NotificationRepository::new(db.clone())
        .list_for_user(requester.id)
        .await
        .unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("Window cleaning"));
}
