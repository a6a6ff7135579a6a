//! Building registry: buildings, role profiles, management transfers and contracts.
//!
//! Each account holds at most one role profile. The role check itself lives in
//! [`RoleProfile::validate_for`]; this module enforces the one-profile rule
//! against storage.

use domus_core::{
    auth::AccountRole as DomainRole,
    engagement::ContractStatus as DomainContractStatus,
    profile::{ProfileError, ResidentType as DomainResidentType, RoleProfile},
};
use domus_shared::{AppError, types::BuildingId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::{
    is_unique_violation,
    user::{UserError, UserRepository},
};
use crate::entities::{
    building_managers, buildings, business_owners, contracts, management_transfer_requests,
    residents, sea_orm_active_enums::ContractStatus, users,
};

/// Error types for building registry operations.
#[derive(Debug, thiserror::Error)]
pub enum BuildingError {
    /// Building not found.
    #[error("Building not found: {0}")]
    NotFound(i64),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// Manager profile not found.
    #[error("Building manager not found: {0}")]
    ManagerNotFound(i64),

    /// Business owner profile not found.
    #[error("Business owner not found: {0}")]
    BusinessOwnerNotFound(i64),

    /// Building or user already has a manager profile.
    #[error("Building {building_id} or user {user_id} already has a manager")]
    ManagerExists {
        /// Building being staffed.
        building_id: i64,
        /// Prospective manager.
        user_id: i64,
    },

    /// User already holds a role profile.
    #[error("User {0} already has a profile")]
    ProfileExists(i64),

    /// Profile does not fit the account.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Transfer request not found.
    #[error("Transfer request not found: {0}")]
    TransferNotFound(i64),

    /// Transfer request was approved before.
    #[error("Transfer request {0} is already approved")]
    TransferAlreadyApproved(i64),

    /// Contract not found.
    #[error("Contract not found: {0}")]
    ContractNotFound(i64),

    /// Contract was approved before.
    #[error("Contract {0} is already approved")]
    ContractAlreadyApproved(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for BuildingError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => Self::UserNotFound(id),
            UserError::UsernameTaken(_) => Self::Database(DbErr::Custom(err.to_string())),
            UserError::Database(e) => Self::Database(e),
        }
    }
}

impl From<BuildingError> for AppError {
    fn from(err: BuildingError) -> Self {
        match err {
            BuildingError::NotFound(_)
            | BuildingError::UserNotFound(_)
            | BuildingError::ManagerNotFound(_)
            | BuildingError::BusinessOwnerNotFound(_)
            | BuildingError::TransferNotFound(_)
            | BuildingError::ContractNotFound(_) => Self::NotFound(err.to_string()),
            BuildingError::ManagerExists { .. }
            | BuildingError::ProfileExists(_)
            | BuildingError::TransferAlreadyApproved(_)
            | BuildingError::ContractAlreadyApproved(_) => Self::Conflict(err.to_string()),
            BuildingError::Profile(e) => Self::Validation(e.to_string()),
            BuildingError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Loads a user or fails with `UserNotFound`.
async fn load_user<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<users::Model, BuildingError> {
    users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(BuildingError::UserNotFound(user_id))
}

/// Fails with `NotFound` unless the building exists.
async fn ensure_building<C: ConnectionTrait>(db: &C, building_id: i64) -> Result<(), BuildingError> {
    buildings::Entity::find_by_id(building_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or(BuildingError::NotFound(building_id))
}

/// Fails with `ProfileExists` if the user has any role profile.
async fn ensure_no_profile<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<(), BuildingError> {
    let has_resident = residents::Entity::find()
        .filter(residents::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .is_some();
    let has_manager = building_managers::Entity::find()
        .filter(building_managers::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .is_some();
    let has_business = business_owners::Entity::find()
        .filter(business_owners::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .is_some();

    if has_resident || has_manager || has_business {
        return Err(BuildingError::ProfileExists(user_id));
    }
    Ok(())
}

/// Building registry repository.
#[derive(Debug, Clone)]
pub struct BuildingRepository {
    db: DatabaseConnection,
}

impl BuildingRepository {
    /// Creates a new building repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, name: &str, address: &str) -> Result<buildings::Model, DbErr> {
        buildings::ActiveModel {
            name: Set(name.to_string()),
            address: Set(address.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Finds a building by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<buildings::Model>, DbErr> {
        buildings::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists all buildings by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<buildings::Model>, DbErr> {
        buildings::Entity::find()
            .order_by_asc(buildings::Column::Name)
            .all(&self.db)
            .await
    }

    /// Makes `user_id` the manager of `building_id`.
    ///
    /// Switches the account's role to manager and creates the manager profile,
    /// approved by an admin but not yet verified, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `BuildingError::ManagerExists` if either side is already taken
    /// and `BuildingError::ProfileExists` if the user holds another profile.
    pub async fn register_manager(
        &self,
        building_id: i64,
        user_id: i64,
    ) -> Result<building_managers::Model, BuildingError> {
        let txn = self.db.begin().await?;

        ensure_building(&txn, building_id).await?;
        load_user(&txn, user_id).await?;

        let taken = building_managers::Entity::find()
            .filter(
                building_managers::Column::BuildingId
                    .eq(building_id)
                    .or(building_managers::Column::UserId.eq(user_id)),
            )
            .one(&txn)
            .await?
            .is_some();
        if taken {
            return Err(BuildingError::ManagerExists {
                building_id,
                user_id,
            });
        }
        ensure_no_profile(&txn, user_id).await?;

        let user = UserRepository::set_role(&txn, user_id, DomainRole::Manager).await?;
        RoleProfile::Manager {
            building_id: BuildingId::new(building_id),
        }
        .validate_for(user.role.into())?;

        let manager = building_managers::ActiveModel {
            user_id: Set(user_id),
            building_id: Set(building_id),
            verified: Set(false),
            approved_by_admin: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BuildingError::ManagerExists {
                    building_id,
                    user_id,
                }
            } else {
                BuildingError::Database(e)
            }
        })?;

        txn.commit().await?;

        info!(building_id, user_id, manager_id = manager.id, "building manager registered");
        Ok(manager)
    }

    /// Marks a manager profile verified.
    ///
    /// # Errors
    ///
    /// Returns `BuildingError::ManagerNotFound` for an unknown profile.
    pub async fn verify_manager(
        &self,
        manager_id: i64,
    ) -> Result<building_managers::Model, BuildingError> {
        let manager = building_managers::Entity::find_by_id(manager_id)
            .one(&self.db)
            .await?
            .ok_or(BuildingError::ManagerNotFound(manager_id))?;

        let mut active: building_managers::ActiveModel = manager.into();
        active.verified = Set(true);
        Ok(active.update(&self.db).await?)
    }

    /// Finds the manager profile held by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_manager_for_user(
        &self,
        user_id: i64,
    ) -> Result<Option<building_managers::Model>, DbErr> {
        building_managers::Entity::find()
            .filter(building_managers::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Returns true if `user_id` manages `building_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_manager_of(&self, user_id: i64, building_id: i64) -> Result<bool, DbErr> {
        Ok(self
            .find_manager_for_user(user_id)
            .await?
            .is_some_and(|m| m.building_id == building_id))
    }

    /// Adds a resident profile for a resident account.
    ///
    /// # Errors
    ///
    /// Returns `BuildingError::Profile` if the account is not a resident and
    /// `BuildingError::ProfileExists` if it already has a profile.
    pub async fn add_resident(
        &self,
        building_id: i64,
        user_id: i64,
        resident_type: DomainResidentType,
    ) -> Result<residents::Model, BuildingError> {
        ensure_building(&self.db, building_id).await?;
        let user = load_user(&self.db, user_id).await?;

        RoleProfile::Resident {
            building_id: BuildingId::new(building_id),
            resident_type,
        }
        .validate_for(user.role.into())?;
        ensure_no_profile(&self.db, user_id).await?;

        residents::ActiveModel {
            user_id: Set(user_id),
            building_id: Set(building_id),
            resident_type: Set(resident_type.into()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BuildingError::ProfileExists(user_id)
            } else {
                BuildingError::Database(e)
            }
        })
    }

    /// Lists residents of a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_residents(&self, building_id: i64) -> Result<Vec<residents::Model>, DbErr> {
        residents::Entity::find()
            .filter(residents::Column::BuildingId.eq(building_id))
            .order_by_asc(residents::Column::Id)
            .all(&self.db)
            .await
    }

    /// Creates the business-owner profile for a business account. Unverified.
    ///
    /// # Errors
    ///
    /// Returns `BuildingError::Profile` for the wrong role or a blank name and
    /// `BuildingError::ProfileExists` if the account already has a profile.
    pub async fn create_business_owner(
        &self,
        user_id: i64,
        business_name: &str,
    ) -> Result<business_owners::Model, BuildingError> {
        let user = load_user(&self.db, user_id).await?;

        RoleProfile::Business {
            business_name: business_name.to_string(),
        }
        .validate_for(user.role.into())?;
        ensure_no_profile(&self.db, user_id).await?;

        business_owners::ActiveModel {
            user_id: Set(user_id),
            business_name: Set(business_name.trim().to_string()),
            verified: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BuildingError::ProfileExists(user_id)
            } else {
                BuildingError::Database(e)
            }
        })
    }

    /// Marks a business owner verified.
    ///
    /// # Errors
    ///
    /// Returns `BuildingError::BusinessOwnerNotFound` for an unknown profile.
    pub async fn verify_business_owner(
        &self,
        id: i64,
    ) -> Result<business_owners::Model, BuildingError> {
        let owner = business_owners::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BuildingError::BusinessOwnerNotFound(id))?;

        let mut active: business_owners::ActiveModel = owner.into();
        active.verified = Set(true);
        Ok(active.update(&self.db).await?)
    }

    /// Records a request to hand a building's management to `new_manager_id`.
    ///
    /// # Errors
    ///
    /// Returns `BuildingError::NotFound` for an unknown building.
    pub async fn request_transfer(
        &self,
        building_id: i64,
        new_manager_id: i64,
    ) -> Result<management_transfer_requests::Model, BuildingError> {
        ensure_building(&self.db, building_id).await?;

        Ok(management_transfer_requests::ActiveModel {
            building_id: Set(building_id),
            new_manager_id: Set(new_manager_id),
            approved: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Approves a transfer and moves the building's manager profile to the
    /// requester.
    ///
    /// The profile row keeps its id, so services and contracts attached to the
    /// building's management follow it. A building without a manager gets a
    /// fresh profile.
    ///
    /// # Errors
    ///
    /// Returns `BuildingError::TransferAlreadyApproved` on a second approval
    /// and `BuildingError::ManagerExists` if the requester manages another
    /// building.
    pub async fn approve_transfer(
        &self,
        transfer_id: i64,
    ) -> Result<building_managers::Model, BuildingError> {
        let txn = self.db.begin().await?;

        let transfer = management_transfer_requests::Entity::find_by_id(transfer_id)
            .one(&txn)
            .await?
            .ok_or(BuildingError::TransferNotFound(transfer_id))?;
        if transfer.approved {
            return Err(BuildingError::TransferAlreadyApproved(transfer_id));
        }

        let building_id = transfer.building_id;
        let new_manager_id = transfer.new_manager_id;

        let elsewhere = building_managers::Entity::find()
            .filter(building_managers::Column::UserId.eq(new_manager_id))
            .filter(building_managers::Column::BuildingId.ne(building_id))
            .one(&txn)
            .await?
            .is_some();
        if elsewhere {
            return Err(BuildingError::ManagerExists {
                building_id,
                user_id: new_manager_id,
            });
        }

        let mut active: management_transfer_requests::ActiveModel = transfer.into();
        active.approved = Set(true);
        active.update(&txn).await?;

        UserRepository::set_role(&txn, new_manager_id, DomainRole::Manager).await?;

        let current = building_managers::Entity::find()
            .filter(building_managers::Column::BuildingId.eq(building_id))
            .one(&txn)
            .await?;

        let manager = match current {
            Some(current) => {
                let mut active: building_managers::ActiveModel = current.into();
                active.user_id = Set(new_manager_id);
                active.verified = Set(false);
                active.approved_by_admin = Set(true);
                active.update(&txn).await?
            }
            None => {
                building_managers::ActiveModel {
                    user_id: Set(new_manager_id),
                    building_id: Set(building_id),
                    verified: Set(false),
                    approved_by_admin: Set(true),
                    created_at: Set(chrono::Utc::now().into()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;

        info!(transfer_id, building_id, new_manager_id, "management transferred");
        Ok(manager)
    }

    /// Records a contract for a manager profile. Pending until approved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_contract(
        &self,
        manager_id: i64,
        details: &str,
    ) -> Result<contracts::Model, DbErr> {
        contracts::ActiveModel {
            manager_id: Set(manager_id),
            details: Set(details.to_string()),
            verified: Set(false),
            status: Set(ContractStatus::Pending),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Approves and verifies a pending contract.
    ///
    /// # Errors
    ///
    /// Returns `BuildingError::ContractAlreadyApproved` on a second approval.
    pub async fn approve_contract(&self, id: i64) -> Result<contracts::Model, BuildingError> {
        let contract = contracts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BuildingError::ContractNotFound(id))?;

        if !DomainContractStatus::from(contract.status).can_approve() {
            return Err(BuildingError::ContractAlreadyApproved(id));
        }

        let mut active: contracts::ActiveModel = contract.into();
        active.status = Set(ContractStatus::Approved);
        active.verified = Set(true);
        Ok(active.update(&self.db).await?)
    }
}
