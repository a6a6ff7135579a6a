//! Service catalog repository: service definitions and service requests.

use domus_core::{
    catalog::{
        CatalogError, RequestActor, RequestStatus as DomainRequestStatus, ServiceDefinition,
        TransitionError, ensure_can_activate,
    },
    engagement::request_status_notice,
};
use domus_shared::{AppError, types::UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tracing::info;

use super::messaging::NotificationRepository;
use crate::entities::{
    building_managers, business_owners, sea_orm_active_enums::RequestStatus, service_requests,
    services,
};

/// Error types for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Service not found.
    #[error("Service not found: {0}")]
    NotFound(i64),

    /// Service request not found.
    #[error("Service request not found: {0}")]
    RequestNotFound(i64),

    /// Building manager not found.
    #[error("Building manager not found: {0}")]
    ManagerNotFound(i64),

    /// Caller has no verified business-owner profile.
    #[error("A verified business owner profile is required")]
    NotVerifiedOwner,

    /// Service is not active.
    #[error("Service {0} is not active")]
    Inactive(i64),

    /// Caller is neither requester nor provider.
    #[error("Not a party to service request {0}")]
    NotParticipant(i64),

    /// Definition or activation rule failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Status change refused.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_)
            | ServiceError::RequestNotFound(_)
            | ServiceError::ManagerNotFound(_) => Self::NotFound(err.to_string()),
            ServiceError::NotVerifiedOwner
            | ServiceError::NotParticipant(_)
            | ServiceError::Catalog(CatalogError::NotServiceManager)
            | ServiceError::Transition(TransitionError::RequesterMayOnlyCancel) => {
                Self::Forbidden(err.to_string())
            }
            ServiceError::Inactive(_) | ServiceError::Catalog(_) | ServiceError::Transition(_) => {
                Self::Validation(err.to_string())
            }
            ServiceError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Service catalog repository.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    db: DatabaseConnection,
}

impl ServiceRepository {
    /// Creates a new service repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Defines a service offered by the caller's business through a building
    /// manager. The service starts inactive.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotVerifiedOwner` unless the caller holds a
    /// verified business-owner profile, and `ServiceError::Catalog` for an
    /// invalid definition.
    pub async fn define(
        &self,
        owner_user_id: i64,
        building_manager_id: i64,
        definition: &ServiceDefinition,
    ) -> Result<services::Model, ServiceError> {
        definition.validate()?;

        let owner = business_owners::Entity::find()
            .filter(business_owners::Column::UserId.eq(owner_user_id))
            .one(&self.db)
            .await?
            .filter(|o| o.verified)
            .ok_or(ServiceError::NotVerifiedOwner)?;

        if building_managers::Entity::find_by_id(building_manager_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::ManagerNotFound(building_manager_id));
        }

        let service = services::ActiveModel {
            name: Set(definition.name.trim().to_string()),
            description: Set(definition.description.clone()),
            cost: Set(definition.cost),
            available_from: Set(definition.available_from.into()),
            available_to: Set(definition.available_to.into()),
            building_manager_id: Set(building_manager_id),
            business_owner_id: Set(owner.id),
            is_active: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(service_id = service.id, owner_id = owner.id, "service defined");
        Ok(service)
    }

    /// Activates a service on behalf of the building manager named on it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Catalog(CatalogError::NotServiceManager)` for
    /// any other caller.
    pub async fn activate(
        &self,
        service_id: i64,
        actor_user_id: i64,
    ) -> Result<services::Model, ServiceError> {
        let service = services::Entity::find_by_id(service_id)
            .one(&self.db)
            .await?
            .ok_or(ServiceError::NotFound(service_id))?;

        let manager = building_managers::Entity::find_by_id(service.building_manager_id)
            .one(&self.db)
            .await?
            .ok_or(ServiceError::ManagerNotFound(service.building_manager_id))?;

        ensure_can_activate(UserId::new(actor_user_id), UserId::new(manager.user_id))?;

        let mut active: services::ActiveModel = service.into();
        active.is_active = Set(true);
        let service = active.update(&self.db).await?;

        info!(service_id, "service activated");
        Ok(service)
    }

    /// Finds a service by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<services::Model>, DbErr> {
        services::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists active services, optionally for one building.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self, building_id: Option<i64>) -> Result<Vec<services::Model>, DbErr> {
        let mut query = services::Entity::find().filter(services::Column::IsActive.eq(true));

        if let Some(building_id) = building_id {
            let Some(manager) = building_managers::Entity::find()
                .filter(building_managers::Column::BuildingId.eq(building_id))
                .one(&self.db)
                .await?
            else {
                return Ok(Vec::new());
            };
            query = query.filter(services::Column::BuildingManagerId.eq(manager.id));
        }

        query.order_by_asc(services::Column::Name).all(&self.db).await
    }

    /// Files a pending request for an active service.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Inactive` if the service is not active.
    pub async fn request(
        &self,
        user_id: i64,
        service_id: i64,
        additional_info: Option<String>,
    ) -> Result<service_requests::Model, ServiceError> {
        let service = services::Entity::find_by_id(service_id)
            .one(&self.db)
            .await?
            .ok_or(ServiceError::NotFound(service_id))?;
        if !service.is_active {
            return Err(ServiceError::Inactive(service_id));
        }

        Ok(service_requests::ActiveModel {
            user_id: Set(user_id),
            service_id: Set(service_id),
            requested_at: Set(chrono::Utc::now().into()),
            status: Set(RequestStatus::Pending),
            additional_info: Set(additional_info),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Lists the caller's service requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_requests_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<service_requests::Model>, DbErr> {
        service_requests::Entity::find()
            .filter(service_requests::Column::UserId.eq(user_id))
            .order_by_desc(service_requests::Column::RequestedAt)
            .all(&self.db)
            .await
    }

    /// Moves a request to `next` and notifies the requester, in one
    /// transaction.
    ///
    /// The service's business owner and building manager act as provider;
    /// the requester may only cancel.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotParticipant` for unrelated callers and
    /// `ServiceError::Transition` when the lifecycle refuses the move.
    pub async fn update_request_status(
        &self,
        request_id: i64,
        actor_user_id: i64,
        next: DomainRequestStatus,
    ) -> Result<service_requests::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let request = service_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::RequestNotFound(request_id))?;
        let service = services::Entity::find_by_id(request.service_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound(request.service_id))?;

        let owner_user = business_owners::Entity::find_by_id(service.business_owner_id)
            .one(&txn)
            .await?
            .map(|o| o.user_id);
        let manager_user = building_managers::Entity::find_by_id(service.building_manager_id)
            .one(&txn)
            .await?
            .map(|m| m.user_id);

        let actor = if owner_user == Some(actor_user_id) || manager_user == Some(actor_user_id) {
            RequestActor::Provider
        } else if request.user_id == actor_user_id {
            RequestActor::Requester
        } else {
            return Err(ServiceError::NotParticipant(request_id));
        };

        let status = DomainRequestStatus::from(request.status).transition(next, actor)?;
        let requester = request.user_id;

        let mut active: service_requests::ActiveModel = request.into();
        active.status = Set(status.into());
        let request = active.update(&txn).await?;

        NotificationRepository::record(&txn, requester, &request_status_notice(&service.name, status))
            .await?;

        txn.commit().await?;

        info!(request_id, status = %status, "service request updated");
        Ok(request)
    }
}
