//! Subscription repository.

use domus_core::billing::SubscriptionTerms;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use super::payment::PaymentError;
use crate::entities::{buildings, subscriptions, users};

/// Repository for recurring fee definitions.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    db: DatabaseConnection,
}

impl SubscriptionRepository {
    /// Creates a new subscription repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Defines a subscription for a user in a building.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::BuildingNotFound` or `PaymentError::UserNotFound`
    /// if either side does not exist.
    pub async fn create(
        &self,
        building_id: i64,
        user_id: i64,
        terms: &SubscriptionTerms,
    ) -> Result<subscriptions::Model, PaymentError> {
        if buildings::Entity::find_by_id(building_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(PaymentError::BuildingNotFound(building_id));
        }
        if users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(PaymentError::UserNotFound(user_id));
        }

        let subscription = subscriptions::ActiveModel {
            building_id: Set(building_id),
            user_id: Set(user_id),
            amount: Set(terms.amount),
            start_date: Set(terms.start_date),
            end_date: Set(terms.end_date),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        Ok(subscription.insert(&self.db).await?)
    }

    /// Finds a subscription by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<subscriptions::Model>, DbErr> {
        subscriptions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists a user's subscriptions, latest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<subscriptions::Model>, DbErr> {
        subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .order_by_desc(subscriptions::Column::StartDate)
            .all(&self.db)
            .await
    }
}
