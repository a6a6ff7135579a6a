//! Direct messages, notifications and reminders.

use domus_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{
    messages, notifications, reminders, sea_orm_active_enums::NotificationStatus, users,
};

/// Error types for messaging operations.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// Message not found.
    #[error("Message not found: {0}")]
    MessageNotFound(i64),

    /// Receiver not found.
    #[error("User not found: {0}")]
    ReceiverNotFound(i64),

    /// Only the receiver may mark a message read.
    #[error("Only the receiver can mark message {0} as read")]
    NotReceiver(i64),

    /// Blank message or reminder text.
    #[error("Message content is required")]
    EmptyContent,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<MessagingError> for AppError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::MessageNotFound(_) | MessagingError::ReceiverNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            MessagingError::NotReceiver(_) => Self::Forbidden(err.to_string()),
            MessagingError::EmptyContent => Self::Validation(err.to_string()),
            MessagingError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Direct message repository.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    db: DatabaseConnection,
}

impl MessageRepository {
    /// Creates a new message repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sends a message.
    ///
    /// # Errors
    ///
    /// Returns `MessagingError::ReceiverNotFound` for an unknown receiver.
    pub async fn send(
        &self,
        sender_id: i64,
        receiver_id: i64,
        content: &str,
    ) -> Result<messages::Model, MessagingError> {
        if content.trim().is_empty() {
            return Err(MessagingError::EmptyContent);
        }
        if users::Entity::find_by_id(receiver_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(MessagingError::ReceiverNotFound(receiver_id));
        }

        Ok(messages::ActiveModel {
            sender_id: Set(sender_id),
            receiver_id: Set(receiver_id),
            content: Set(content.to_string()),
            is_read: Set(false),
            sent_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Lists messages received by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn inbox(&self, user_id: i64) -> Result<Vec<messages::Model>, DbErr> {
        messages::Entity::find()
            .filter(messages::Column::ReceiverId.eq(user_id))
            .order_by_desc(messages::Column::SentAt)
            .all(&self.db)
            .await
    }

    /// Marks a message read.
    ///
    /// # Errors
    ///
    /// Returns `MessagingError::NotReceiver` unless `user_id` received it.
    pub async fn mark_read(
        &self,
        message_id: i64,
        user_id: i64,
    ) -> Result<messages::Model, MessagingError> {
        let message = messages::Entity::find_by_id(message_id)
            .one(&self.db)
            .await?
            .ok_or(MessagingError::MessageNotFound(message_id))?;
        if message.receiver_id != user_id {
            return Err(MessagingError::NotReceiver(message_id));
        }

        let mut active: messages::ActiveModel = message.into();
        active.is_read = Set(true);
        Ok(active.update(&self.db).await?)
    }
}

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a delivered notification on any connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        message: &str,
    ) -> Result<notifications::Model, DbErr> {
        notifications::ActiveModel {
            user_id: Set(user_id),
            message: Set(message.to_string()),
            status: Set(NotificationStatus::Sent),
            sent_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Lists a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<notifications::Model>, DbErr> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::SentAt)
            .all(&self.db)
            .await
    }
}

/// Reminder repository. Reminders are stored only; nothing sends them.
#[derive(Debug, Clone)]
pub struct ReminderRepository {
    db: DatabaseConnection,
}

impl ReminderRepository {
    /// Creates a new reminder repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Schedules a reminder.
    ///
    /// # Errors
    ///
    /// Returns `MessagingError::EmptyContent` for blank text.
    pub async fn create(
        &self,
        user_id: i64,
        message: &str,
        send_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<reminders::Model, MessagingError> {
        if message.trim().is_empty() {
            return Err(MessagingError::EmptyContent);
        }

        Ok(reminders::ActiveModel {
            user_id: Set(user_id),
            message: Set(message.to_string()),
            send_at: Set(send_at.into()),
            sent: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Lists a user's reminders by send time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<reminders::Model>, DbErr> {
        reminders::Entity::find()
            .filter(reminders::Column::UserId.eq(user_id))
            .order_by_asc(reminders::Column::SendAt)
            .all(&self.db)
            .await
    }
}
