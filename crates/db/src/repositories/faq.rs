//! FAQ repository.

use domus_shared::AppError;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};

use crate::entities::faqs;

/// Error types for FAQ entries.
#[derive(Debug, thiserror::Error)]
pub enum FaqError {
    /// Entry not found.
    #[error("FAQ not found: {0}")]
    NotFound(i64),

    /// Blank question or answer.
    #[error("Question and answer are required")]
    Empty,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<FaqError> for AppError {
    fn from(err: FaqError) -> Self {
        match err {
            FaqError::NotFound(_) => Self::NotFound(err.to_string()),
            FaqError::Empty => Self::Validation(err.to_string()),
            FaqError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// FAQ repository.
#[derive(Debug, Clone)]
pub struct FaqRepository {
    db: DatabaseConnection,
}

impl FaqRepository {
    /// Creates a new FAQ repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all entries in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<faqs::Model>, DbErr> {
        faqs::Entity::find()
            .order_by_asc(faqs::Column::Id)
            .all(&self.db)
            .await
    }

    /// Adds an entry.
    ///
    /// # Errors
    ///
    /// Returns `FaqError::Empty` if either field is blank.
    pub async fn create(&self, question: &str, answer: &str) -> Result<faqs::Model, FaqError> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            return Err(FaqError::Empty);
        }

        let now = chrono::Utc::now().into();
        Ok(faqs::ActiveModel {
            question: Set(question.trim().to_string()),
            answer: Set(answer.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Replaces an entry's question and answer.
    ///
    /// # Errors
    ///
    /// Returns `FaqError::NotFound` for an unknown id.
    pub async fn update(
        &self,
        id: i64,
        question: &str,
        answer: &str,
    ) -> Result<faqs::Model, FaqError> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            return Err(FaqError::Empty);
        }
        let faq = faqs::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(FaqError::NotFound(id))?;

        let mut active: faqs::ActiveModel = faq.into();
        active.question = Set(question.trim().to_string());
        active.answer = Set(answer.trim().to_string());
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }
}
