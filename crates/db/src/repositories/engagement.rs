//! Announcements and surveys published to a building.

use domus_core::{auth::AccountRole, engagement::Audience as DomainAudience};
use domus_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{
    announcements, buildings, sea_orm_active_enums::Audience, survey_responses, surveys,
};

/// Error types for announcements and surveys.
#[derive(Debug, thiserror::Error)]
pub enum EngagementError {
    /// Building not found.
    #[error("Building not found: {0}")]
    BuildingNotFound(i64),

    /// Announcement not found.
    #[error("Announcement not found: {0}")]
    AnnouncementNotFound(i64),

    /// Survey not found.
    #[error("Survey not found: {0}")]
    SurveyNotFound(i64),

    /// Survey no longer accepts responses.
    #[error("Survey {0} is closed")]
    SurveyClosed(i64),

    /// Blank title or response.
    #[error("{0} is required")]
    Empty(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EngagementError> for AppError {
    fn from(err: EngagementError) -> Self {
        match err {
            EngagementError::BuildingNotFound(_)
            | EngagementError::AnnouncementNotFound(_)
            | EngagementError::SurveyNotFound(_) => Self::NotFound(err.to_string()),
            EngagementError::SurveyClosed(_) | EngagementError::Empty(_) => {
                Self::Validation(err.to_string())
            }
            EngagementError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Announcement and survey repository.
#[derive(Debug, Clone)]
pub struct EngagementRepository {
    db: DatabaseConnection,
}

impl EngagementRepository {
    /// Creates a new engagement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_building(&self, building_id: i64) -> Result<(), EngagementError> {
        buildings::Entity::find_by_id(building_id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(EngagementError::BuildingNotFound(building_id))
    }

    /// Publishes an announcement.
    ///
    /// # Errors
    ///
    /// Returns `EngagementError::Empty` for a blank title.
    pub async fn announce(
        &self,
        building_id: i64,
        title: &str,
        content: &str,
        audience: DomainAudience,
    ) -> Result<announcements::Model, EngagementError> {
        if title.trim().is_empty() {
            return Err(EngagementError::Empty("title"));
        }
        self.ensure_building(building_id).await?;

        Ok(announcements::ActiveModel {
            building_id: Set(building_id),
            title: Set(title.trim().to_string()),
            content: Set(content.to_string()),
            is_active: Set(true),
            target_audience: Set(audience.into()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Finds an announcement by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_announcement(&self, id: i64) -> Result<Option<announcements::Model>, DbErr> {
        announcements::Entity::find_by_id(id).one(&self.db).await
    }

    /// Hides an announcement.
    ///
    /// # Errors
    ///
    /// Returns `EngagementError::AnnouncementNotFound` for an unknown id.
    pub async fn deactivate_announcement(
        &self,
        id: i64,
    ) -> Result<announcements::Model, EngagementError> {
        let announcement = self
            .find_announcement(id)
            .await?
            .ok_or(EngagementError::AnnouncementNotFound(id))?;

        let mut active: announcements::ActiveModel = announcement.into();
        active.is_active = Set(false);
        Ok(active.update(&self.db).await?)
    }

    /// Lists active announcements of a building whose audience reaches `role`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_announcements_for(
        &self,
        building_id: i64,
        role: AccountRole,
    ) -> Result<Vec<announcements::Model>, DbErr> {
        let audiences = DomainAudience::reaching(role).map(Audience::from);

        announcements::Entity::find()
            .filter(announcements::Column::BuildingId.eq(building_id))
            .filter(announcements::Column::IsActive.eq(true))
            .filter(announcements::Column::TargetAudience.is_in(audiences))
            .order_by_desc(announcements::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Opens a survey.
    ///
    /// # Errors
    ///
    /// Returns `EngagementError::Empty` for a blank title.
    pub async fn create_survey(
        &self,
        building_id: i64,
        title: &str,
        description: &str,
    ) -> Result<surveys::Model, EngagementError> {
        if title.trim().is_empty() {
            return Err(EngagementError::Empty("title"));
        }
        self.ensure_building(building_id).await?;

        Ok(surveys::ActiveModel {
            building_id: Set(building_id),
            title: Set(title.trim().to_string()),
            description: Set(description.to_string()),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Finds a survey by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_survey(&self, id: i64) -> Result<Option<surveys::Model>, DbErr> {
        surveys::Entity::find_by_id(id).one(&self.db).await
    }

    /// Closes a survey to new responses.
    ///
    /// # Errors
    ///
    /// Returns `EngagementError::SurveyNotFound` for an unknown id.
    pub async fn close_survey(&self, id: i64) -> Result<surveys::Model, EngagementError> {
        let survey = self
            .find_survey(id)
            .await?
            .ok_or(EngagementError::SurveyNotFound(id))?;

        let mut active: surveys::ActiveModel = survey.into();
        active.is_active = Set(false);
        Ok(active.update(&self.db).await?)
    }

    /// Lists open surveys of a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active_surveys(&self, building_id: i64) -> Result<Vec<surveys::Model>, DbErr> {
        surveys::Entity::find()
            .filter(surveys::Column::BuildingId.eq(building_id))
            .filter(surveys::Column::IsActive.eq(true))
            .order_by_desc(surveys::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Records a response to an open survey.
    ///
    /// # Errors
    ///
    /// Returns `EngagementError::SurveyClosed` once the survey is closed.
    pub async fn respond(
        &self,
        survey_id: i64,
        user_id: i64,
        response: &str,
    ) -> Result<survey_responses::Model, EngagementError> {
        if response.trim().is_empty() {
            return Err(EngagementError::Empty("response"));
        }
        let survey = self
            .find_survey(survey_id)
            .await?
            .ok_or(EngagementError::SurveyNotFound(survey_id))?;
        if !survey.is_active {
            return Err(EngagementError::SurveyClosed(survey_id));
        }

        Ok(survey_responses::ActiveModel {
            survey_id: Set(survey_id),
            user_id: Set(user_id),
            response: Set(response.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Lists responses to a survey in arrival order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_responses(
        &self,
        survey_id: i64,
    ) -> Result<Vec<survey_responses::Model>, DbErr> {
        survey_responses::Entity::find()
            .filter(survey_responses::Column::SurveyId.eq(survey_id))
            .order_by_asc(survey_responses::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
