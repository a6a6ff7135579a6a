//! Issue report repository.

use domus_core::engagement::{IssueError, IssueStatus as DomainIssueStatus, validate_description};
use domus_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{issue_reports, residents, sea_orm_active_enums::IssueStatus};

/// Error types for issue reports.
#[derive(Debug, thiserror::Error)]
pub enum IssueReportError {
    /// Caller has no resident profile.
    #[error("Only residents can report issues")]
    NotResident,

    /// Issue not found.
    #[error("Issue not found: {0}")]
    NotFound(i64),

    /// Rule violation.
    #[error(transparent)]
    Issue(#[from] IssueError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<IssueReportError> for AppError {
    fn from(err: IssueReportError) -> Self {
        match err {
            IssueReportError::NotResident => Self::Forbidden(err.to_string()),
            IssueReportError::NotFound(_) => Self::NotFound(err.to_string()),
            IssueReportError::Issue(_) => Self::Validation(err.to_string()),
            IssueReportError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Issue report repository.
#[derive(Debug, Clone)]
pub struct IssueRepository {
    db: DatabaseConnection,
}

impl IssueRepository {
    /// Creates a new issue repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Files an issue against the caller's resident profile.
    ///
    /// # Errors
    ///
    /// Returns `IssueReportError::NotResident` if the user has no resident
    /// profile.
    pub async fn report(
        &self,
        user_id: i64,
        description: &str,
    ) -> Result<issue_reports::Model, IssueReportError> {
        validate_description(description)?;

        let resident = residents::Entity::find()
            .filter(residents::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(IssueReportError::NotResident)?;

        let now = chrono::Utc::now().into();
        Ok(issue_reports::ActiveModel {
            resident_id: Set(resident.id),
            description: Set(description.trim().to_string()),
            status: Set(IssueStatus::Open),
            notes: Set(None),
            reported_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Finds an issue with the building of its reporter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_building(
        &self,
        id: i64,
    ) -> Result<Option<(issue_reports::Model, i64)>, DbErr> {
        let Some(issue) = issue_reports::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let building_id = residents::Entity::find_by_id(issue.resident_id)
            .one(&self.db)
            .await?
            .map(|r| r.building_id);

        Ok(building_id.map(|b| (issue, b)))
    }

    /// Lists issues reported by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<issue_reports::Model>, DbErr> {
        let Some(resident) = residents::Entity::find()
            .filter(residents::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(Vec::new());
        };

        issue_reports::Entity::find()
            .filter(issue_reports::Column::ResidentId.eq(resident.id))
            .order_by_desc(issue_reports::Column::ReportedAt)
            .all(&self.db)
            .await
    }

    /// Lists issues reported by residents of a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_building(
        &self,
        building_id: i64,
    ) -> Result<Vec<issue_reports::Model>, DbErr> {
        let resident_ids: Vec<i64> = residents::Entity::find()
            .select_only()
            .column(residents::Column::Id)
            .filter(residents::Column::BuildingId.eq(building_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        issue_reports::Entity::find()
            .filter(issue_reports::Column::ResidentId.is_in(resident_ids))
            .order_by_desc(issue_reports::Column::ReportedAt)
            .all(&self.db)
            .await
    }

    /// Updates status and/or notes. Resolved issues may be reopened.
    ///
    /// # Errors
    ///
    /// Returns `IssueReportError::Issue(IssueError::Unchanged)` when the new
    /// status equals the current one.
    pub async fn update(
        &self,
        id: i64,
        status: Option<DomainIssueStatus>,
        notes: Option<String>,
    ) -> Result<issue_reports::Model, IssueReportError> {
        let issue = issue_reports::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(IssueReportError::NotFound(id))?;

        let current = DomainIssueStatus::from(issue.status);
        let mut active: issue_reports::ActiveModel = issue.into();

        if let Some(next) = status {
            active.status = Set(current.transition(next)?.into());
        }
        if let Some(notes) = notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}
