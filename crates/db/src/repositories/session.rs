//! Refresh-token sessions.
//!
//! A session is opened at login and looked up again by `/auth/refresh`. Only
//! the SHA-256 hex digest of the refresh token is stored, so a leaked
//! `sessions` row cannot be replayed.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use sha2::{Digest, Sha256};

use crate::entities::sessions;

/// Longest user agent kept on a session row.
pub const USER_AGENT_MAX_CHARS: usize = 255;

/// Session repository.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hex SHA-256 of a refresh token.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }

    /// Records a sign-in for `user_id`. The user agent is cut to
    /// [`USER_AGENT_MAX_CHARS`].
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        user_id: i64,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
        user_agent: Option<&str>,
    ) -> Result<sessions::Model, DbErr> {
        sessions::ActiveModel {
            user_id: Set(user_id),
            refresh_token_hash: Set(Self::hash_token(refresh_token)),
            user_agent: Set(user_agent.map(|ua| ua.chars().take(USER_AGENT_MAX_CHARS).collect())),
            expires_at: Set(expires_at.into()),
            revoked_at: Set(None),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Finds the session for a refresh token if it is neither revoked nor
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(Self::hash_token(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Ends the session holding this refresh token.
    ///
    /// Returns `false` when the token matched no open session. Expired
    /// sessions are still stamped so the row shows the logout.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn revoke_by_token(&self, refresh_token: &str) -> Result<bool, DbErr> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(Utc::now()))
            .filter(sessions::Column::RefreshTokenHash.eq(Self::hash_token(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
