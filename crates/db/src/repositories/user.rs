//! User repository for database operations.

use domus_core::auth::AccountRole as DomainRole;
use domus_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};

use super::{is_unique_violation, wallet::WalletRepository};
use crate::entities::{sea_orm_active_enums::AccountRole, users, wallets};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Username already registered.
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UsernameTaken(_) => Self::Conflict(err.to_string()),
            UserError::NotFound(_) => Self::NotFound(err.to_string()),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Unique username.
    pub username: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Account role.
    pub role: DomainRole,
    /// Site-admin flag.
    pub is_admin: bool,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates an account together with its empty wallet.
    ///
    /// Both rows are written in one transaction, so every account has a wallet.
    ///
    /// # Errors
    ///
    /// Returns `UserError::UsernameTaken` if the username exists.
    pub async fn create_with_wallet(
        &self,
        input: CreateUserInput,
    ) -> Result<(users::Model, wallets::Model), UserError> {
        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            username: Set(input.username.clone()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(input.role.into()),
            is_admin: Set(input.is_admin),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = match user.insert(&txn).await {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(UserError::UsernameTaken(input.username));
            }
            Err(e) => return Err(e.into()),
        };

        let wallet = WalletRepository::open(&txn, user.id).await?;

        txn.commit().await?;

        Ok((user, wallet))
    }

    /// Changes a user's role on any connection.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user does not exist.
    pub async fn set_role<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        role: DomainRole,
    ) -> Result<users::Model, UserError> {
        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let mut active: users::ActiveModel = user.into();
        active.role = Set(AccountRole::from(role));
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(db).await?)
    }
}
