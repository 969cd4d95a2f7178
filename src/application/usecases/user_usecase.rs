//! User Usecase
//!
//! Handles user registration and profile management.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{User, UserRepository, UserUpdate};
use crate::shared::error::AppError;

/// User usecase trait
#[async_trait]
pub trait UserUsecase: Send + Sync {
    /// Register a user
    async fn create_user(&self, user: User) -> Result<User, UserError>;

    /// Get user by nickname
    async fn get_profile(&self, nickname: &str) -> Result<User, UserError>;

    /// Update user profile
    async fn update_profile(&self, nickname: &str, update: UserUpdate) -> Result<User, UserError>;
}

/// User usecase errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Can't find user with nickname: {0}")]
    NotFound(String),

    /// Every user holding the requested nickname or email.
    #[error("User already exists")]
    AlreadyExists(Vec<User>),

    #[error("This email is already registered: {0}")]
    EmailTaken(String),

    #[error(transparent)]
    Storage(#[from] AppError),
}

/// UserUsecase implementation
pub struct UserUsecaseImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserUsecaseImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<U> UserUsecase for UserUsecaseImpl<U>
where
    U: UserRepository + 'static,
{
    async fn create_user(&self, user: User) -> Result<User, UserError> {
        let conflicts = self
            .user_repo
            .find_conflicting(&user.nickname, &user.email)
            .await?;
        if !conflicts.is_empty() {
            return Err(UserError::AlreadyExists(conflicts));
        }

        match self.user_repo.create(&user).await {
            Ok(created) => Ok(created),
            // Lost a race with a concurrent registration
            Err(AppError::Conflict(_)) => {
                let conflicts = self
                    .user_repo
                    .find_conflicting(&user.nickname, &user.email)
                    .await?;
                Err(UserError::AlreadyExists(conflicts))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_profile(&self, nickname: &str) -> Result<User, UserError> {
        self.user_repo
            .find_by_nickname(nickname)
            .await?
            .ok_or_else(|| UserError::NotFound(nickname.to_string()))
    }

    async fn update_profile(&self, nickname: &str, update: UserUpdate) -> Result<User, UserError> {
        if update.is_empty() {
            return self.get_profile(nickname).await;
        }

        match self.user_repo.update(nickname, &update).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(UserError::NotFound(nickname.to_string())),
            Err(AppError::Conflict(_)) => Err(UserError::EmailTaken(
                update.email.unwrap_or_default(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
