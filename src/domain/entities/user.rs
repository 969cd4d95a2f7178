//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a forum user.
///
/// Maps to the `users` table:
/// - nickname: CITEXT PRIMARY KEY
/// - fullname: TEXT NOT NULL
/// - about: TEXT NOT NULL DEFAULT ''
/// - email: CITEXT NOT NULL UNIQUE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique nickname, compared case-insensitively
    pub nickname: String,

    /// Full name
    pub fullname: String,

    /// Free-form description
    #[serde(default)]
    pub about: String,

    /// Email address, unique case-insensitively
    pub email: String,
}

/// Partial profile update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub fullname: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none() && self.about.is_none() && self.email.is_none()
    }
}

/// Page request for the participants of a forum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumUsersQuery {
    pub limit: i64,
    /// Nickname to start after (exclusive)
    pub since: Option<String>,
    pub desc: bool,
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Returns `AppError::Conflict` on a nickname or email clash.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Find a user by nickname (case-insensitive).
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, AppError>;

    /// Find every user whose nickname is in `nicknames` (case-insensitive).
    async fn find_by_nicknames(&self, nicknames: &[String]) -> Result<Vec<User>, AppError>;

    /// Find users owning either the nickname or the email.
    async fn find_conflicting(&self, nickname: &str, email: &str) -> Result<Vec<User>, AppError>;

    /// Apply a partial update. Returns `None` if the user does not exist and
    /// `AppError::Conflict` if the new email is taken.
    async fn update(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>, AppError>;

    /// Users who created a thread or a post in the forum, ordered by nickname.
    async fn list_by_forum(
        &self,
        forum_slug: &str,
        query: &ForumUsersQuery,
    ) -> Result<Vec<User>, AppError>;
}
