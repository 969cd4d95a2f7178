//! Forum entity and repository trait.
//!
//! Maps to the `forums` table in the database schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a forum.
///
/// Maps to the `forums` table:
/// - slug: CITEXT PRIMARY KEY
/// - title: TEXT NOT NULL
/// - "user": CITEXT NOT NULL REFERENCES users(nickname)
/// - posts: BIGINT NOT NULL DEFAULT 0 (maintained by trigger)
/// - threads: INT NOT NULL DEFAULT 0 (maintained by trigger)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub title: String,

    /// Owner nickname
    pub user: String,

    pub slug: String,

    #[serde(default)]
    pub posts: i64,

    #[serde(default)]
    pub threads: i32,
}

/// Data required to open a forum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForum {
    pub title: String,
    pub user: String,
    pub slug: String,
}

/// Repository trait for Forum data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// Insert a forum. Returns `AppError::Conflict` if the slug is taken.
    async fn create(&self, forum: &NewForum) -> Result<Forum, AppError>;

    /// Find a forum by slug (case-insensitive).
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Forum>, AppError>;
}
