//! Thread entity, votes, and repository trait.
//!
//! Maps to the `threads` and `votes` tables in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a discussion thread inside a forum.
///
/// Maps to the `threads` table:
/// - id: SERIAL PRIMARY KEY
/// - title: TEXT NOT NULL
/// - author: CITEXT NOT NULL REFERENCES users(nickname)
/// - forum: CITEXT NOT NULL REFERENCES forums(slug)
/// - message: TEXT NOT NULL
/// - votes: INT NOT NULL DEFAULT 0 (maintained by trigger)
/// - slug: CITEXT NULL UNIQUE
/// - created: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    pub votes: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
}

/// Data required to open a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThread {
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
}

/// Partial thread update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
}

/// A user's voice on a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub nickname: String,
    pub voice: i32,
}

impl Vote {
    /// Only up (+1) and down (-1) votes exist.
    pub fn is_valid(&self) -> bool {
        self.voice == 1 || self.voice == -1
    }
}

/// Threads are addressed either by numeric id or by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadRef {
    Id(i32),
    Slug(String),
}

impl ThreadRef {
    /// Anything that parses as an integer is an id, the rest is a slug.
    pub fn parse(slug_or_id: &str) -> Self {
        match slug_or_id.parse::<i32>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Slug(slug_or_id.to_string()),
        }
    }
}

impl std::fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Slug(slug) => write!(f, "{}", slug),
        }
    }
}

/// Page request for the threads of a forum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadListQuery {
    pub limit: i64,
    /// Creation time to start from (inclusive)
    pub since: Option<DateTime<Utc>>,
    pub desc: bool,
}

/// Repository trait for Thread data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Insert a thread. Returns `AppError::Conflict` if the slug is taken.
    async fn create(&self, thread: &NewThread) -> Result<Thread, AppError>;

    /// Find a thread by id or slug.
    async fn find(&self, thread: &ThreadRef) -> Result<Option<Thread>, AppError>;

    /// Apply a partial update to the thread with `id`.
    async fn update(&self, id: i32, update: &ThreadUpdate) -> Result<Option<Thread>, AppError>;

    /// Record (or replace) a vote and return the thread with its new total.
    async fn vote(&self, id: i32, vote: &Vote) -> Result<Thread, AppError>;

    /// Threads of a forum ordered by creation time.
    async fn list_by_forum(
        &self,
        forum_slug: &str,
        query: &ThreadListQuery,
    ) -> Result<Vec<Thread>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("42", ThreadRef::Id(42) ; "numeric id")]
    #[test_case("-7", ThreadRef::Id(-7) ; "negative id")]
    #[test_case("my-thread", ThreadRef::Slug("my-thread".into()) ; "slug")]
    #[test_case("42abc", ThreadRef::Slug("42abc".into()) ; "slug with leading digits")]
    fn test_thread_ref_parse(input: &str, expected: ThreadRef) {
        assert_eq!(ThreadRef::parse(input), expected);
    }

    #[test]
    fn test_vote_validity() {
        let mut vote = Vote {
            nickname: "a".into(),
            voice: 1,
        };
        assert!(vote.is_valid());
        vote.voice = -1;
        assert!(vote.is_valid());
        vote.voice = 0;
        assert!(!vote.is_valid());
        vote.voice = 2;
        assert!(!vote.is_valid());
    }

    #[test]
    fn test_thread_without_slug_omits_field() {
        let thread = Thread {
            id: 1,
            title: "t".into(),
            author: "a".into(),
            forum: "f".into(),
            message: "m".into(),
            votes: 0,
            slug: None,
            created: Utc::now(),
        };
        let json = serde_json::to_value(&thread).unwrap();
        assert!(json.get("slug").is_none());
    }
}
