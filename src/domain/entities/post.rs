//! Post entity and repository trait.
//!
//! Maps to the `posts` table in the database schema.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Forum, Thread, User};
use crate::shared::error::AppError;

/// Represents a message posted in a thread.
///
/// Maps to the `posts` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - parent: BIGINT NOT NULL DEFAULT 0 (0 for root posts)
/// - author: CITEXT NOT NULL REFERENCES users(nickname)
/// - message: TEXT NOT NULL
/// - is_edited: BOOLEAN NOT NULL DEFAULT FALSE
/// - forum: CITEXT NOT NULL
/// - thread: INT NOT NULL REFERENCES threads(id)
/// - created: TIMESTAMPTZ NOT NULL
/// - path: BIGINT[] (root id first, set by trigger)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub parent: i64,
    pub author: String,
    pub message: String,
    #[serde(rename = "isEdited")]
    pub is_edited: bool,
    pub forum: String,
    pub thread: i32,
    pub created: DateTime<Utc>,
}

/// A post as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
}

/// Post ordering within a thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    /// By creation time, then id
    #[default]
    Flat,
    /// Depth-first by materialised path
    Tree,
    /// Like `Tree`, but `limit` counts root posts
    ParentTree,
}

impl FromStr for PostSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "flat" => Ok(Self::Flat),
            "tree" => Ok(Self::Tree),
            "parent_tree" => Ok(Self::ParentTree),
            other => Err(AppError::BadRequest(format!("Unknown sort: {}", other))),
        }
    }
}

/// Page request for the posts of a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListQuery {
    pub limit: i64,
    /// Post id to start after (exclusive)
    pub since: Option<i64>,
    pub sort: PostSort,
    pub desc: bool,
}

/// Which related entities to attach to a post lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostRelated {
    pub user: bool,
    pub forum: bool,
    pub thread: bool,
}

impl PostRelated {
    /// Parse a comma-separated list such as `user,thread`. Unknown items are ignored.
    pub fn parse(related: &str) -> Self {
        related
            .split(',')
            .map(str::trim)
            .fold(Self::default(), |mut acc, item| {
                match item {
                    "user" => acc.user = true,
                    "forum" => acc.forum = true,
                    "thread" => acc.thread = true,
                    _ => {}
                }
                acc
            })
    }
}

/// A post together with the related entities that were asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFull {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
}

/// Repository trait for Post data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert every post of the batch in one transaction, all sharing `created`.
    /// Authors must already be normalised to their stored nickname.
    async fn create_batch(
        &self,
        thread: &Thread,
        posts: &[NewPost],
        created: DateTime<Utc>,
    ) -> Result<Vec<Post>, AppError>;

    /// Of the given parent ids, return those that are not posts of `thread_id`.
    async fn foreign_parents(&self, thread_id: i32, parents: &[i64]) -> Result<Vec<i64>, AppError>;

    /// Find a post by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Replace the message. `is_edited` flips only if the text changes.
    async fn update_message(&self, id: i64, message: &str) -> Result<Option<Post>, AppError>;

    /// Posts of a thread in the requested order.
    async fn list_by_thread(&self, thread_id: i32, query: &PostListQuery) -> Result<Vec<Post>, AppError>;
}
