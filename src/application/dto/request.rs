//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::application::usecases::CreateThreadDto;
use crate::domain::{
    ForumUsersQuery, NewForum, PostListQuery, PostSort, ThreadListQuery, ThreadUpdate, User,
    UserUpdate,
};
use crate::shared::error::AppError;

/// Page size used when the client does not send `limit`.
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest page a client may request.
pub const MAX_LIMIT: i64 = 10_000;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Create user request (nickname comes from the path)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub fullname: String,

    #[serde(default)]
    pub about: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

impl CreateUserRequest {
    pub fn into_user(self, nickname: String) -> User {
        User {
            nickname,
            fullname: self.fullname,
            about: self.about,
            email: self.email,
        }
    }
}

/// Update user request; omitted or empty fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub fullname: Option<String>,

    pub about: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Treat empty strings as absent so they are neither validated nor stored.
    pub fn without_empty_fields(self) -> Self {
        Self {
            fullname: non_empty(self.fullname),
            about: non_empty(self.about),
            email: non_empty(self.email),
        }
    }
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            fullname: non_empty(req.fullname),
            about: non_empty(req.about),
            email: non_empty(req.email),
        }
    }
}

/// Create forum request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateForumRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Owner nickname is required"))]
    pub user: String,

    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
}

impl From<CreateForumRequest> for NewForum {
    fn from(req: CreateForumRequest) -> Self {
        Self {
            title: req.title,
            user: req.user,
            slug: req.slug,
        }
    }
}

/// Create thread request (forum comes from the path)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThreadRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Author nickname is required"))]
    pub author: String,

    pub message: String,

    pub slug: Option<String>,

    pub created: Option<DateTime<Utc>>,
}

impl From<CreateThreadRequest> for CreateThreadDto {
    fn from(req: CreateThreadRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            message: req.message,
            slug: req.slug,
            created: req.created,
        }
    }
}

/// Update thread request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateThreadRequest {
    pub title: Option<String>,
    pub message: Option<String>,
}

impl From<UpdateThreadRequest> for ThreadUpdate {
    fn from(req: UpdateThreadRequest) -> Self {
        Self {
            title: non_empty(req.title),
            message: non_empty(req.message),
        }
    }
}

/// Update post request
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub message: Option<String>,
}

/// `?limit&since&desc` for forum participants
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ForumUsersParams {
    #[validate(range(min = 1, max = 10000, message = "limit must be between 1 and 10000"))]
    pub limit: Option<i64>,
    pub since: Option<String>,
    #[serde(default)]
    pub desc: bool,
}

impl From<ForumUsersParams> for ForumUsersQuery {
    fn from(params: ForumUsersParams) -> Self {
        Self {
            limit: params.limit.unwrap_or(DEFAULT_LIMIT),
            since: non_empty(params.since),
            desc: params.desc,
        }
    }
}

/// `?limit&since&desc` for forum threads
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ForumThreadsParams {
    #[validate(range(min = 1, max = 10000, message = "limit must be between 1 and 10000"))]
    pub limit: Option<i64>,
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub desc: bool,
}

impl From<ForumThreadsParams> for ThreadListQuery {
    fn from(params: ForumThreadsParams) -> Self {
        Self {
            limit: params.limit.unwrap_or(DEFAULT_LIMIT),
            since: params.since,
            desc: params.desc,
        }
    }
}

/// `?limit&since&sort&desc` for thread posts
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ThreadPostsParams {
    #[validate(range(min = 1, max = 10000, message = "limit must be between 1 and 10000"))]
    pub limit: Option<i64>,
    pub since: Option<i64>,
    pub sort: Option<String>,
    #[serde(default)]
    pub desc: bool,
}

impl TryFrom<ThreadPostsParams> for PostListQuery {
    type Error = AppError;

    fn try_from(params: ThreadPostsParams) -> Result<Self, Self::Error> {
        let sort = params
            .sort
            .as_deref()
            .unwrap_or_default()
            .parse::<PostSort>()?;
        Ok(Self {
            limit: params.limit.unwrap_or(DEFAULT_LIMIT),
            since: params.since,
            sort,
            desc: params.desc,
        })
    }
}

/// `?related=user,forum,thread` for post details
#[derive(Debug, Default, Deserialize)]
pub struct PostDetailsParams {
    #[serde(default)]
    pub related: String,
}
