//! Post Usecase
//!
//! Handles batch post creation, post details and thread post listings.
//! Reads users, threads and forums straight from their repositories.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ForumRepository, NewPost, Post, PostFull, PostListQuery, PostRelated, PostRepository, Thread,
    ThreadRef, ThreadRepository, UserRepository,
};
use crate::shared::error::AppError;

/// Post usecase trait
#[async_trait]
pub trait PostUsecase: Send + Sync {
    /// Create a batch of posts in a thread
    async fn create_posts(&self, slug_or_id: &str, posts: Vec<NewPost>) -> Result<Vec<Post>, PostError>;

    /// Get a post with the requested related entities
    async fn get_post(&self, id: i64, related: PostRelated) -> Result<PostFull, PostError>;

    /// Edit a post message
    async fn update_post(&self, id: i64, message: Option<String>) -> Result<Post, PostError>;

    /// Posts of a thread in the requested order
    async fn list_thread_posts(&self, slug_or_id: &str, query: PostListQuery) -> Result<Vec<Post>, PostError>;
}

/// Post usecase errors
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Can't find post thread by id: {0}")]
    ThreadNotFound(String),

    #[error("Can't find post author by nickname: {0}")]
    AuthorNotFound(String),

    #[error("Can't find post with id: {0}")]
    NotFound(i64),

    #[error("Parent post was created in another thread")]
    ParentConflict,

    #[error(transparent)]
    Storage(#[from] AppError),
}

/// PostUsecase implementation
pub struct PostUsecaseImpl<P, U, T, F>
where
    P: PostRepository,
    U: UserRepository,
    T: ThreadRepository,
    F: ForumRepository,
{
    post_repo: Arc<P>,
    user_repo: Arc<U>,
    thread_repo: Arc<T>,
    forum_repo: Arc<F>,
}

impl<P, U, T, F> PostUsecaseImpl<P, U, T, F>
where
    P: PostRepository,
    U: UserRepository,
    T: ThreadRepository,
    F: ForumRepository,
{
    pub fn new(post_repo: Arc<P>, user_repo: Arc<U>, thread_repo: Arc<T>, forum_repo: Arc<F>) -> Self {
        Self {
            post_repo,
            user_repo,
            thread_repo,
            forum_repo,
        }
    }

    async fn existing_thread(&self, slug_or_id: &str) -> Result<Thread, PostError> {
        self.thread_repo
            .find(&ThreadRef::parse(slug_or_id))
            .await?
            .ok_or_else(|| PostError::ThreadNotFound(slug_or_id.to_string()))
    }

    async fn existing_post(&self, id: i64) -> Result<Post, PostError> {
        self.post_repo
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id))
    }

    /// Rewrite every author to its stored nickname; fail on the first unknown one.
    async fn normalise_authors(&self, posts: Vec<NewPost>) -> Result<Vec<NewPost>, PostError> {
        let wanted: Vec<String> = posts
            .iter()
            .map(|p| p.author.to_lowercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let known: HashMap<String, String> = self
            .user_repo
            .find_by_nicknames(&wanted)
            .await?
            .into_iter()
            .map(|u| (u.nickname.to_lowercase(), u.nickname))
            .collect();

        posts
            .into_iter()
            .map(|post| match known.get(&post.author.to_lowercase()) {
                Some(nickname) => Ok(NewPost {
                    author: nickname.clone(),
                    ..post
                }),
                None => Err(PostError::AuthorNotFound(post.author)),
            })
            .collect()
    }
}

#[async_trait]
impl<P, U, T, F> PostUsecase for PostUsecaseImpl<P, U, T, F>
where
    P: PostRepository + 'static,
    U: UserRepository + 'static,
    T: ThreadRepository + 'static,
    F: ForumRepository + 'static,
{
    async fn create_posts(&self, slug_or_id: &str, posts: Vec<NewPost>) -> Result<Vec<Post>, PostError> {
        let thread = self.existing_thread(slug_or_id).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let posts = self.normalise_authors(posts).await?;

        let parents: Vec<i64> = posts
            .iter()
            .map(|p| p.parent)
            .filter(|&parent| parent != 0)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !self.post_repo.foreign_parents(thread.id, &parents).await?.is_empty() {
            return Err(PostError::ParentConflict);
        }

        Ok(self
            .post_repo
            .create_batch(&thread, &posts, Utc::now())
            .await?)
    }

    async fn get_post(&self, id: i64, related: PostRelated) -> Result<PostFull, PostError> {
        let post = self.existing_post(id).await?;

        let author = if related.user {
            self.user_repo.find_by_nickname(&post.author).await?
        } else {
            None
        };
        let thread = if related.thread {
            self.thread_repo.find(&ThreadRef::Id(post.thread)).await?
        } else {
            None
        };
        let forum = if related.forum {
            self.forum_repo.find_by_slug(&post.forum).await?
        } else {
            None
        };

        Ok(PostFull {
            post,
            author,
            thread,
            forum,
        })
    }

    async fn update_post(&self, id: i64, message: Option<String>) -> Result<Post, PostError> {
        match message.filter(|m| !m.is_empty()) {
            None => self.existing_post(id).await,
            Some(message) => self
                .post_repo
                .update_message(id, &message)
                .await?
                .ok_or(PostError::NotFound(id)),
        }
    }

    async fn list_thread_posts(&self, slug_or_id: &str, query: PostListQuery) -> Result<Vec<Post>, PostError> {
        let thread = self.existing_thread(slug_or_id).await?;
        Ok(self.post_repo.list_by_thread(thread.id, &query).await?)
    }
}
