//! Thread Usecase
//!
//! Handles thread creation, updates, votes and forum thread listings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ForumRepository, NewThread, Thread, ThreadListQuery, ThreadRef, ThreadRepository, ThreadUpdate,
    UserRepository, Vote,
};
use crate::shared::error::AppError;

/// Thread usecase trait
#[async_trait]
pub trait ThreadUsecase: Send + Sync {
    /// Open a thread in a forum
    async fn create_thread(&self, forum_slug: &str, thread: CreateThreadDto) -> Result<Thread, ThreadError>;

    /// Get thread by slug or id
    async fn get_thread(&self, slug_or_id: &str) -> Result<Thread, ThreadError>;

    /// Update thread title and/or message
    async fn update_thread(&self, slug_or_id: &str, update: ThreadUpdate) -> Result<Thread, ThreadError>;

    /// Cast or change a vote
    async fn vote(&self, slug_or_id: &str, vote: Vote) -> Result<Thread, ThreadError>;

    /// Threads of a forum ordered by creation time
    async fn list_forum_threads(
        &self,
        forum_slug: &str,
        query: ThreadListQuery,
    ) -> Result<Vec<Thread>, ThreadError>;
}

/// Create thread request
#[derive(Debug, Clone, Default)]
pub struct CreateThreadDto {
    pub title: String,
    pub author: String,
    pub message: String,
    pub slug: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// Thread usecase errors
#[derive(Debug, thiserror::Error)]
pub enum ThreadError {
    #[error("Can't find user with nickname: {0}")]
    UserNotFound(String),

    #[error("Can't find forum with slug: {0}")]
    ForumNotFound(String),

    #[error("Can't find thread by slug or id: {0}")]
    NotFound(String),

    #[error("Thread already exists")]
    AlreadyExists(Thread),

    #[error("Voice must be either 1 or -1")]
    InvalidVoice,

    #[error(transparent)]
    Storage(#[from] AppError),
}

/// ThreadUsecase implementation
pub struct ThreadUsecaseImpl<T, U, F>
where
    T: ThreadRepository,
    U: UserRepository,
    F: ForumRepository,
{
    thread_repo: Arc<T>,
    user_repo: Arc<U>,
    forum_repo: Arc<F>,
}

impl<T, U, F> ThreadUsecaseImpl<T, U, F>
where
    T: ThreadRepository,
    U: UserRepository,
    F: ForumRepository,
{
    pub fn new(thread_repo: Arc<T>, user_repo: Arc<U>, forum_repo: Arc<F>) -> Self {
        Self {
            thread_repo,
            user_repo,
            forum_repo,
        }
    }

    async fn existing_thread(&self, slug_or_id: &str) -> Result<Thread, ThreadError> {
        self.thread_repo
            .find(&ThreadRef::parse(slug_or_id))
            .await?
            .ok_or_else(|| ThreadError::NotFound(slug_or_id.to_string()))
    }
}

#[async_trait]
impl<T, U, F> ThreadUsecase for ThreadUsecaseImpl<T, U, F>
where
    T: ThreadRepository + 'static,
    U: UserRepository + 'static,
    F: ForumRepository + 'static,
{
    async fn create_thread(&self, forum_slug: &str, thread: CreateThreadDto) -> Result<Thread, ThreadError> {
        let author = self
            .user_repo
            .find_by_nickname(&thread.author)
            .await?
            .ok_or_else(|| ThreadError::UserNotFound(thread.author.clone()))?;

        let forum = self
            .forum_repo
            .find_by_slug(forum_slug)
            .await?
            .ok_or_else(|| ThreadError::ForumNotFound(forum_slug.to_string()))?;

        let slug = thread.slug.filter(|s| !s.is_empty());
        if let Some(slug) = &slug {
            if let Some(existing) = self.thread_repo.find(&ThreadRef::Slug(slug.clone())).await? {
                return Err(ThreadError::AlreadyExists(existing));
            }
        }

        let new_thread = NewThread {
            title: thread.title,
            author: author.nickname,
            forum: forum.slug,
            message: thread.message,
            slug,
            created: thread.created.unwrap_or_else(Utc::now),
        };

        match self.thread_repo.create(&new_thread).await {
            Ok(created) => Ok(created),
            Err(AppError::Conflict(_)) => {
                let slug = new_thread.slug.unwrap_or_default();
                let existing = self
                    .thread_repo
                    .find(&ThreadRef::Slug(slug.clone()))
                    .await?
                    .ok_or(ThreadError::NotFound(slug))?;
                Err(ThreadError::AlreadyExists(existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_thread(&self, slug_or_id: &str) -> Result<Thread, ThreadError> {
        self.existing_thread(slug_or_id).await
    }

    async fn update_thread(&self, slug_or_id: &str, update: ThreadUpdate) -> Result<Thread, ThreadError> {
        let thread = self.existing_thread(slug_or_id).await?;
        if update.title.is_none() && update.message.is_none() {
            return Ok(thread);
        }

        self.thread_repo
            .update(thread.id, &update)
            .await?
            .ok_or_else(|| ThreadError::NotFound(slug_or_id.to_string()))
    }

    async fn vote(&self, slug_or_id: &str, vote: Vote) -> Result<Thread, ThreadError> {
        if !vote.is_valid() {
            return Err(ThreadError::InvalidVoice);
        }

        let thread = self.existing_thread(slug_or_id).await?;
        let voter = self
            .user_repo
            .find_by_nickname(&vote.nickname)
            .await?
            .ok_or_else(|| ThreadError::UserNotFound(vote.nickname.clone()))?;

        let vote = Vote {
            nickname: voter.nickname,
            voice: vote.voice,
        };
        Ok(self.thread_repo.vote(thread.id, &vote).await?)
    }

    async fn list_forum_threads(
        &self,
        forum_slug: &str,
        query: ThreadListQuery,
    ) -> Result<Vec<Thread>, ThreadError> {
        let forum = self
            .forum_repo
            .find_by_slug(forum_slug)
            .await?
            .ok_or_else(|| ThreadError::ForumNotFound(forum_slug.to_string()))?;

        Ok(self.thread_repo.list_by_forum(&forum.slug, &query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Forum, MockForumRepository, MockThreadRepository, MockUserRepository, User};
    use pretty_assertions::assert_eq;

    fn user(nickname: &str) -> User {
        User {
            nickname: nickname.into(),
            fullname: "Will Turner".into(),
            about: String::new(),
            email: format!("{}@sea.com", nickname),
        }
    }

    fn forum(slug: &str) -> Forum {
        Forum {
            title: "Pirates".into(),
            user: "J.Sparrow".into(),
            slug: slug.into(),
            posts: 0,
            threads: 0,
        }
    }

    fn thread(id: i32, slug: Option<&str>) -> Thread {
        Thread {
            id,
            title: "Davy Jones cache".into(),
            author: "W.Turner".into(),
            forum: "Pirates".into(),
            message: "An urgent message".into(),
            votes: 0,
            slug: slug.map(Into::into),
            created: Utc::now(),
        }
    }

    fn draft(slug: Option<&str>) -> CreateThreadDto {
        CreateThreadDto {
            title: "Davy Jones cache".into(),
            author: "w.turner".into(),
            message: "An urgent message".into(),
            slug: slug.map(Into::into),
            created: None,
        }
    }

    fn usecase(
        threads: MockThreadRepository,
        users: MockUserRepository,
        forums: MockForumRepository,
    ) -> ThreadUsecaseImpl<MockThreadRepository, MockUserRepository, MockForumRepository> {
        ThreadUsecaseImpl::new(Arc::new(threads), Arc::new(users), Arc::new(forums))
    }

    #[tokio::test]
    async fn test_create_thread_normalises_author_and_forum() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_nickname()
            .returning(|_| Ok(Some(user("W.Turner"))));
        let mut forums = MockForumRepository::new();
        forums
            .expect_find_by_slug()
            .returning(|_| Ok(Some(forum("Pirates"))));
        let mut threads = MockThreadRepository::new();
        threads
            .expect_create()
            .withf(|t| t.author == "W.Turner" && t.forum == "Pirates" && t.slug.is_none())
            .returning(|_| Ok(thread(1, None)));

        let created = usecase(threads, users, forums)
            .create_thread("pirates", draft(Some("")))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_create_thread_in_missing_forum() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_nickname()
            .returning(|_| Ok(Some(user("W.Turner"))));
        let mut forums = MockForumRepository::new();
        forums.expect_find_by_slug().returning(|_| Ok(None));
        let mut threads = MockThreadRepository::new();
        threads.expect_create().never();

        let err = usecase(threads, users, forums)
            .create_thread("nowhere", draft(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ThreadError::ForumNotFound(ref s) if s == "nowhere"));
    }

    #[tokio::test]
    async fn test_create_thread_with_taken_slug_returns_existing() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_nickname()
            .returning(|_| Ok(Some(user("W.Turner"))));
        let mut forums = MockForumRepository::new();
        forums
            .expect_find_by_slug()
            .returning(|_| Ok(Some(forum("Pirates"))));
        let mut threads = MockThreadRepository::new();
        threads
            .expect_find()
            .withf(|r| *r == ThreadRef::Slug("jones-cache".into()))
            .returning(|_| Ok(Some(thread(7, Some("jones-cache")))));
        threads.expect_create().never();

        let err = usecase(threads, users, forums)
            .create_thread("pirates", draft(Some("jones-cache")))
            .await
            .unwrap_err();
        assert!(matches!(err, ThreadError::AlreadyExists(ref t) if t.id == 7));
    }

    #[tokio::test]
    async fn test_vote_rejects_zero_voice() {
        let err = usecase(
            MockThreadRepository::new(),
            MockUserRepository::new(),
            MockForumRepository::new(),
        )
        .vote(
            "1",
            Vote {
                nickname: "w.turner".into(),
                voice: 0,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ThreadError::InvalidVoice));
    }

    #[tokio::test]
    async fn test_vote_by_id_uses_stored_nickname() {
        let mut threads = MockThreadRepository::new();
        threads
            .expect_find()
            .withf(|r| *r == ThreadRef::Id(42))
            .returning(|_| Ok(Some(thread(42, None))));
        threads
            .expect_vote()
            .withf(|id, v| *id == 42 && v.nickname == "W.Turner" && v.voice == -1)
            .returning(|_, _| {
                let mut voted = thread(42, None);
                voted.votes = -1;
                Ok(voted)
            });
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_nickname()
            .returning(|_| Ok(Some(user("W.Turner"))));

        let voted = usecase(threads, users, MockForumRepository::new())
            .vote(
                "42",
                Vote {
                    nickname: "w.turner".into(),
                    voice: -1,
                },
            )
            .await
            .unwrap();
        assert_eq!(voted.votes, -1);
    }

    #[tokio::test]
    async fn test_vote_on_missing_thread() {
        let mut threads = MockThreadRepository::new();
        threads.expect_find().returning(|_| Ok(None));
        threads.expect_vote().never();

        let err = usecase(threads, MockUserRepository::new(), MockForumRepository::new())
            .vote(
                "no-such-thread",
                Vote {
                    nickname: "w.turner".into(),
                    voice: 1,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Can't find thread by slug or id: no-such-thread");
    }

    #[tokio::test]
    async fn test_empty_update_skips_write() {
        let mut threads = MockThreadRepository::new();
        threads
            .expect_find()
            .returning(|_| Ok(Some(thread(3, Some("calm-seas")))));
        threads.expect_update().never();

        let unchanged = usecase(threads, MockUserRepository::new(), MockForumRepository::new())
            .update_thread("calm-seas", ThreadUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged.id, 3);
    }
}
