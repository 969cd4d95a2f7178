//! Forum Usecase
//!
//! Handles forum creation, lookup and the forum participant listing.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Forum, ForumRepository, ForumUsersQuery, NewForum, User, UserRepository};
use crate::shared::error::AppError;

/// Forum usecase trait
#[async_trait]
pub trait ForumUsecase: Send + Sync {
    /// Open a new forum owned by an existing user
    async fn create_forum(&self, forum: NewForum) -> Result<Forum, ForumError>;

    /// Get forum by slug
    async fn get_forum(&self, slug: &str) -> Result<Forum, ForumError>;

    /// Users who wrote a thread or a post in the forum
    async fn list_users(&self, slug: &str, query: ForumUsersQuery) -> Result<Vec<User>, ForumError>;
}

/// Forum usecase errors
#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    #[error("Can't find user with nickname: {0}")]
    UserNotFound(String),

    #[error("Can't find forum with slug: {0}")]
    NotFound(String),

    #[error("Forum already exists")]
    AlreadyExists(Forum),

    #[error(transparent)]
    Storage(#[from] AppError),
}

/// ForumUsecase implementation
pub struct ForumUsecaseImpl<F, U>
where
    F: ForumRepository,
    U: UserRepository,
{
    forum_repo: Arc<F>,
    user_repo: Arc<U>,
}

impl<F, U> ForumUsecaseImpl<F, U>
where
    F: ForumRepository,
    U: UserRepository,
{
    pub fn new(forum_repo: Arc<F>, user_repo: Arc<U>) -> Self {
        Self {
            forum_repo,
            user_repo,
        }
    }

    async fn existing_forum(&self, slug: &str) -> Result<Forum, ForumError> {
        self.forum_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| ForumError::NotFound(slug.to_string()))
    }
}

#[async_trait]
impl<F, U> ForumUsecase for ForumUsecaseImpl<F, U>
where
    F: ForumRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create_forum(&self, forum: NewForum) -> Result<Forum, ForumError> {
        let owner = self
            .user_repo
            .find_by_nickname(&forum.user)
            .await?
            .ok_or_else(|| ForumError::UserNotFound(forum.user.clone()))?;

        if let Some(existing) = self.forum_repo.find_by_slug(&forum.slug).await? {
            return Err(ForumError::AlreadyExists(existing));
        }

        let forum = NewForum {
            user: owner.nickname,
            ..forum
        };
        match self.forum_repo.create(&forum).await {
            Ok(created) => Ok(created),
            Err(AppError::Conflict(_)) => {
                let existing = self.existing_forum(&forum.slug).await?;
                Err(ForumError::AlreadyExists(existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_forum(&self, slug: &str) -> Result<Forum, ForumError> {
        self.existing_forum(slug).await
    }

    async fn list_users(&self, slug: &str, query: ForumUsersQuery) -> Result<Vec<User>, ForumError> {
        let forum = self.existing_forum(slug).await?;
        Ok(self.user_repo.list_by_forum(&forum.slug, &query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockForumRepository, MockUserRepository};
    use pretty_assertions::assert_eq;

    fn owner() -> User {
        User {
            nickname: "J.Sparrow".into(),
            fullname: "Jack Sparrow".into(),
            about: String::new(),
            email: "jack@sea.com".into(),
        }
    }

    fn forum(slug: &str, user: &str) -> Forum {
        Forum {
            title: "Pirate stories".into(),
            user: user.into(),
            slug: slug.into(),
            posts: 0,
            threads: 0,
        }
    }

    fn new_forum() -> NewForum {
        NewForum {
            title: "Pirate stories".into(),
            user: "j.sparrow".into(),
            slug: "pirate-stories".into(),
        }
    }

    #[tokio::test]
    async fn test_create_forum_normalises_owner_nickname() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_nickname()
            .returning(|_| Ok(Some(owner())));
        let mut forums = MockForumRepository::new();
        forums.expect_find_by_slug().returning(|_| Ok(None));
        forums
            .expect_create()
            .withf(|f| f.user == "J.Sparrow")
            .returning(|f| Ok(forum(&f.slug, &f.user)));

        let usecase = ForumUsecaseImpl::new(Arc::new(forums), Arc::new(users));
        let created = usecase.create_forum(new_forum()).await.unwrap();
        assert_eq!(created.user, "J.Sparrow");
    }

    #[tokio::test]
    async fn test_create_forum_unknown_owner() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_nickname().returning(|_| Ok(None));
        let mut forums = MockForumRepository::new();
        forums.expect_create().never();

        let usecase = ForumUsecaseImpl::new(Arc::new(forums), Arc::new(users));
        let err = usecase.create_forum(new_forum()).await.unwrap_err();
        assert_eq!(err.to_string(), "Can't find user with nickname: j.sparrow");
    }

    #[tokio::test]
    async fn test_create_forum_returns_existing_on_duplicate_slug() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_nickname()
            .returning(|_| Ok(Some(owner())));
        let mut forums = MockForumRepository::new();
        forums
            .expect_find_by_slug()
            .returning(|_| Ok(Some(forum("Pirate-Stories", "someone"))));
        forums.expect_create().never();

        let usecase = ForumUsecaseImpl::new(Arc::new(forums), Arc::new(users));
        match usecase.create_forum(new_forum()).await {
            Err(ForumError::AlreadyExists(existing)) => {
                assert_eq!(existing.slug, "Pirate-Stories")
            }
            other => panic!("expected existing forum, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_users_of_missing_forum() {
        let users = MockUserRepository::new();
        let mut forums = MockForumRepository::new();
        forums.expect_find_by_slug().returning(|_| Ok(None));

        let usecase = ForumUsecaseImpl::new(Arc::new(forums), Arc::new(users));
        let query = ForumUsersQuery {
            limit: 100,
            since: None,
            desc: false,
        };
        let err = usecase.list_users("nowhere", query).await.unwrap_err();
        assert!(matches!(err, ForumError::NotFound(ref slug) if slug == "nowhere"));
    }

    #[tokio::test]
    async fn test_list_users_uses_stored_slug() {
        let mut users = MockUserRepository::new();
        users
            .expect_list_by_forum()
            .withf(|slug, q| slug == "Pirate-Stories" && q.limit == 2)
            .returning(|_, _| Ok(vec![owner()]));
        let mut forums = MockForumRepository::new();
        forums
            .expect_find_by_slug()
            .returning(|_| Ok(Some(forum("Pirate-Stories", "J.Sparrow"))));

        let usecase = ForumUsecaseImpl::new(Arc::new(forums), Arc::new(users));
        let query = ForumUsersQuery {
            limit: 2,
            since: None,
            desc: true,
        };
        let found = usecase.list_users("pirate-stories", query).await.unwrap();
        assert_eq!(found, vec![owner()]);
    }
}
