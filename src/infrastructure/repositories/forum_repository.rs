//! Forum Repository Implementation
//!
//! PostgreSQL implementation of the ForumRepository trait.

use async_trait::async_trait;
use sqlx::PgPool;

use super::map_write_error;
use crate::domain::{Forum, ForumRepository, NewForum};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ForumRow {
    slug: String,
    title: String,
    owner: String,
    posts: i64,
    threads: i32,
}

impl ForumRow {
    fn into_forum(self) -> Forum {
        Forum {
            title: self.title,
            user: self.owner,
            slug: self.slug,
            posts: self.posts,
            threads: self.threads,
        }
    }
}

const FORUM_COLUMNS: &str = r#"slug::text AS slug, title, "user"::text AS owner, posts, threads"#;

/// PostgreSQL forum repository implementation.
#[derive(Clone)]
pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    /// Create a new PgForumRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForumRepository for PgForumRepository {
    async fn create(&self, forum: &NewForum) -> Result<Forum, AppError> {
        let sql = format!(
            r#"INSERT INTO forums (slug, title, "user") VALUES ($1, $2, $3) RETURNING {}"#,
            FORUM_COLUMNS
        );
        let row = sqlx::query_as::<_, ForumRow>(&sql)
            .bind(&forum.slug)
            .bind(&forum.title)
            .bind(&forum.user)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Forum with this slug already exists"))?;

        Ok(row.into_forum())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Forum>, AppError> {
        let sql = format!("SELECT {} FROM forums WHERE slug = $1::citext", FORUM_COLUMNS);
        let row = sqlx::query_as::<_, ForumRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ForumRow::into_forum))
    }
}
