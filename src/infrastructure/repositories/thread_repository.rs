//! Thread Repository Implementation
//!
//! PostgreSQL implementation of the ThreadRepository trait, including votes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::map_write_error;
use crate::domain::{NewThread, Thread, ThreadListQuery, ThreadRef, ThreadRepository, ThreadUpdate, Vote};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ThreadRow {
    id: i32,
    title: String,
    author: String,
    forum: String,
    message: String,
    votes: i32,
    slug: Option<String>,
    created: DateTime<Utc>,
}

impl ThreadRow {
    fn into_thread(self) -> Thread {
        Thread {
            id: self.id,
            title: self.title,
            author: self.author,
            forum: self.forum,
            message: self.message,
            votes: self.votes,
            slug: self.slug,
            created: self.created,
        }
    }
}

const THREAD_COLUMNS: &str = "id, title, author::text AS author, forum::text AS forum, message, \
                              votes, slug::text AS slug, created";

/// PostgreSQL thread repository implementation.
#[derive(Clone)]
pub struct PgThreadRepository {
    pool: PgPool,
}

impl PgThreadRepository {
    /// Create a new PgThreadRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Thread>, AppError> {
        let sql = format!("SELECT {} FROM threads WHERE id = $1", THREAD_COLUMNS);
        let row = sqlx::query_as::<_, ThreadRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ThreadRow::into_thread))
    }
}

#[async_trait]
impl ThreadRepository for PgThreadRepository {
    async fn create(&self, thread: &NewThread) -> Result<Thread, AppError> {
        let sql = format!(
            r#"
            INSERT INTO threads (title, author, forum, message, slug, created)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            THREAD_COLUMNS
        );
        let row = sqlx::query_as::<_, ThreadRow>(&sql)
            .bind(&thread.title)
            .bind(&thread.author)
            .bind(&thread.forum)
            .bind(&thread.message)
            .bind(&thread.slug)
            .bind(thread.created)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Thread with this slug already exists"))?;

        Ok(row.into_thread())
    }

    async fn find(&self, thread: &ThreadRef) -> Result<Option<Thread>, AppError> {
        match thread {
            ThreadRef::Id(id) => self.find_by_id(*id).await,
            ThreadRef::Slug(slug) => {
                let sql = format!("SELECT {} FROM threads WHERE slug = $1::citext", THREAD_COLUMNS);
                let row = sqlx::query_as::<_, ThreadRow>(&sql)
                    .bind(slug)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(row.map(ThreadRow::into_thread))
            }
        }
    }

    async fn update(&self, id: i32, update: &ThreadUpdate) -> Result<Option<Thread>, AppError> {
        let sql = format!(
            r#"
            UPDATE threads
            SET title = COALESCE($2, title),
                message = COALESCE($3, message)
            WHERE id = $1
            RETURNING {}
            "#,
            THREAD_COLUMNS
        );
        let row = sqlx::query_as::<_, ThreadRow>(&sql)
            .bind(id)
            .bind(&update.title)
            .bind(&update.message)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ThreadRow::into_thread))
    }

    async fn vote(&self, id: i32, vote: &Vote) -> Result<Thread, AppError> {
        sqlx::query(
            r#"
            INSERT INTO votes (thread, nickname, voice)
            VALUES ($1, $2, $3)
            ON CONFLICT (thread, nickname) DO UPDATE SET voice = EXCLUDED.voice
            "#,
        )
        .bind(id)
        .bind(&vote.nickname)
        .bind(vote.voice)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Vote conflicts with an existing one"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Can't find thread by slug or id: {}", id)))
    }

    async fn list_by_forum(
        &self,
        forum_slug: &str,
        query: &ThreadListQuery,
    ) -> Result<Vec<Thread>, AppError> {
        let (cmp, order) = if query.desc { ("<=", "DESC") } else { (">=", "ASC") };
        let sql = format!(
            r#"
            SELECT {THREAD_COLUMNS}
            FROM threads
            WHERE forum = $1::citext
              AND ($2::timestamptz IS NULL OR created {cmp} $2)
            ORDER BY created {order}, id {order}
            LIMIT $3
            "#,
        );
        let rows = sqlx::query_as::<_, ThreadRow>(&sql)
            .bind(forum_slug)
            .bind(query.since)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ThreadRow::into_thread).collect())
    }
}
