//! Post Repository Implementation
//!
//! PostgreSQL implementation of the PostRepository trait.
//!
//! Posts carry a materialised `path` (root id first, own id last) filled in
//! by the `posts_set_path` trigger; tree orderings sort on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::map_write_error;
use crate::domain::{NewPost, Post, PostListQuery, PostRepository, PostSort, Thread};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    parent: i64,
    author: String,
    message: String,
    is_edited: bool,
    forum: String,
    thread: i32,
    created: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: self.id,
            parent: self.parent,
            author: self.author,
            message: self.message,
            is_edited: self.is_edited,
            forum: self.forum,
            thread: self.thread,
            created: self.created,
        }
    }
}

const POST_COLUMNS: &str = "id, parent, author::text AS author, message, is_edited, \
                            forum::text AS forum, thread, created";

/// PostgreSQL post repository implementation.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the listing query for one sort mode.
///
/// Binds: `$1` thread id, `$2` since post id (nullable), `$3` limit.
fn list_sql(sort: PostSort, desc: bool) -> String {
    let (cmp, order) = if desc { ("<", "DESC") } else { (">", "ASC") };
    match sort {
        PostSort::Flat => format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE thread = $1
              AND ($2::bigint IS NULL OR (created, id) {cmp} (SELECT created, id FROM posts WHERE id = $2))
            ORDER BY created {order}, id {order}
            LIMIT $3
            "#
        ),
        PostSort::Tree => format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE thread = $1
              AND ($2::bigint IS NULL OR path {cmp} (SELECT path FROM posts WHERE id = $2))
            ORDER BY path {order}, id {order}
            LIMIT $3
            "#
        ),
        // Limit applies to roots; each root comes with its whole subtree,
        // and `desc` reverses the roots only.
        PostSort::ParentTree => format!(
            r#"
            WITH roots AS (
                SELECT id
                FROM posts
                WHERE thread = $1
                  AND parent = 0
                  AND ($2::bigint IS NULL OR id {cmp} (SELECT path[1] FROM posts WHERE id = $2))
                ORDER BY id {order}
                LIMIT $3
            )
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE path[1] IN (SELECT id FROM roots)
            ORDER BY path[1] {order}, path ASC
            "#
        ),
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create_batch(
        &self,
        thread: &Thread,
        posts: &[NewPost],
        created: DateTime<Utc>,
    ) -> Result<Vec<Post>, AppError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let parents: Vec<i64> = posts.iter().map(|p| p.parent).collect();
        let authors: Vec<String> = posts.iter().map(|p| p.author.clone()).collect();
        let messages: Vec<String> = posts.iter().map(|p| p.message.clone()).collect();

        // One statement: the batch is inserted entirely or not at all.
        let sql = format!(
            r#"
            INSERT INTO posts (parent, author, message, forum, thread, created)
            SELECT p.parent, p.author, p.message, $4, $5, $6
            FROM UNNEST($1::bigint[], $2::text[], $3::text[]) WITH ORDINALITY AS p(parent, author, message, ord)
            ORDER BY p.ord
            RETURNING {POST_COLUMNS}
            "#
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(&parents)
            .bind(&authors)
            .bind(&messages)
            .bind(&thread.forum)
            .bind(thread.id)
            .bind(created)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Post conflicts with existing data"))?;

        // Ids follow insertion order, which follows input order.
        let mut created_posts: Vec<Post> = rows.into_iter().map(PostRow::into_post).collect();
        created_posts.sort_by_key(|p| p.id);
        Ok(created_posts)
    }

    async fn foreign_parents(&self, thread_id: i32, parents: &[i64]) -> Result<Vec<i64>, AppError> {
        if parents.is_empty() {
            return Ok(Vec::new());
        }

        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT p.id
            FROM UNNEST($2::bigint[]) AS p(id)
            WHERE NOT EXISTS (SELECT 1 FROM posts WHERE posts.id = p.id AND posts.thread = $1)
            "#,
        )
        .bind(thread_id)
        .bind(parents)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn update_message(&self, id: i64, message: &str) -> Result<Option<Post>, AppError> {
        // `message` on the right-hand side still refers to the old value.
        let sql = format!(
            r#"
            UPDATE posts
            SET message = $2,
                is_edited = is_edited OR message <> $2
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(message)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn list_by_thread(&self, thread_id: i32, query: &PostListQuery) -> Result<Vec<Post>, AppError> {
        let sql = list_sql(query.sort, query.desc);
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(thread_id)
            .bind(query.since)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_sql_orders_by_created_then_id() {
        let sql = list_sql(PostSort::Flat, false);
        assert!(sql.contains("ORDER BY created ASC, id ASC"));
    }

    #[test]
    fn test_flat_since_uses_the_ordering_key() {
        let sql = list_sql(PostSort::Flat, false);
        assert!(sql.contains("(created, id) > (SELECT created, id FROM posts WHERE id = $2)"));
        assert!(!sql.contains("OR id > $2"));

        let sql = list_sql(PostSort::Flat, true);
        assert!(sql.contains("(created, id) < (SELECT created, id FROM posts WHERE id = $2)"));
        assert!(sql.contains("ORDER BY created DESC, id DESC"));
    }

    #[test]
    fn test_tree_desc_compares_paths_downwards() {
        let sql = list_sql(PostSort::Tree, true);
        assert!(sql.contains("path < (SELECT path FROM posts WHERE id = $2)"));
        assert!(sql.contains("ORDER BY path DESC"));
    }

    #[test]
    fn test_parent_tree_desc_reverses_roots_only() {
        let sql = list_sql(PostSort::ParentTree, true);
        assert!(sql.contains("ORDER BY id DESC"));
        assert!(sql.contains("ORDER BY path[1] DESC, path ASC"));
    }
}
