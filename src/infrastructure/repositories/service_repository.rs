//! Service Repository Implementation
//!
//! PostgreSQL implementation of the maintenance operations.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{ServiceRepository, ServiceStatus};
use crate::shared::error::AppError;

/// Every domain table, children first.
pub const DOMAIN_TABLES: [&str; 6] = ["votes", "forum_users", "posts", "threads", "forums", "users"];

#[derive(Debug, sqlx::FromRow)]
struct StatusRow {
    users: i64,
    forums: i64,
    threads: i64,
    posts: i64,
}

/// PostgreSQL service repository implementation.
#[derive(Clone)]
pub struct PgServiceRepository {
    pool: PgPool,
}

impl PgServiceRepository {
    /// Create a new PgServiceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn truncate_sql() -> String {
    format!(
        "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
        DOMAIN_TABLES.join(", ")
    )
}

#[async_trait]
impl ServiceRepository for PgServiceRepository {
    async fn clear_data(&self) -> Result<(), AppError> {
        sqlx::query(&truncate_sql()).execute(&self.pool).await?;
        Ok(())
    }

    async fn select_status(&self) -> Result<ServiceStatus, AppError> {
        // A single statement reads all four counts from one snapshot.
        let row = sqlx::query_as::<_, StatusRow>(
            r#"
            SELECT (SELECT COUNT(*) FROM users)   AS users,
                   (SELECT COUNT(*) FROM forums)  AS forums,
                   (SELECT COUNT(*) FROM threads) AS threads,
                   (SELECT COUNT(*) FROM posts)   AS posts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ServiceStatus {
            user: row.users,
            forum: row.forums,
            thread: row.threads,
            post: row.posts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_covers_every_domain_table() {
        let sql = truncate_sql();
        for table in DOMAIN_TABLES {
            assert!(sql.contains(table), "{table} missing from {sql}");
        }
        assert!(sql.ends_with("RESTART IDENTITY CASCADE"));
    }
}
