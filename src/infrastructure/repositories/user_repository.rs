//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.
//! Maps between the database schema and domain User entity.

use async_trait::async_trait;
use sqlx::PgPool;

use super::map_write_error;
use crate::domain::{ForumUsersQuery, User, UserRepository, UserUpdate};
use crate::shared::error::AppError;

/// Database row representation of the users table.
/// CITEXT columns are selected as TEXT.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    nickname: String,
    fullname: String,
    about: String,
    email: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            nickname: self.nickname,
            fullname: self.fullname,
            about: self.about,
            email: self.email,
        }
    }
}

const USER_COLUMNS: &str = "nickname::text AS nickname, fullname, about, email::text AS email";

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (nickname, fullname, about, email) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.nickname)
            .bind(&user.fullname)
            .bind(&user.about)
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "User with this nickname or email already exists"))?;

        Ok(row.into_user())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE nickname = $1::citext", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(nickname)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_nicknames(&self, nicknames: &[String]) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE nickname = ANY($1::citext[])",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(nicknames)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn find_conflicting(&self, nickname: &str, email: &str) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE nickname = $1::citext OR email = $2::citext",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(nickname)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn update(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET fullname = COALESCE($2, fullname),
                about = COALESCE($3, about),
                email = COALESCE($4, email)
            WHERE nickname = $1::citext
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(nickname)
            .bind(&update.fullname)
            .bind(&update.about)
            .bind(&update.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Email is already used by another user"))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn list_by_forum(
        &self,
        forum_slug: &str,
        query: &ForumUsersQuery,
    ) -> Result<Vec<User>, AppError> {
        // Byte-wise ordering on the lower-cased nickname.
        let (cmp, order) = if query.desc { ("<", "DESC") } else { (">", "ASC") };
        let sql = format!(
            r#"
            SELECT u.nickname::text AS nickname, u.fullname, u.about, u.email::text AS email
            FROM forum_users fu
            JOIN users u ON u.nickname = fu.nickname
            WHERE fu.forum = $1::citext
              AND ($2::text IS NULL OR lower(fu.nickname::text) COLLATE "C" {cmp} lower($2) COLLATE "C")
            ORDER BY lower(fu.nickname::text) COLLATE "C" {order}
            LIMIT $3
            "#,
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(forum_slug)
            .bind(&query.since)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }
}
