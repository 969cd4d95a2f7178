//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - Users and forum participants
//! - **PgForumRepository** - Forums
//! - **PgThreadRepository** - Threads and votes
//! - **PgPostRepository** - Posts and their tree orderings
//! - **PgServiceRepository** - Status counts and full data reset
//!
//! All repositories share one `PgPool`:
//!
//! ```rust,ignore
//! let user_repo = PgUserRepository::new(pool.clone());
//! let forum_repo = PgForumRepository::new(pool.clone());
//! ```

pub mod forum_repository;
pub mod post_repository;
pub mod service_repository;
pub mod thread_repository;
pub mod user_repository;

pub use forum_repository::PgForumRepository;
pub use post_repository::PgPostRepository;
pub use service_repository::PgServiceRepository;
pub use thread_repository::PgThreadRepository;
pub use user_repository::PgUserRepository;

use crate::shared::error::AppError;

/// Map constraint violations on writes: unique → `Conflict`, foreign key → `NotFound`.
pub(crate) fn map_write_error(e: sqlx::Error, conflict_message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(conflict_message.to_string())
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::NotFound(db_err.message().to_string())
        }
        _ => AppError::Database(e),
    }
}
