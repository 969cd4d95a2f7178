//! Database Module
//!
//! PostgreSQL connection pool and migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseSettings;

/// Pool limits taken from settings.
///
/// sqlx has no idle ceiling, only a floor. `max_idle_connections` becomes
/// `min_connections`, so that many connections always stay open, and extra
/// connections close once they have been idle for `idle_timeout`. Right after
/// a burst, up to `max_open_connections` can sit idle until that timeout
/// elapses, so the idle limit only holds after `idle_timeout`.
pub fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_open_connections)
        .min_connections(settings.max_idle_connections)
        .idle_timeout(Duration::from_secs(settings.idle_timeout))
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
}

/// Create the shared PostgreSQL connection pool.
///
/// Connects eagerly so an unreachable database fails here. Once all
/// `max_open_connections` are busy, callers queue for up to `acquire_timeout`.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    pool_options(settings).connect(&settings.url).await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
