//! Application Startup
//!
//! Composition root: opens the database pool, builds one repository per
//! domain, wires the usecases and mounts every delivery on one router.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::usecases::{
    ForumUsecaseImpl, PostUsecaseImpl, ServiceUsecaseImpl, ThreadUsecaseImpl, UserUsecaseImpl,
};
use crate::config::Settings;
use crate::infrastructure::repositories::{
    PgForumRepository, PgPostRepository, PgServiceRepository, PgThreadRepository,
    PgUserRepository,
};
use crate::infrastructure::{database, metrics};
use crate::presentation::http::routes::{self, Usecases};

/// How often the pool gauges are refreshed
const POOL_STATS_INTERVAL: Duration = Duration::from_secs(15);

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

/// Wire repositories and usecases for every domain over one pool.
///
/// Thread and post usecases read users, forums and threads through those
/// domains' repositories.
pub fn build_usecases(pool: &PgPool) -> Usecases {
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let forum_repo = Arc::new(PgForumRepository::new(pool.clone()));
    let thread_repo = Arc::new(PgThreadRepository::new(pool.clone()));
    let post_repo = Arc::new(PgPostRepository::new(pool.clone()));
    let service_repo = Arc::new(PgServiceRepository::new(pool.clone()));

    Usecases {
        service: Arc::new(ServiceUsecaseImpl::new(service_repo)),
        user: Arc::new(UserUsecaseImpl::new(user_repo.clone())),
        forum: Arc::new(ForumUsecaseImpl::new(forum_repo.clone(), user_repo.clone())),
        thread: Arc::new(ThreadUsecaseImpl::new(
            thread_repo.clone(),
            user_repo.clone(),
            forum_repo.clone(),
        )),
        post: Arc::new(PostUsecaseImpl::new(
            post_repo,
            user_repo,
            thread_repo,
            forum_repo,
        )),
    }
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Fail fast when the database is unreachable
        let db = database::create_pool(&settings.database)
            .await
            .context("failed to connect to the database")?;
        tracing::info!(
            max_open = settings.database.max_open_connections,
            max_idle = settings.database.max_idle_connections,
            "Database connection pool created"
        );

        if settings.database.run_migrations {
            database::run_migrations(&db)
                .await
                .context("failed to run database migrations")?;
            tracing::info!("Database migrations applied");
        }

        spawn_pool_stats(db.clone());

        let router = routes::create_router(build_usecases(&db));

        let addr = settings.server_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

fn spawn_pool_stats(pool: PgPool) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POOL_STATS_INTERVAL);
        loop {
            ticker.tick().await;
            if pool.is_closed() {
                break;
            }
            metrics::update_db_pool_stats(&pool);
        }
    });
}
