//! Common Test Utilities
//!
//! In-memory service repositories and a server builder that mounts the
//! service delivery with the production middleware stack.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{Request, StatusCode},
    Router,
};
use axum_test::TestServer;
use tower::ServiceExt;

use forum_server::application::usecases::{ServiceUsecase, ServiceUsecaseImpl};
use forum_server::domain::{ServiceRepository, ServiceStatus};
use forum_server::presentation::http::handlers::service;
use forum_server::presentation::http::routes::with_middleware;
use forum_server::shared::error::AppError;

/// Counts held in memory; `clear_data` zeroes them.
#[derive(Default)]
pub struct InMemoryServiceRepository {
    status: Mutex<ServiceStatus>,
    clears: AtomicUsize,
    fail_next_clear: AtomicBool,
}

impl InMemoryServiceRepository {
    pub fn with_counts(user: i64, forum: i64, thread: i64, post: i64) -> Self {
        Self {
            status: Mutex::new(ServiceStatus {
                user,
                forum,
                thread,
                post,
            }),
            ..Default::default()
        }
    }

    /// Make the next `clear_data` fail without touching the counts.
    pub fn fail_next_clear(self) -> Self {
        self.fail_next_clear.store(true, Ordering::SeqCst);
        self
    }

    pub fn clear_calls(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn clear_data(&self) -> Result<(), AppError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_clear.swap(false, Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset while truncating".into()));
        }
        *self.status.lock().unwrap() = ServiceStatus::default();
        Ok(())
    }

    async fn select_status(&self) -> Result<ServiceStatus, AppError> {
        Ok(*self.status.lock().unwrap())
    }
}

/// A store that cannot be reached at all.
pub struct UnavailableServiceRepository;

#[async_trait]
impl ServiceRepository for UnavailableServiceRepository {
    async fn clear_data(&self) -> Result<(), AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn select_status(&self) -> Result<ServiceStatus, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Panics on the first status read, answers normally afterwards.
#[derive(Default)]
pub struct PanicOnceServiceRepository {
    panicked: AtomicBool,
}

#[async_trait]
impl ServiceRepository for PanicOnceServiceRepository {
    async fn clear_data(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn select_status(&self) -> Result<ServiceStatus, AppError> {
        if !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("status query blew up");
        }
        Ok(ServiceStatus::default())
    }
}

/// Router with only the service delivery, wrapped like production.
pub fn service_router<R>(repo: Arc<R>) -> Router
where
    R: ServiceRepository + 'static,
{
    let usecase: Arc<dyn ServiceUsecase> = Arc::new(ServiceUsecaseImpl::new(repo));
    with_middleware(Router::new().nest("/api", service::routes(usecase)))
}

pub fn test_server<R>(repo: Arc<R>) -> TestServer
where
    R: ServiceRepository + 'static,
{
    TestServer::new(service_router(repo)).unwrap()
}

/// Build a GET request with an empty body
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Drive the router with one request and collect the response
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body)
}
