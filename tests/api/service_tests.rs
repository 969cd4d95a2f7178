//! Service API Tests
//!
//! Status and clear endpoints against in-memory repositories.

use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use forum_server::domain::ServiceStatus;
use forum_server::shared::error::ErrorMessage;

use crate::common::{
    get, send, service_router, test_server, InMemoryServiceRepository, UnavailableServiceRepository,
};

#[tokio::test]
async fn test_status_reports_counts_as_json() {
    // 5 users, 3 forums, 10 threads, 40 posts
    let repo = Arc::new(InMemoryServiceRepository::with_counts(5, 3, 10, 40));
    let server = test_server(repo);

    let response = server.get("/api/service/status").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "user": 5, "forum": 3, "thread": 10, "post": 40 }));
}

#[tokio::test]
async fn test_status_twice_without_writes_is_identical() {
    let repo = Arc::new(InMemoryServiceRepository::with_counts(5, 3, 10, 40));
    let server = test_server(repo.clone());

    let first: ServiceStatus = server.get("/api/service/status").await.json();
    let second: ServiceStatus = server.get("/api/service/status").await.json();

    assert_eq!(first, second);
    assert_eq!(first, ServiceStatus { user: 5, forum: 3, thread: 10, post: 40 });
    assert_eq!(repo.clear_calls(), 0);
}

#[tokio::test]
async fn test_status_through_router_oneshot() {
    let repo = Arc::new(InMemoryServiceRepository::with_counts(5, 3, 10, 40));

    let (status, body) = send(service_router(repo), get("/api/service/status")).await;

    assert_eq!(status, StatusCode::OK);
    let snapshot: ServiceStatus = serde_json::from_slice(&body).unwrap();
    assert_eq!(snapshot, ServiceStatus { user: 5, forum: 3, thread: 10, post: 40 });
}

#[tokio::test]
async fn test_clear_then_status_is_all_zero() {
    let repo = Arc::new(InMemoryServiceRepository::with_counts(5, 3, 10, 40));
    let server = test_server(repo.clone());

    server.post("/api/service/clear").await.assert_status_ok();

    let status: ServiceStatus = server.get("/api/service/status").await.json();
    assert!(status.is_empty());
    assert_eq!(repo.clear_calls(), 1);
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let repo = Arc::new(InMemoryServiceRepository::default());
    let server = test_server(repo.clone());

    server.post("/api/service/clear").await.assert_status_ok();
    server.post("/api/service/clear").await.assert_status_ok();

    let status: ServiceStatus = server.get("/api/service/status").await.json();
    assert_eq!(status, ServiceStatus::default());
    assert_eq!(repo.clear_calls(), 2);
}

#[tokio::test]
async fn test_status_storage_failure_is_500_with_message() {
    let server = test_server(Arc::new(UnavailableServiceRepository));

    let response = server.get("/api/service/status").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorMessage = response.json();
    assert!(!body.message.is_empty());
}

#[tokio::test]
async fn test_failed_clear_leaves_data_and_next_clear_succeeds() {
    let repo = Arc::new(InMemoryServiceRepository::with_counts(1, 1, 1, 1).fail_next_clear());
    let server = test_server(repo.clone());

    server
        .post("/api/service/clear")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let status: ServiceStatus = server.get("/api/service/status").await.json();
    assert_eq!(status, ServiceStatus { user: 1, forum: 1, thread: 1, post: 1 });

    server.post("/api/service/clear").await.assert_status_ok();
    let status: ServiceStatus = server.get("/api/service/status").await.json();
    assert!(status.is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = test_server(Arc::new(InMemoryServiceRepository::default()));

    server
        .get("/api/service/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
