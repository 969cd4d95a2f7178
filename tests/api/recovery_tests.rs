//! Panic Recovery Tests

use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use forum_server::shared::error::ErrorMessage;

use crate::common::{test_server, PanicOnceServiceRepository};

#[tokio::test]
async fn test_panicking_handler_returns_500_and_server_keeps_serving() {
    let server = test_server(Arc::new(PanicOnceServiceRepository::default()));

    let response = server.get("/api/service/status").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorMessage = response.json();
    assert_eq!(body, ErrorMessage::new("Internal server error"));

    server.get("/api/service/status").await.assert_status_ok();
}
