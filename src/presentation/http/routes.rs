//! Route Configuration
//!
//! Composes every domain delivery into the single router the server runs.

use std::sync::Arc;

use axum::{middleware, response::IntoResponse, routing::get, Router};

use super::handlers;
use crate::application::usecases::{
    ForumUsecase, PostUsecase, ServiceUsecase, ThreadUsecase, UserUsecase,
};
use crate::infrastructure::metrics;
use crate::presentation::middleware::{create_trace_layer, log_request, recover_layer};

/// The usecases each delivery is bound to
#[derive(Clone)]
pub struct Usecases {
    pub service: Arc<dyn ServiceUsecase>,
    pub user: Arc<dyn UserUsecase>,
    pub forum: Arc<dyn ForumUsecase>,
    pub thread: Arc<dyn ThreadUsecase>,
    pub post: Arc<dyn PostUsecase>,
}

/// Create the main API router
pub fn create_router(usecases: Usecases) -> Router {
    let api = Router::new()
        .merge(handlers::service::routes(usecases.service))
        .merge(handlers::user::routes(usecases.user))
        .merge(handlers::forum::routes(usecases.forum))
        .merge(handlers::thread::routes(usecases.thread))
        .merge(handlers::post::routes(usecases.post));

    let router = Router::new()
        .nest("/api", api)
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler));

    with_middleware(router)
}

/// Wrap a router with panic recovery, request logging and tracing.
///
/// Recovery sits innermost so the request logger records the 500 it produces.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(recover_layer())
        .layer(middleware::from_fn(log_request))
        .layer(create_trace_layer())
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}
