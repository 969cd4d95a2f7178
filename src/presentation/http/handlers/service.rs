//! Service Handlers
//!
//! Maintenance endpoints over the whole data set.
//!
//! # Endpoints
//! - `POST /service/clear` - Remove every user, forum, thread, post and vote
//! - `GET /service/status` - Row counts per entity

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};

use crate::application::usecases::ServiceUsecase;
use crate::domain::ServiceStatus;
use crate::shared::error::AppError;

/// Service routes bound to their usecase
pub fn routes(usecase: Arc<dyn ServiceUsecase>) -> Router {
    Router::new()
        .route("/service/clear", post(clear_data))
        .route("/service/status", get(select_status))
        .with_state(usecase)
}

/// Wipe all forum data
pub async fn clear_data(
    State(usecase): State<Arc<dyn ServiceUsecase>>,
) -> Result<StatusCode, AppError> {
    usecase.clear_data().await?;
    tracing::info!("All forum data cleared");
    Ok(StatusCode::OK)
}

/// Current entity counts
pub async fn select_status(
    State(usecase): State<Arc<dyn ServiceUsecase>>,
) -> Result<Json<ServiceStatus>, AppError> {
    let status = usecase.select_status().await?;
    Ok(Json(status))
}
