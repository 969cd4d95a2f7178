//! Thread Handlers
//!
//! Threads are addressed by `slug_or_id`: a numeric segment is a thread id,
//! anything else a slug.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::application::dto::{CreateThreadRequest, ForumThreadsParams, UpdateThreadRequest};
use crate::application::usecases::{ThreadError, ThreadUsecase};
use crate::domain::{Thread, Vote};
use crate::presentation::http::extractors::{JsonBody, QueryParams};
use crate::shared::error::{error_response, ErrorMessage};
use crate::shared::validation::validation_error;

/// Thread routes bound to their usecase
pub fn routes(usecase: Arc<dyn ThreadUsecase>) -> Router {
    Router::new()
        .route("/forum/{slug}/create", post(create_thread))
        .route("/forum/{slug}/threads", get(list_forum_threads))
        .route(
            "/thread/{slug_or_id}/details",
            get(get_thread).post(update_thread),
        )
        .route("/thread/{slug_or_id}/vote", post(vote))
        .with_state(usecase)
}

impl IntoResponse for ThreadError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ThreadError::UserNotFound(_) | ThreadError::ForumNotFound(_) | ThreadError::NotFound(_) => {
                error_response(StatusCode::NOT_FOUND, message.clone(), ErrorMessage::new(message))
            }
            ThreadError::AlreadyExists(existing) => {
                error_response(StatusCode::CONFLICT, message, existing)
            }
            ThreadError::InvalidVoice => {
                error_response(StatusCode::BAD_REQUEST, message.clone(), ErrorMessage::new(message))
            }
            ThreadError::Storage(e) => e.into_response(),
        }
    }
}

/// Open a thread in the forum named by the path
pub async fn create_thread(
    State(usecase): State<Arc<dyn ThreadUsecase>>,
    Path(slug): Path<String>,
    JsonBody(body): JsonBody<CreateThreadRequest>,
) -> Result<(StatusCode, Json<Thread>), Response> {
    body.validate()
        .map_err(|e| validation_error(e).into_response())?;

    let thread = usecase
        .create_thread(&slug, body.into())
        .await
        .map_err(IntoResponse::into_response)?;

    tracing::info!(id = thread.id, forum = %thread.forum, "Thread created");
    Ok((StatusCode::CREATED, Json(thread)))
}

/// Threads of a forum
pub async fn list_forum_threads(
    State(usecase): State<Arc<dyn ThreadUsecase>>,
    Path(slug): Path<String>,
    QueryParams(params): QueryParams<ForumThreadsParams>,
) -> Result<Json<Vec<Thread>>, Response> {
    params
        .validate()
        .map_err(|e| validation_error(e).into_response())?;

    let threads = usecase
        .list_forum_threads(&slug, params.into())
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(threads))
}

/// Get thread details
pub async fn get_thread(
    State(usecase): State<Arc<dyn ThreadUsecase>>,
    Path(slug_or_id): Path<String>,
) -> Result<Json<Thread>, ThreadError> {
    let thread = usecase.get_thread(&slug_or_id).await?;
    Ok(Json(thread))
}

/// Update thread title and message
pub async fn update_thread(
    State(usecase): State<Arc<dyn ThreadUsecase>>,
    Path(slug_or_id): Path<String>,
    JsonBody(body): JsonBody<UpdateThreadRequest>,
) -> Result<Json<Thread>, ThreadError> {
    let thread = usecase.update_thread(&slug_or_id, body.into()).await?;
    Ok(Json(thread))
}

/// Cast or change a vote
pub async fn vote(
    State(usecase): State<Arc<dyn ThreadUsecase>>,
    Path(slug_or_id): Path<String>,
    JsonBody(body): JsonBody<Vote>,
) -> Result<Json<Thread>, ThreadError> {
    let thread = usecase.vote(&slug_or_id, body).await?;
    Ok(Json(thread))
}
