//! Forum Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::application::dto::{CreateForumRequest, ForumUsersParams};
use crate::application::usecases::{ForumError, ForumUsecase};
use crate::domain::{Forum, User};
use crate::presentation::http::extractors::{JsonBody, QueryParams};
use crate::shared::error::{error_response, ErrorMessage};
use crate::shared::validation::validation_error;

/// Forum routes bound to their usecase
pub fn routes(usecase: Arc<dyn ForumUsecase>) -> Router {
    Router::new()
        .route("/forum/create", post(create_forum))
        .route("/forum/{slug}/details", get(get_forum))
        .route("/forum/{slug}/users", get(list_users))
        .with_state(usecase)
}

impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ForumError::UserNotFound(_) | ForumError::NotFound(_) => {
                error_response(StatusCode::NOT_FOUND, message.clone(), ErrorMessage::new(message))
            }
            ForumError::AlreadyExists(existing) => {
                error_response(StatusCode::CONFLICT, message, existing)
            }
            ForumError::Storage(e) => e.into_response(),
        }
    }
}

/// Create a forum
pub async fn create_forum(
    State(usecase): State<Arc<dyn ForumUsecase>>,
    JsonBody(body): JsonBody<CreateForumRequest>,
) -> Result<(StatusCode, Json<Forum>), Response> {
    body.validate()
        .map_err(|e| validation_error(e).into_response())?;

    let forum = usecase
        .create_forum(body.into())
        .await
        .map_err(IntoResponse::into_response)?;

    tracing::info!(slug = %forum.slug, owner = %forum.user, "Forum created");
    Ok((StatusCode::CREATED, Json(forum)))
}

/// Get forum details
pub async fn get_forum(
    State(usecase): State<Arc<dyn ForumUsecase>>,
    Path(slug): Path<String>,
) -> Result<Json<Forum>, ForumError> {
    let forum = usecase.get_forum(&slug).await?;
    Ok(Json(forum))
}

/// Users who posted or opened threads in the forum
pub async fn list_users(
    State(usecase): State<Arc<dyn ForumUsecase>>,
    Path(slug): Path<String>,
    QueryParams(params): QueryParams<ForumUsersParams>,
) -> Result<Json<Vec<User>>, Response> {
    params
        .validate()
        .map_err(|e| validation_error(e).into_response())?;

    let users = usecase
        .list_users(&slug, params.into())
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(users))
}
