//! Post Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::application::dto::{PostDetailsParams, ThreadPostsParams, UpdatePostRequest};
use crate::application::usecases::{PostError, PostUsecase};
use crate::domain::{NewPost, Post, PostFull, PostListQuery, PostRelated};
use crate::presentation::http::extractors::{JsonBody, QueryParams};
use crate::shared::error::{error_response, AppError, ErrorMessage};
use crate::shared::validation::validation_error;

/// Post routes bound to their usecase
pub fn routes(usecase: Arc<dyn PostUsecase>) -> Router {
    Router::new()
        .route("/thread/{slug_or_id}/create", post(create_posts))
        .route("/thread/{slug_or_id}/posts", get(list_thread_posts))
        .route("/post/{id}/details", get(get_post).post(update_post))
        .with_state(usecase)
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            PostError::ThreadNotFound(_) | PostError::AuthorNotFound(_) | PostError::NotFound(_) => {
                error_response(StatusCode::NOT_FOUND, message.clone(), ErrorMessage::new(message))
            }
            PostError::ParentConflict => {
                error_response(StatusCode::CONFLICT, message.clone(), ErrorMessage::new(message))
            }
            PostError::Storage(e) => e.into_response(),
        }
    }
}

fn parse_post_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Can't find post with id: {}", raw)))
}

/// Add a batch of posts to a thread
pub async fn create_posts(
    State(usecase): State<Arc<dyn PostUsecase>>,
    Path(slug_or_id): Path<String>,
    JsonBody(body): JsonBody<Vec<NewPost>>,
) -> Result<(StatusCode, Json<Vec<Post>>), PostError> {
    let count = body.len();
    let posts = usecase.create_posts(&slug_or_id, body).await?;

    tracing::debug!(thread = %slug_or_id, count, "Posts created");
    Ok((StatusCode::CREATED, Json(posts)))
}

/// Posts of a thread in flat, tree or parent_tree order
pub async fn list_thread_posts(
    State(usecase): State<Arc<dyn PostUsecase>>,
    Path(slug_or_id): Path<String>,
    QueryParams(params): QueryParams<ThreadPostsParams>,
) -> Result<Json<Vec<Post>>, Response> {
    params
        .validate()
        .map_err(|e| validation_error(e).into_response())?;
    let query = PostListQuery::try_from(params).map_err(IntoResponse::into_response)?;

    let posts = usecase
        .list_thread_posts(&slug_or_id, query)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(posts))
}

/// Get a post, optionally with its author, thread and forum
pub async fn get_post(
    State(usecase): State<Arc<dyn PostUsecase>>,
    Path(id): Path<String>,
    QueryParams(params): QueryParams<PostDetailsParams>,
) -> Result<Json<PostFull>, Response> {
    let id = parse_post_id(&id).map_err(IntoResponse::into_response)?;

    let full = usecase
        .get_post(id, PostRelated::parse(&params.related))
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(full))
}

/// Edit a post message
pub async fn update_post(
    State(usecase): State<Arc<dyn PostUsecase>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdatePostRequest>,
) -> Result<Json<Post>, Response> {
    let id = parse_post_id(&id).map_err(IntoResponse::into_response)?;

    let post = usecase
        .update_post(id, body.message)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_id() {
        assert_eq!(parse_post_id("42").unwrap(), 42);
        assert!(matches!(parse_post_id("abc"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_parent_conflict_maps_to_409() {
        let response = PostError::ParentConflict.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_storage_error_keeps_app_error_status() {
        let response = PostError::Storage(AppError::Internal("boom".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
