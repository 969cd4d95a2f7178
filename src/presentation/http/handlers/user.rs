//! User Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::application::dto::{CreateUserRequest, UpdateUserRequest};
use crate::application::usecases::{UserError, UserUsecase};
use crate::domain::User;
use crate::presentation::http::extractors::JsonBody;
use crate::shared::error::{error_response, ErrorMessage};
use crate::shared::validation::validation_error;

/// User routes bound to their usecase
pub fn routes(usecase: Arc<dyn UserUsecase>) -> Router {
    Router::new()
        .route("/user/{nickname}/create", post(create_user))
        .route("/user/{nickname}/profile", get(get_profile).post(update_profile))
        .with_state(usecase)
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            UserError::NotFound(_) => {
                error_response(StatusCode::NOT_FOUND, message.clone(), ErrorMessage::new(message))
            }
            UserError::AlreadyExists(existing) => {
                error_response(StatusCode::CONFLICT, message, existing)
            }
            UserError::EmailTaken(_) => {
                error_response(StatusCode::CONFLICT, message.clone(), ErrorMessage::new(message))
            }
            UserError::Storage(e) => e.into_response(),
        }
    }
}

/// Register a user under the nickname in the path
pub async fn create_user(
    State(usecase): State<Arc<dyn UserUsecase>>,
    Path(nickname): Path<String>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), Response> {
    body.validate()
        .map_err(|e| validation_error(e).into_response())?;

    let user = usecase
        .create_user(body.into_user(nickname))
        .await
        .map_err(IntoResponse::into_response)?;

    tracing::info!(nickname = %user.nickname, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user profile
pub async fn get_profile(
    State(usecase): State<Arc<dyn UserUsecase>>,
    Path(nickname): Path<String>,
) -> Result<Json<User>, UserError> {
    let user = usecase.get_profile(&nickname).await?;
    Ok(Json(user))
}

/// Update a user profile; empty fields keep their stored value
pub async fn update_profile(
    State(usecase): State<Arc<dyn UserUsecase>>,
    Path(nickname): Path<String>,
    JsonBody(body): JsonBody<UpdateUserRequest>,
) -> Result<Json<User>, Response> {
    let body = body.without_empty_fields();
    body.validate()
        .map_err(|e| validation_error(e).into_response())?;

    let user = usecase
        .update_profile(&nickname, body.into())
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(user))
}
