//! Panic Recovery
//!
//! Turns a panicking handler into a 500 response so one bad request never
//! takes the server down.

use std::any::Any;

use axum::{http::StatusCode, response::Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::shared::error::{error_response, ErrorMessage};

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Layer catching handler panics
pub fn recover_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = panic_message(err.as_ref());
    tracing::error!(panic = %details, "Handler panicked");

    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("panic: {}", details),
        ErrorMessage::new("Internal server error"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_from_str_and_string() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[test]
    fn test_panic_response_is_500_json() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
