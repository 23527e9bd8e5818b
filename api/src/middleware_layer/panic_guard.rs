use std::any::Any;

use axum::{http::StatusCode, response::Response};
use tracing::error;

use crate::core::http::error_body::ErrorBody;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Turns a handler panic into a generic 500 `INTERNAL_ERROR` body.
/// The payload is logged, never returned to the caller.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    error!(panic = %panic_message(payload.as_ref()), "handler panicked");
    ErrorBody::new("INTERNAL_ERROR", "Internal server error")
        .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
}
