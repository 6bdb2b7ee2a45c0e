//! HTTP error mapping.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use confbot_ai::SessionError;
use tracing::error;

/// Body of every 500 response.
pub const INTERNAL_ERROR_BODY: &str = "An error occurred while processing your request.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("session not found")]
    NotFound,
    #[error("Session is busy with another request")]
    Busy,
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Busy => (StatusCode::CONFLICT, self.to_string()).into_response(),
            ApiError::Internal(message) => {
                error!(error = %message, "Request failed");
                internal_error()
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Busy => ApiError::Busy,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");
    internal_error()
}
