//! Mapping failures to HTTP responses.
//!
//! - Unmatched route: fixed 404 body, never logged as an application error
//! - Handler resolution failure: 500; full detail only in development mode
//! - Handler errors: 400 / 404 / 409 with the handler's message

use std::backtrace::Backtrace;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::AppMode;
use crate::dispatch::HandlerResolutionError;
use crate::store::StoreError;

/// Errors a handler reports back to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Invalid(msg) => Self::BadRequest(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_body(self.status(), &self.to_string())
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "status": status.as_u16(),
                "message": message,
            }
        })),
    )
        .into_response()
}

/// The fixed not-found response.
pub fn not_found() -> Response {
    error_body(StatusCode::NOT_FOUND, "Page not found")
}

/// Report a misconfigured route.
///
/// Always logged at error level. Development responses carry the message and
/// a backtrace; production responses carry nothing beyond the status.
pub fn resolution_failure(
    err: &HandlerResolutionError,
    mode: AppMode,
    request_id: &str,
) -> Response {
    tracing::error!(
        request_id = %request_id,
        error = %err,
        "Route handler could not be resolved"
    );

    match mode {
        AppMode::Development => {
            let trace = Backtrace::force_capture().to_string();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": {
                        "status": 500,
                        "message": err.to_string(),
                        "kind": "handler_resolution",
                        "request_id": request_id,
                        "backtrace": trace.lines().collect::<Vec<_>>(),
                    }
                })),
            )
                .into_response()
        }
        AppMode::Production => error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    }
}
