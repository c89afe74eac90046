//! Request failures and their HTTP responses.
//!
//! Validation failures are not errors here: handlers answer them with a
//! 422 and the re-rendered form. What reaches `AppError` ends the request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use todo_core::TodoError;

#[derive(Debug, Error)]
pub enum AppError {
    /// An id in the path did not parse or did not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// The session middleware did not run for this route.
    #[error("no session attached to request")]
    MissingSession,

    #[error("session storage failed: {0}")]
    Storage(TodoError),
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        if err.is_not_found() {
            AppError::NotFound(err.to_string())
        } else {
            AppError::Storage(err)
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingSession | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            AppError::NotFound(detail) => {
                tracing::debug!(%detail, "resource not found");
                "Not Found"
            }
            other => {
                tracing::error!(error = %other, "request failed");
                "Internal Server Error"
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
