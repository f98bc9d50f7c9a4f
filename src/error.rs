//! Error types: reconciliation failures and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Rejection of a proposed question state. The update is aborted as a whole.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Answer must be in the choices")]
    AnswerNotInChoices,

    #[error("Answer must be in the current choices")]
    AnswerNotInCurrentChoices,

    #[error("New answer must be in the new choices")]
    AnswerNotInNewChoices,
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Proposed question state rejected (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown id, or a record owned by someone else (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed payload (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or unknown token (401)
    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
