use axum::{
    Json,
    extract::rejection::{BytesRejection, FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RepliesError {
    /// A required request parameter is absent or blank.
    #[error("param is missing or the value is empty: {0}")]
    MissingParam(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Access denied or route hidden. Rendered exactly like an unknown route.
    #[error("Not found")]
    NotFound,

    #[error("Reply not found: {0}")]
    ReplyNotFound(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl From<FormRejection> for RepliesError {
    fn from(rejection: FormRejection) -> Self {
        RepliesError::InvalidRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for RepliesError {
    fn from(rejection: BytesRejection) -> Self {
        RepliesError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for RepliesError {
    fn into_response(self) -> Response {
        let (status, error_body) = match self {
            RepliesError::NotFound => return StatusCode::NOT_FOUND.into_response(),

            RepliesError::MissingParam(name) => (
                StatusCode::BAD_REQUEST,
                ApiErrorObject {
                    code: "PARAM_MISSING".to_string(),
                    message: format!("param is missing or the value is empty: {name}"),
                },
            ),

            RepliesError::InvalidRequest(message) => {
                tracing::warn!(message = %message, "Request rejected");
                (
                    StatusCode::BAD_REQUEST,
                    ApiErrorObject {
                        code: "INVALID_REQUEST".to_string(),
                        message: "invalid request".to_string(),
                    },
                )
            }

            RepliesError::ReplyNotFound(id) => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "NOT_FOUND".to_string(),
                    message: format!("reply {id} not found"),
                },
            ),

            err @ (RepliesError::JsonError(_)
            | RepliesError::DatabaseError(_)
            | RepliesError::RactorError(_)
            | RepliesError::Config(_)
            | RepliesError::UnexpectedError(_)) => {
                tracing::error!(error = %err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorObject {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Debug, Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
