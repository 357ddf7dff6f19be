//! Application error types and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type.
///
/// Every variant maps to the uniform `{"error": "..."}` JSON envelope;
/// nothing here is allowed to reach the transport layer uncaught.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed required fields in a request
    #[error("{0}")]
    Validation(String),

    /// Unmatched route or missing resource
    #[error("{0}")]
    NotFound(String),

    /// Matched route, wrong HTTP verb
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Credential check rejected by the auth provider
    #[error("{0}")]
    Unauthorized(String),

    /// Appointment slot already taken
    #[error("{0}")]
    Conflict(String),

    /// The external database/auth service returned an error
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The external service was unreachable
    #[error("upstream request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_)
            | AppError::HttpClient(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
