//! Error handling module
//!
//! Defines error types and handling logic used in the project

use crate::models::comparison::SelectionError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of one backend call, decoded once at the HTTP boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Health probe did not return 200
    #[error("Backend health check failed")]
    HealthCheckFailed,

    /// Backend answered with a non-success status (other than 429)
    #[error("Backend returned status {0}")]
    ServerError(u16),

    /// Backend answered 429
    #[error("Backend rate limit exceeded")]
    RateLimited,

    /// Request exceeded its timeout
    #[error("Backend request timed out")]
    Timeout,

    /// Request was sent but no response came back
    #[error("Could not reach backend")]
    ConnectionFailed,

    /// Anything else
    #[error("Unexpected backend error: {0}")]
    UnknownError(String),
}

impl QueryError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => QueryError::RateLimited,
            other => QueryError::ServerError(other),
        }
    }

    /// Classify a transport-level reqwest failure
    ///
    /// Errors that carry a status go through [`QueryError::from_status`].
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16());
        }
        if err.is_timeout() {
            QueryError::Timeout
        } else if err.is_connect() || err.is_request() {
            QueryError::ConnectionFailed
        } else {
            QueryError::UnknownError(err.to_string())
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::HealthCheckFailed => "health_check_failed",
            QueryError::ServerError(_) => "server_error",
            QueryError::RateLimited => "rate_limited",
            QueryError::Timeout => "timeout",
            QueryError::ConnectionFailed => "connection_failed",
            QueryError::UnknownError(_) => "unknown_error",
        }
    }

    /// Human-readable message shown in place of the model's answer
    pub fn user_message(&self, model: &str) -> String {
        match self {
            QueryError::HealthCheckFailed => {
                "Backend server unavailable. Check that the service is running.".to_string()
            }
            QueryError::ServerError(status) if (500..600).contains(status) => format!(
                "{} is having trouble right now (server error {}). Give it a couple of minutes and try again.",
                model, status
            ),
            QueryError::ServerError(status) => {
                format!("{} answered with unexpected status code {}.", model, status)
            }
            QueryError::RateLimited => format!(
                "{} is receiving too many requests. Slow down a little and try again.",
                model
            ),
            QueryError::Timeout => format!("{} took too long to answer. Try again in a moment.", model),
            QueryError::ConnectionFailed => {
                "Lost contact with the server. Check your connection and try again.".to_string()
            }
            QueryError::UnknownError(message) => {
                format!("Something unexpected happened with {} ({}).", model, message)
            }
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request validation failed
    #[error("Request validation failed: {0}")]
    Validation(String),

    /// Model selection rejected
    #[error("Invalid model selection: {0}")]
    Selection(#[from] SelectionError),

    /// Backend call failed
    #[error("Backend error: {0}")]
    Backend(#[from] QueryError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Route not found
    #[error("Route not found: {0}")]
    NotFound(String),

    /// Request body over the size cap
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error title
    pub error: String,
    /// Error message
    pub message: String,
    /// Error kind (for backend errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Selection(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Backend(err) => match err {
                QueryError::HealthCheckFailed => StatusCode::SERVICE_UNAVAILABLE,
                QueryError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                QueryError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                QueryError::ServerError(_) | QueryError::ConnectionFailed => StatusCode::BAD_GATEWAY,
                QueryError::UnknownError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Config(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error title string
    pub fn error_title(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::Selection(_) => "Invalid request",
            AppError::NotFound(_) => "Route not found",
            AppError::PayloadTooLarge(_) => "Payload too large",
            AppError::Backend(_) => "Backend error",
            AppError::Config(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                "Internal server error"
            }
        }
    }

    /// Whether the error is the caller's fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to response body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_title().to_string(),
            message: self.to_string(),
            kind: match self {
                AppError::Backend(err) => Some(err.kind().to_string()),
                _ => None,
            },
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_client_error() {
            tracing::warn!("Client error: {} - Status code: {}", self, status);
        } else {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add validation error context
    fn validation_context(self, message: &str) -> AppResult<T>;

    /// Add internal error context
    fn internal_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn validation_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Validation(format!("{}: {}", message, e)))
    }

    fn internal_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Internal(format!("{}: {}", message, e)))
    }
}

/// Unwrap a JSON request body
///
/// Oversized bodies keep their 413; every other rejection is a validation error.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>, message: &str) -> AppResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(AppError::PayloadTooLarge(rejection.body_text()))
        }
        Err(rejection) => Err(rejection).validation_context(message),
    }
}
