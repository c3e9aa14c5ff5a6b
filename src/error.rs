// Error handling module for the BidSphere API
// Provides the shared JSON error body and router-level error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::config::ConfigError;

/// Consistent error response structure
///
/// Every failure the API returns, from the auth handlers or the router
/// itself, is serialized with this shape.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "UNAUTHORIZED")
    #[schema(example = "UNAUTHORIZED")]
    pub error_code: String,

    /// Human-readable error message
    #[schema(example = "Not authorized, token missing")]
    pub message: String,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Router-level errors that do not belong to a feature module
#[derive(Debug)]
pub enum ApiError {
    /// No route matched the request
    /// Maps to HTTP 404 Not Found
    NotFound { path: String },

    /// Unexpected failure (panics caught by the top-level layer)
    /// Maps to HTTP 500, details stay in the server log
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound { path } => {
                debug!("No route for {}", path);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("NOT_FOUND", format!("Route {} not found", path)),
                )
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "Something went wrong on the server"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures that abort startup; all of them are fatal
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}
