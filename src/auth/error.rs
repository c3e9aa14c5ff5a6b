// Authentication and authorization error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::models::Role;
use crate::error::ErrorResponse;

/// Message shared by every failed login, whatever the cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    // Request errors
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("User already exists")]
    EmailAlreadyExists,
    /// Unknown identity and wrong secret are deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // Authentication errors
    #[error("Missing session token")]
    MissingToken,
    /// Bad signature, malformed payload and expiry all land here
    #[error("Invalid session token")]
    InvalidToken,
    /// Token was valid but the user it names no longer exists
    #[error("Session user no longer exists")]
    UnknownUser,
    /// A protected step ran without an authenticated context
    #[error("Not authenticated")]
    NotAuthenticated,

    // Authorization errors
    /// User lacks required permissions for the operation
    #[error("Insufficient permissions: allowed {allowed:?}, user has role '{actual}'")]
    InsufficientPermissions { allowed: Vec<Role>, actual: Role },

    // Server errors
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Password hashing error: {0}")]
    PasswordHashError(String),
    #[error("Token generation error: {0}")]
    TokenGenerationError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::ValidationError(msg) => debug!("Rejected auth request: {}", msg),
            AuthError::InvalidRole(msg) => warn!("Invalid role encountered: {}", msg),
            AuthError::InvalidCredentials => debug!("Login rejected"),
            AuthError::EmailAlreadyExists => warn!("Registration for existing identity"),
            AuthError::MissingToken => debug!("Missing session token in request"),
            AuthError::InvalidToken => warn!("Invalid session token attempt"),
            AuthError::UnknownUser => warn!("Session token for a user that no longer exists"),
            AuthError::NotAuthenticated => warn!("Protected resource reached without authentication"),
            AuthError::InsufficientPermissions { allowed, actual } => {
                warn!("Authorization failed: allowed roles {:?}, user has role '{}'", allowed, actual)
            }
            AuthError::DatabaseError(msg) => error!("Database error in auth: {}", msg),
            AuthError::PasswordHashError(msg) => error!("Password hashing error: {}", msg),
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
        }

        let body = ErrorResponse::new(self.error_code(), self.error_message());
        (self.status_code(), Json(body)).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidRole(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::UnknownUser => StatusCode::UNAUTHORIZED,
            AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code placed in the error body
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::ValidationError(_) | AuthError::InvalidRole(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::EmailAlreadyExists => "CONFLICT",
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::UnknownUser
            | AuthError::NotAuthenticated => "UNAUTHORIZED",
            AuthError::InsufficientPermissions { .. } => "FORBIDDEN",
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_) => "INTERNAL_ERROR",
        }
    }

    /// Get a descriptive error message for this error
    /// This message is safe to send to clients (no sensitive data)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::InvalidRole(msg) => format!("Invalid role: {}", msg),
            AuthError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AuthError::EmailAlreadyExists => "User already exists".to_string(),
            AuthError::MissingToken => "Not authorized, token missing".to_string(),
            AuthError::InvalidToken => "Not authorized, token invalid".to_string(),
            AuthError::UnknownUser | AuthError::NotAuthenticated => "Not authorized".to_string(),
            AuthError::InsufficientPermissions { .. } => "Access denied".to_string(),
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        AuthError::ValidationError(format!("Missing or invalid fields: {}", fields.join(", ")))
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::ValidationError(rejection.body_text())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(error: sqlx::Error) -> Self {
        AuthError::DatabaseError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(AuthError::ValidationError("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::EmailAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UnknownUser.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InsufficientPermissions { allowed: vec![Role::Admin], actual: Role::User }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::DatabaseError("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AuthError::DatabaseError("connection refused at 10.0.0.3".into());
        assert_eq!(err.error_message(), "Internal server error");
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_unauthorized_messages_distinguish_cause() {
        assert_eq!(AuthError::MissingToken.error_message(), "Not authorized, token missing");
        assert_eq!(AuthError::InvalidToken.error_message(), "Not authorized, token invalid");
        assert_eq!(AuthError::UnknownUser.error_message(), "Not authorized");
    }

    #[test]
    fn test_forbidden_message_does_not_leak_roles() {
        let err = AuthError::InsufficientPermissions { allowed: vec![Role::Admin], actual: Role::User };
        assert_eq!(err.error_message(), "Access denied");
    }
}
