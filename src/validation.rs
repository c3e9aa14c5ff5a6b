// Validation utilities module
// Custom validators for request DTO fields

use validator::ValidationError;

use crate::auth::models::Role;

/// Validates that a requested role is one of the accepted values
/// Valid values: "user", "admin" (case-insensitive)
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_role"))
}

/// Validates that a text field is not only whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}
