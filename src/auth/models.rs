// Authentication data models and DTOs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::error::AuthError;

/// Account role used by the authorization gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = AuthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response model (excludes password_hash)
///
/// Also the shape of the authenticated request context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Insert payload for the credential store; the secret is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Registration request DTO
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(required, custom = "crate::validation::validate_not_blank")]
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[validate(required, email)]
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    #[schema(example = "correct horse battery staple")]
    pub password: Option<String>,
    #[validate(custom = "crate::validation::validate_role")]
    #[schema(example = "user")]
    pub role: Option<String>,
    #[serde(default, alias = "remember_me")]
    pub remember_me: Option<bool>,
}

/// Login request DTO
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
    #[serde(default, alias = "remember_me")]
    pub remember_me: Option<bool>,
}

/// A registration that passed validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub remember_me: bool,
}

/// Login credentials that passed validation
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// Identities are compared case-insensitively and without surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl RegisterRequest {
    pub fn into_registration(self) -> Result<Registration, AuthError> {
        self.validate()?;

        let role = match self.role.as_deref() {
            Some(role) => role.parse()?,
            None => Role::default(),
        };

        match (self.name, self.email, self.password) {
            (Some(name), Some(email), Some(password)) => Ok(Registration {
                name: name.trim().to_string(),
                email: normalize_email(&email),
                password,
                role,
                remember_me: self.remember_me.unwrap_or(false),
            }),
            _ => Err(AuthError::ValidationError(
                "Provide name, email, password".to_string(),
            )),
        }
    }
}

impl LoginRequest {
    pub fn into_credentials(self) -> Result<Credentials, AuthError> {
        self.validate()?;

        match (self.email, self.password) {
            (Some(email), Some(password)) => Ok(Credentials {
                email: normalize_email(&email),
                password,
                remember_me: self.remember_me.unwrap_or(false),
            }),
            _ => Err(AuthError::ValidationError(
                "Provide email and password".to_string(),
            )),
        }
    }
}

/// Authentication response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_role_round_trips_through_strings() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" User ".parse::<Role>().unwrap(), Role::User);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!(matches!("root".parse::<Role>(), Err(AuthError::InvalidRole(_))));
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_user_response_has_no_secret() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let body = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(body.get("password_hash").is_none());
        assert!(body.get("password").is_none());
        assert_eq!(body["role"], "user");
    }

    #[test]
    fn test_registration_normalizes_and_defaults() {
        let registration = register_request(" Ada ", "Ada@Example.COM", "pw")
            .into_registration()
            .unwrap();
        assert_eq!(registration.name, "Ada");
        assert_eq!(registration.email, "ada@example.com");
        assert_eq!(registration.role, Role::User);
        assert!(!registration.remember_me);
    }

    #[test]
    fn test_registration_accepts_explicit_role() {
        let mut request = register_request("Root", "root@example.com", "pw");
        request.role = Some("admin".to_string());
        request.remember_me = Some(true);
        let registration = request.into_registration().unwrap();
        assert_eq!(registration.role, Role::Admin);
        assert!(registration.remember_me);
    }

    #[test]
    fn test_registration_missing_fields_rejected() {
        let request = RegisterRequest {
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        match request.into_registration() {
            Err(AuthError::ValidationError(msg)) => {
                assert!(msg.contains("name"));
                assert!(msg.contains("password"));
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_registration_rejects_bad_email_and_role() {
        assert!(register_request("Ada", "not-an-email", "pw").into_registration().is_err());

        let mut request = register_request("Ada", "ada@example.com", "pw");
        request.role = Some("owner".to_string());
        assert!(matches!(request.into_registration(), Err(AuthError::ValidationError(_))));
    }

    #[test]
    fn test_registration_rejects_blank_name() {
        let result = register_request("   ", "ada@example.com", "pw").into_registration();
        assert!(matches!(result, Err(AuthError::ValidationError(_))));
    }

    #[test]
    fn test_login_request_accepts_camel_case_flag() {
        let request: LoginRequest = serde_json::from_str(
            r#"{"email":"ADA@example.com","password":"pw","rememberMe":true}"#,
        )
        .unwrap();
        let credentials = request.into_credentials().unwrap();
        assert_eq!(credentials.email, "ada@example.com");
        assert!(credentials.remember_me);
    }

    #[test]
    fn test_login_request_empty_password_rejected() {
        let request = LoginRequest {
            email: Some("ada@example.com".to_string()),
            password: Some(String::new()),
            remember_me: None,
        };
        assert!(matches!(request.into_credentials(), Err(AuthError::ValidationError(_))));
    }
}
