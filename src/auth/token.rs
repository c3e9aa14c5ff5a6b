// JWT token generation and validation service

use crate::auth::{error::AuthError, models::Role};
use crate::config::TokenLifetimes;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub role: Role,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// A freshly signed token and the lifetime it was issued with
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub lifetime_secs: i64,
}

/// Token service for JWT operations
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetimes: TokenLifetimes,
}

impl TokenService {
    /// Create a new TokenService; the same secret signs and verifies
    pub fn new(secret: &str, lifetimes: TokenLifetimes) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetimes,
        }
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    /// Sign a token for the user; `remember_me` selects the longer window
    pub fn issue(&self, user_id: Uuid, role: Role, remember_me: bool) -> Result<IssuedToken, AuthError> {
        let lifetime_secs = self.lifetimes.select(remember_me);
        let now = Utc::now().timestamp();
        let exp = now.checked_add(lifetime_secs).ok_or_else(|| {
            AuthError::TokenGenerationError(format!("lifetime of {}s overflows expiry", lifetime_secs))
        })?;

        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))?;

        Ok(IssuedToken { token, lifetime_secs })
    }

    /// Validate a token and return its claims
    ///
    /// Every failure (signature, payload, expiry) is reported as
    /// `InvalidToken` so callers learn nothing about which check failed.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}
