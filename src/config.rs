// Application configuration
// Read once at startup and shared read-only afterwards

use std::fmt;

use axum::http::HeaderValue;

/// Default token/cookie lifetime: one day
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;
/// "Remember me" token/cookie lifetime: seven days
pub const REMEMBER_TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;
/// Upper bound for either lifetime: ten years
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Lifetimes for issued tokens and the cookies carrying them, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub default_secs: i64,
    pub remember_secs: i64,
}

impl TokenLifetimes {
    pub fn new(default_secs: i64, remember_secs: i64) -> Result<Self, ConfigError> {
        if default_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRES_SECS",
                value: default_secs.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if remember_secs > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::Invalid {
                key: "JWT_REMEMBER_EXPIRES_SECS",
                value: remember_secs.to_string(),
                reason: format!("must not exceed {} seconds", MAX_TOKEN_LIFETIME_SECS),
            });
        }
        if remember_secs <= default_secs {
            return Err(ConfigError::Invalid {
                key: "JWT_REMEMBER_EXPIRES_SECS",
                value: remember_secs.to_string(),
                reason: format!("must be longer than JWT_EXPIRES_SECS ({})", default_secs),
            });
        }
        Ok(Self {
            default_secs,
            remember_secs,
        })
    }

    /// Lifetime selected by the "remember me" flag
    pub fn select(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_secs
        } else {
            self.default_secs
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            default_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            remember_secs: REMEMBER_TOKEN_LIFETIME_SECS,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_lifetimes: TokenLifetimes,
    /// Production mode marks session cookies `Secure`
    pub production: bool,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<HeaderValue>,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let database_max_connections =
            parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 5u32)?;
        let token_lifetimes = TokenLifetimes::new(
            parse_or("JWT_EXPIRES_SECS", get("JWT_EXPIRES_SECS"), DEFAULT_TOKEN_LIFETIME_SECS)?,
            parse_or(
                "JWT_REMEMBER_EXPIRES_SECS",
                get("JWT_REMEMBER_EXPIRES_SECS"),
                REMEMBER_TOKEN_LIFETIME_SECS,
            )?,
        )?;

        let production = get("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", get("PORT"), 5000u16)?;

        let origins = get("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "http://localhost:5173".to_string());
        let cors_allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                    key: "CORS_ALLOWED_ORIGINS",
                    value: origin.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            token_lifetimes,
            production,
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// The signing secret and connection string never reach the logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"<redacted>")
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetimes", &self.token_lifetimes)
            .field("production", &self.production)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
