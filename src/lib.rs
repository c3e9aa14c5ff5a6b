pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod validation;

pub use app::{build_router, create_router, AppState};
pub use config::AppConfig;
pub use error::{ApiError, ErrorResponse, StartupError};
