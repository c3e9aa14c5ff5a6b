// Authentication module
// Cookie-carried JWT sessions with bcrypt-hashed credentials and role gates

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{list_users_handler, login_handler, logout_handler, me_handler, register_handler};
pub use middleware::{authenticate, require_auth, CurrentUser, RequireRole};
pub use models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, Role, User, UserResponse};
pub use password::PasswordService;
pub use repository::{MemoryUserStore, PgUserStore, UserStore};
pub use service::{AuthService, Session};
pub use session::{SessionCookies, SESSION_COOKIE_NAME};
pub use token::{Claims, IssuedToken, TokenService};
