// Authentication service - business logic layer

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{Credentials, NewUser, Registration, UserResponse},
    password::PasswordService,
    repository::UserStore,
    session::SessionCookies,
    token::{IssuedToken, TokenService},
};
use crate::config::AppConfig;

/// Outcome of a successful register or login
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserResponse,
    pub token: IssuedToken,
}

/// Authentication service coordinating all auth operations
pub struct AuthService {
    store: Arc<dyn UserStore>,
    password_service: PasswordService,
    token_service: TokenService,
    session_cookies: SessionCookies,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        store: Arc<dyn UserStore>,
        password_service: PasswordService,
        token_service: TokenService,
        session_cookies: SessionCookies,
    ) -> Self {
        Self {
            store,
            password_service,
            token_service,
            session_cookies,
        }
    }

    /// Wire the production services from configuration
    pub fn from_config(store: Arc<dyn UserStore>, config: &AppConfig) -> Self {
        Self::new(
            store,
            PasswordService::new(),
            TokenService::new(&config.jwt_secret, config.token_lifetimes),
            SessionCookies::new(config.production),
        )
    }

    pub fn tokens(&self) -> &TokenService {
        &self.token_service
    }

    pub fn sessions(&self) -> &SessionCookies {
        &self.session_cookies
    }

    /// Register a new user and open a session for them
    pub async fn register(&self, registration: Registration) -> Result<Session, AuthError> {
        if self.store.email_exists(&registration.email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = self.password_service.hash(registration.password).await?;

        // The store re-checks uniqueness, so a concurrent duplicate still fails here
        let user = self
            .store
            .create_user(NewUser {
                name: registration.name,
                email: registration.email,
                password_hash,
                role: registration.role,
            })
            .await?;

        let token = self.token_service.issue(user.id, user.role, registration.remember_me)?;
        tracing::info!("Registered user {} with role {}", user.id, user.role);

        Ok(Session {
            user: user.into(),
            token,
        })
    }

    /// Check credentials and open a session
    pub async fn login(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let user = self
            .store
            .find_by_email(&credentials.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = self
            .password_service
            .verify(credentials.password, user.password_hash.clone())
            .await?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_service.issue(user.id, user.role, credentials.remember_me)?;
        tracing::info!("User {} logged in", user.id);

        Ok(Session {
            user: user.into(),
            token,
        })
    }

    /// Get current user information
    pub async fn get_current_user(&self, user_id: Uuid) -> Result<Option<UserResponse>, AuthError> {
        self.store.find_by_id(user_id).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AuthError> {
        self.store.list_users().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::auth::repository::MemoryUserStore;
    use crate::config::TokenLifetimes;

    fn test_service() -> (AuthService, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        let service = AuthService::new(
            store.clone(),
            PasswordService::with_cost(4),
            TokenService::new("service_test_secret", TokenLifetimes::default()),
            SessionCookies::new(false),
        );
        (service, store)
    }

    fn registration(email: &str, password: &str, role: Role) -> Registration {
        Registration {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            remember_me: false,
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
            remember_me: false,
        }
    }

    #[tokio::test]
    async fn test_register_stores_hashed_secret() {
        let (service, store) = test_service();
        service
            .register(registration("ada@example.com", "plain-secret", Role::User))
            .await
            .unwrap();

        let stored = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "plain-secret");
        assert!(PasswordService::with_cost(4)
            .verify_password("plain-secret", &stored.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_register_issues_token_for_new_user() {
        let (service, _) = test_service();
        let session = service
            .register(registration("root@example.com", "pw", Role::Admin))
            .await
            .unwrap();

        let claims = service.tokens().verify(&session.token.token).unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (service, store) = test_service();
        service
            .register(registration("ada@example.com", "pw", Role::User))
            .await
            .unwrap();
        let before = store.list_users().await.unwrap();

        let result = service
            .register(registration("ada@example.com", "other", Role::Admin))
            .await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
        assert_eq!(store.list_users().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_login_with_correct_credentials() {
        let (service, _) = test_service();
        service
            .register(registration("ada@example.com", "pw", Role::Admin))
            .await
            .unwrap();

        let session = service.login(credentials("ada@example.com", "pw")).await.unwrap();
        let claims = service.tokens().verify(&session.token.token).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(session.user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = test_service();
        service
            .register(registration("ada@example.com", "pw", Role::User))
            .await
            .unwrap();

        let wrong_secret = service.login(credentials("ada@example.com", "nope")).await.unwrap_err();
        let unknown_user = service.login(credentials("bob@example.com", "pw")).await.unwrap_err();

        assert!(matches!(wrong_secret, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_secret.error_message(), unknown_user.error_message());
    }

    #[tokio::test]
    async fn test_remember_me_selects_longer_lifetime() {
        let (service, _) = test_service();
        service
            .register(registration("ada@example.com", "pw", Role::User))
            .await
            .unwrap();

        let short = service.login(credentials("ada@example.com", "pw")).await.unwrap();
        let mut remembered = credentials("ada@example.com", "pw");
        remembered.remember_me = true;
        let long = service.login(remembered).await.unwrap();

        assert!(long.token.lifetime_secs > short.token.lifetime_secs);
    }

    #[tokio::test]
    async fn test_current_user_lookup() {
        let (service, _) = test_service();
        let session = service
            .register(registration("ada@example.com", "pw", Role::User))
            .await
            .unwrap();

        let found = service.get_current_user(session.user.id).await.unwrap();
        assert_eq!(found, Some(session.user));
        assert!(service.get_current_user(Uuid::new_v4()).await.unwrap().is_none());
    }
}
