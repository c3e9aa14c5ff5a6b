// Authentication and authorization gates for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::auth::{
    error::AuthError,
    models::{Role, UserResponse},
    service::AuthService,
};

/// Authenticated request context: the resolved user, without secrets
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserResponse);

/// Resolve the session cookie to a user
///
/// Missing cookie, bad token and vanished user each fail with their own
/// `AuthError`, all of which are 401 responses.
pub async fn authenticate(service: &AuthService, jar: &CookieJar) -> Result<CurrentUser, AuthError> {
    let token = service.sessions().extract(jar).ok_or(AuthError::MissingToken)?;
    let claims = service.tokens().verify(&token)?;

    let user = service
        .get_current_user(claims.sub)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    debug!("Authenticated user {}", user.id);
    Ok(CurrentUser(user))
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Reuse the context when the gate middleware already ran
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        authenticate(&state.auth_service, &jar).await
    }
}

/// Authentication gate as middleware: stores `CurrentUser` in the request
/// extensions for the gates and handlers behind it
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(&state.auth_service, &jar).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Authorization middleware that requires one of a set of roles
///
/// Must sit behind `require_auth`, which provides the request context.
#[derive(Debug, Clone)]
pub struct RequireRole {
    allowed: Vec<Role>,
}

impl RequireRole {
    /// Create a new RequireRole middleware allowing any of `allowed`
    pub fn new(allowed: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed: allowed.into(),
        }
    }

    /// Create a middleware that requires Admin role
    pub fn admin() -> Self {
        Self::new([Role::Admin])
    }

    /// Decide access from the request context alone
    pub fn authorize(&self, user: Option<&CurrentUser>) -> Result<(), AuthError> {
        let CurrentUser(user) = user.ok_or(AuthError::NotAuthenticated)?;

        if !self.allowed.contains(&user.role) {
            return Err(AuthError::InsufficientPermissions {
                allowed: self.allowed.clone(),
                actual: user.role,
            });
        }
        Ok(())
    }

    /// Middleware function that validates role-based access
    pub async fn middleware(self, request: Request, next: Next) -> Result<Response, AuthError> {
        let endpoint = request.uri().path().to_string();

        if let Err(err) = self.authorize(request.extensions().get::<CurrentUser>()) {
            warn!("Authorization failed for endpoint {}: {}", endpoint, err);
            return Err(err);
        }

        debug!("Authorization successful for endpoint {}", endpoint);
        Ok(next.run(request).await)
    }
}
