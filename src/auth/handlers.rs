// HTTP handlers for authentication endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::app::AppState;
use crate::auth::{
    error::AuthError,
    middleware::CurrentUser,
    models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse},
};

/// Register a new user
/// POST /api/users/register
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created, session cookie set", body = AuthResponse),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 409, description = "User already exists", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AuthError> {
    let Json(request) = payload?;
    let registration = request.into_registration()?;

    let service = &state.auth_service;
    let session = service.register(registration).await?;
    let jar = service.sessions().attach(jar, &session.token);

    Ok((StatusCode::CREATED, jar, Json(AuthResponse { user: session.user })))
}

/// Login a user
/// POST /api/users/login
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid credentials", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), AuthError> {
    let Json(request) = payload?;
    let credentials = request.into_credentials()?;

    let service = &state.auth_service;
    let session = service.login(credentials).await?;
    let jar = service.sessions().attach(jar, &session.token);

    Ok((jar, Json(AuthResponse { user: session.user })))
}

/// Clear the session cookie
/// POST /api/users/logout
#[utoipa::path(
    post,
    path = "/api/users/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = state.auth_service.sessions().clear(jar);
    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Get current user information (protected endpoint)
/// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Currently authenticated user", body = AuthResponse),
        (status = 401, description = "Missing, invalid or expired session", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me_handler(CurrentUser(user): CurrentUser) -> Json<AuthResponse> {
    Json(AuthResponse { user })
}

/// List every user (admin only)
/// GET /api/users/all-users
#[utoipa::path(
    get,
    path = "/api/users/all-users",
    responses(
        (status = 200, description = "All users, without secrets", body = [UserResponse]),
        (status = 401, description = "Missing, invalid or expired session", body = crate::error::ErrorResponse),
        (status = 403, description = "Authenticated user is not an admin", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, AuthError> {
    let users = state.auth_service.list_users().await?;
    tracing::debug!("Admin {} listed {} users", admin.id, users.len());
    Ok(Json(users))
}
