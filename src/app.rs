// Router assembly, shared state and API documentation

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, Method, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{
    handlers::{list_users_handler, login_handler, logout_handler, me_handler, register_handler},
    middleware::{require_auth, RequireRole},
    models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, Role, UserResponse},
    service::AuthService,
};
use crate::config::AppConfig;
use crate::error::{ApiError, ErrorResponse};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::handlers::register_handler,
        crate::auth::handlers::login_handler,
        crate::auth::handlers::logout_handler,
        crate::auth::handlers::me_handler,
        crate::auth::handlers::list_users_handler,
    ),
    components(
        schemas(RegisterRequest, LoginRequest, AuthResponse, UserResponse, MessageResponse, Role, ErrorResponse)
    ),
    tags(
        (name = "auth", description = "Registration, login and cookie sessions"),
        (name = "admin", description = "Endpoints restricted to administrators")
    ),
    info(
        title = "BidSphere API",
        version = "0.1.0",
        description = "Authentication backend for the BidSphere auction system"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth_service: AuthService) -> Self {
        Self {
            auth_service: Arc::new(auth_service),
        }
    }
}

/// Routes mounted under /api/users
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let admin_gate = RequireRole::admin();

    // route_layer order: the last layer added runs first
    let admin_routes = Router::new()
        .route("/all-users", get(list_users_handler))
        .route_layer(middleware::from_fn(move |request: Request, next: Next| {
            admin_gate.clone().middleware(request, next)
        }))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/me", get(me_handler))
        .merge(admin_routes)
}

/// Full application without CORS; used directly by tests
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(health))
        .nest("/api/users", auth_routes(state.clone()))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}

/// Creates and configures the application router
/// Adds CORS for the configured frontend origins, with credentials so the
/// session cookie is sent cross-origin
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_allowed_origins.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    build_router(state).layer(cors)
}

async fn health() -> &'static str {
    "Server is running"
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        path: uri.path().to_string(),
    }
}

/// Top-level handler for unexpected failures
pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = err.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = err.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::InternalError(detail).into_response()
}
