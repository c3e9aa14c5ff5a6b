use std::sync::Arc;

use bidsphere_api::{
    app::{create_router, AppState},
    auth::{AuthService, PgUserStore},
    config::AppConfig,
    db, StartupError,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("BidSphere API - Starting...");

    if let Err(err) = run().await {
        tracing::error!("Startup failed: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    tracing::debug!("Loaded configuration: {:?}", config);

    // An unreachable database at startup is fatal
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&pool).await?;

    let store = Arc::new(PgUserStore::new(pool));
    let state = AppState::new(AuthService::from_config(store, &config));
    let app = create_router(state, &config);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
