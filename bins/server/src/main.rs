//! Milebook API Server
//!
//! Main entry point for the Milebook backend service.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use milebook_api::{AppState, create_router};
use milebook_db::connect_with_pool;
use milebook_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "milebook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig::from(&config.auth));

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
    };

    let app = create_router(state).layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.server.request_timeout_secs),
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
