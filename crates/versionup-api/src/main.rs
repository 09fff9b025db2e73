//! VersionUp training API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use versionup_api::error::AppError;
use versionup_api::routes;
use versionup_api::state::AppState;
use versionup_core::clock::SystemClock;
use versionup_event_store::pg_event_repository::PgEventRepository;
use versionup_narration::{MessageCatalog, TracingSpeech};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting VersionUp training API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
    let reset_delay_ms: u64 = std::env::var("RESET_DELAY_MS")
        .unwrap_or_else(|_| "4000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("RESET_DELAY_MS must be a valid u64: {e}")))?;

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    // Build application state.
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(PgEventRepository::new(pool)),
        Arc::new(MessageCatalog::builtin()),
        Arc::new(TracingSpeech),
        Duration::from_millis(reset_delay_ms),
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/runs", routes::runs::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
