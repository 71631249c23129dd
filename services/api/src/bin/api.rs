//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, JsonFileAdapter, MemoryAdapter},
    config::{Config, StorageBackend},
    error::ApiError,
    web::{api_router, rest::ApiDoc, state::AppState},
};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use quest_tracker_core::domain::{ProfileState, ProgressSnapshot};
use quest_tracker_core::ports::ProgressStore;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the store selected by the configuration, preparing it for use.
async fn connect_store(config: &Config) -> Result<Arc<dyn ProgressStore>, ApiError> {
    match &config.storage {
        StorageBackend::JsonFile(path) => {
            info!("Using JSON data file {}", path.display());
            let adapter = JsonFileAdapter::new(path.clone(), config.initial_weight);
            adapter.ensure_initialized().await?;
            Ok(Arc::new(adapter))
        }
        StorageBackend::Postgres(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let adapter = DbAdapter::new(db_pool, config.initial_weight);
            info!("Running database migrations...");
            adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Ok(Arc::new(adapter))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data will not survive a restart");
            Ok(Arc::new(MemoryAdapter::new(ProgressSnapshot {
                profile: ProfileState::with_weight(config.initial_weight),
                history: Vec::new(),
            })))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Store ---
    let store = connect_store(&config).await?;

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(store, config.clone()));

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(api_router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
