pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use rest::{
    charts_form_handler, charts_handler, dashboard_handler, get_daily_handler, health_handler,
    history_handler, info_handler, update_weight_handler, upsert_daily_handler,
};
pub use state::AppState;

/// Builds the API routes over the shared state. CORS and the Swagger UI are
/// layered on by the binary.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/daily", get(get_daily_handler).post(upsert_daily_handler))
        .route("/weight", post(update_weight_handler))
        .route("/history", get(history_handler))
        .route("/charts", get(charts_handler).post(charts_form_handler))
        .route("/info", get(info_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
