use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::handlers::{get_traffic, health_check, ingest_events, AppState};

pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/traffic", get(get_traffic))
        .route("/api/ingest", post(ingest_events))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
