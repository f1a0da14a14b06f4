use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all upload endpoints.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config().max_upload_bytes;
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/api/check-store", get(handler::check_store_handler))
        .route("/api/store-token", post(handler::store_token_handler))
        .route("/api/upload", post(handler::upload_handler))
        .route("/api/upload-webcam", post(handler::upload_webcam_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
