//! Router configuration.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::handlers;

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/titles", get(handlers::list_titles))
        .route("/entry", get(handlers::get_entry))
        .route("/is_indexed", get(handlers::is_indexed))
        // Paths the existing frontend still calls
        .route("/get_titles", get(handlers::list_titles))
        .route("/get_dataset_data", get(handlers::get_entry))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
