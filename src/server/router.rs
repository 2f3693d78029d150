use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

pub fn build_router(state: AppState) -> Router {
    // The extension calls from a chrome-extension:// origin.
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/status", get(handlers::status))
        .route("/classify", post(handlers::classify))
        .route("/history", get(handlers::history))
        .route("/clear", post(handlers::clear))
        .layer(cors)
        .with_state(state)
}
