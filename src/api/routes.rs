//! REST API routes configuration

use crate::api::handlers::{self, ApiState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the API router with all routes
pub fn create_router(state: ApiState) -> Router {
    // Configure CORS for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Chain endpoints
        .route("/api/chain", get(handlers::get_chain_info))
        .route("/api/chain/blocks", get(handlers::get_blocks))
        .route(
            "/api/chain/blocks/{index}",
            get(handlers::get_block_by_index),
        )
        .route("/api/chain/validate", get(handlers::validate_chain))
        // Mining
        .route("/api/mine", post(handlers::mine_block))
        // Node info
        .route("/api/version", get(handlers::get_version))
        // Peers
        .route("/api/peers", get(handlers::list_peers))
        .route("/api/peers", post(handlers::add_peer))
        // Add state and middleware
        .with_state(state)
        .layer(cors)
}
