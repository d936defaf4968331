//! API Routes - Router Assembly
//!
//! Wires every endpoint onto one axum Router with a permissive CORS
//! layer — the game client calls this API straight from the browser.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::handlers::{self, AppState};

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/add-points", post(handlers::add_points))
        .route("/get-points/:address", get(handlers::get_points))
        .route("/claim-rewards", post(handlers::claim_rewards))
        .route("/balance/:address", get(handlers::balance))
        .route("/token-info", get(handlers::token_info))
        .route("/admin/pending-claim/:address", get(handlers::pending_claim))
        .route("/admin/resolve-claim", post(handlers::resolve_claim))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
