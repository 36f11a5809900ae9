//! Axum router construction for the game API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin web-client access.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the game API.
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/phase", get(handlers::get_phase))
        .route(
            "/api/submissions/{participant}",
            get(handlers::get_submission).post(handlers::post_submission),
        )
        .route("/api/pool", get(handlers::get_pool))
        .route("/api/survivors", get(handlers::get_survivors))
        .route(
            "/api/eliminations",
            get(handlers::get_eliminations).post(handlers::post_elimination),
        )
        .route("/api/spins", get(handlers::get_spins).post(handlers::post_spin))
        .route("/api/standings", get(handlers::get_standings))
        .route("/api/winner/resolve", post(handlers::post_resolve))
        .route("/api/winner/tie-break", post(handlers::post_tie_break))
        .route("/api/config", get(handlers::get_config))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
