//! Route definitions for the Reorder Planning service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/planning", planning_routes())
}

/// Planning routes
fn planning_routes() -> Router<AppState> {
    Router::new()
        .route("/policy", post(handlers::compute_policy))
        .route("/requests", post(handlers::recompute_request))
        .route("/requests/export", post(handlers::export_request))
        .route("/manual", post(handlers::manual_policy))
        .route("/reorder-levels", post(handlers::apply_reorder_level))
        .route("/material-requests", post(handlers::create_material_request))
}
