use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Boundaries
        .route("/api/v1/boundaries/import", post(handlers::import_boundary))
        .route("/api/v1/boundaries/area", post(handlers::measure_area))
        // NDVI scale
        .route("/api/v1/ndvi/legend", get(handlers::ndvi_legend))
        .route("/api/v1/ndvi/color", get(handlers::ndvi_color))
        // Overlays
        .route("/api/v1/fields/{field_id}/overlay", post(handlers::render_overlay))
        .with_state(state)
}
