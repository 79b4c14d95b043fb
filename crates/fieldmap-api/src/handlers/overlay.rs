use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::dto::{OverlayBody, OverlayResponse};
use crate::error::ApiError;
use crate::services::OverlayService;
use crate::state::AppState;

pub async fn render_overlay(
    State(state): State<Arc<AppState>>,
    Path(field_id): Path<String>,
    Json(body): Json<OverlayBody>,
) -> Result<Json<OverlayResponse>, ApiError> {
    tracing::info!(
        field_id = %field_id,
        has_boundary = body.boundary.is_some(),
        "Processing overlay request"
    );

    let response = OverlayService::render(&state, &field_id, &body).await?;
    Ok(Json(response))
}
