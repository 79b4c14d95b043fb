use axum::{http::StatusCode, Json};
use fieldmap_core::formats::{import_cadastral_geojson, ImportResult};

use crate::dto::{AreaRequest, AreaResponse};
use crate::error::ApiError;
use crate::services::AreaService;

/// Raw GeoJSON in, `ImportResult` envelope out.
///
/// Rejections keep the `{success: false, error}` body and answer 422.
pub async fn import_boundary(body: String) -> (StatusCode, Json<ImportResult>) {
    tracing::info!(size = body.len(), "Processing boundary import");

    let result = import_cadastral_geojson(&body);
    let status =
        if result.is_success() { StatusCode::OK } else { StatusCode::UNPROCESSABLE_ENTITY };
    (status, Json(result))
}

pub async fn measure_area(
    Json(request): Json<AreaRequest>,
) -> Result<Json<AreaResponse>, ApiError> {
    tracing::debug!(vertices = request.coordinates.len(), "Measuring boundary");
    Ok(Json(AreaService::measure(&request)?))
}
