use std::collections::BTreeMap;

use fieldmap_core::models::BoundingBox;
use fieldmap_core::ports::{LayerSpec, SourceSpec};
use fieldmap_overlay::{Completion, OverlayState};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            service: "fieldmap-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaResponse {
    pub vertices: usize,
    pub area_hectares: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geodesic_hectares: Option<f64>,
    pub max_extent_m: f64,
    pub within_validity_range: bool,
    /// `[min_lng, min_lat, max_lng, max_lat]`
    pub bbox: [f64; 4],
}

/// Everything a map widget needs to mirror the rendered overlay
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayResponse {
    pub field_id: String,
    pub completion: Completion,
    pub state: OverlayState,
    pub sources: BTreeMap<String, SourceSpec>,
    /// Bottom to top
    pub layers: Vec<LayerSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_bounds: Option<BoundingBox>,
}
