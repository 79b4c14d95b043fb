use fieldmap_core::models::BoundingBox;
use fieldmap_core::ports::{LayerKind, LayerSpec};
use fieldmap_overlay::{Completion, OverlayState};
use serde::Serialize;

/// Output for area command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaOutput {
    pub vertices: usize,
    pub area_hectares: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geodesic_hectares: Option<f64>,
    pub max_extent_m: f64,
    pub within_validity_range: bool,
    /// `[min_lng, min_lat, max_lng, max_lat]`
    pub bbox: [f64; 4],
}

/// Output for gradient and clip commands
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterOutput {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub visible_pixels: usize,
    /// `clipped`, `gradient` or `fallback`
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub corners: [[f64; 2]; 4],
}

/// Output for overlay command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayOutput {
    pub field_id: String,
    pub completion: Completion,
    pub state: OverlayState,
    pub layers: Vec<LayerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitted_bounds: Option<BoundingBox>,
}

/// Installed layer without its (possibly large) source payload
#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    pub paint: serde_json::Value,
}

impl From<&LayerSpec> for LayerSummary {
    fn from(layer: &LayerSpec) -> Self {
        Self {
            id: layer.id.clone(),
            kind: layer.kind,
            source: layer.source.clone(),
            paint: layer.paint.clone(),
        }
    }
}

/// Output for gdd command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GddOutput {
    pub days: usize,
    pub base: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<f64>,
    pub growing_degree_days: f64,
    pub precipitation_mm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<(chrono::NaiveDate, chrono::NaiveDate)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<GddPoint>,
}

#[derive(Debug, Serialize)]
pub struct GddPoint {
    pub date: chrono::NaiveDate,
    pub cumulative: f64,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOutput {
    pub config_file: Option<String>,
    pub raster_base_url: ConfigValue<Option<String>>,
    pub palette: ConfigValue<String>,
    pub fetch_timeout_ms: ConfigValue<u64>,
    pub render_size: ConfigValue<u32>,
    pub default_ndvi: ConfigValue<f64>,
}
