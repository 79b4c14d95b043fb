use serde::Deserialize;
use serde_json::Value;

/// Area request body; vertices in any supported encoding
#[derive(Debug, Deserialize)]
pub struct AreaRequest {
    pub coordinates: Vec<Value>,
    #[serde(default)]
    pub geodesic: bool,
}

#[derive(Debug, Deserialize)]
pub struct ColorQuery {
    pub value: f64,
}

/// Overlay request body; a missing boundary clears the field's overlay
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayBody {
    #[serde(default)]
    pub boundary: Option<Vec<Value>>,
    #[serde(default)]
    pub current_ndvi_value: Option<f64>,
}
