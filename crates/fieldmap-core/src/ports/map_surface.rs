use serde::Serialize;

use crate::error::Result;
use crate::models::BoundingBox;

/// Data source a layer draws from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpec {
    /// A single image stretched over a corner quad
    Image {
        url: String,
        /// Top-left, top-right, bottom-right, bottom-left as `[lng, lat]`
        coordinates: [[f64; 2]; 4],
    },
    #[serde(rename = "geojson")]
    GeoJson { data: geojson::GeoJson },
}

impl SourceSpec {
    /// Image source placed over `bbox`
    pub fn image(url: impl Into<String>, bbox: &BoundingBox) -> Self {
        Self::Image { url: url.into(), coordinates: bbox.image_corners() }
    }
}

/// How a layer renders its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Raster,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    pub paint: serde_json::Value,
}

/// Port for the live map widget.
///
/// The surface is one mutable resource; callers issue removals for a field
/// before any installation for it.
pub trait MapSurface {
    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<()>;

    /// Removing an unknown source is a no-op
    fn remove_source(&mut self, id: &str) -> Result<()>;

    /// Fails when a layer with the same id is already installed
    fn add_layer(&mut self, layer: LayerSpec) -> Result<()>;

    /// Removing an unknown layer is a no-op
    fn remove_layer(&mut self, id: &str) -> Result<()>;

    fn fit_bounds(&mut self, bbox: &BoundingBox);

    fn has_layer(&self, id: &str) -> bool;

    fn has_source(&self, id: &str) -> bool;
}
