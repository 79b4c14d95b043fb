use fieldmap_core::models::{Boundary, BoundingBox, FieldId};
use serde::Serialize;

/// Overlay lifecycle for the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum OverlayState {
    Idle,
    Loading { field_id: FieldId, generation: u64 },
    Loaded { field_id: FieldId },
    Fallback { field_id: FieldId },
}

impl OverlayState {
    pub fn field_id(&self) -> Option<&FieldId> {
        match self {
            Self::Idle => None,
            Self::Loading { field_id, .. }
            | Self::Loaded { field_id }
            | Self::Fallback { field_id } => Some(field_id),
        }
    }
}

/// Work captured when a field is selected, completed once the raster resolves
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRequest {
    pub field_id: FieldId,
    /// Selection counter at request time; a mismatch marks the result stale
    pub generation: u64,
    /// Provider URL, `None` when no provider is configured
    pub url: Option<String>,
    pub boundary: Boundary,
    pub bbox: BoundingBox,
    /// Value the synthetic fill is colored with
    pub ndvi: f64,
}

/// How a selection ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Completion {
    /// Clipped imagery installed
    Loaded,
    /// Synthetic gradient installed instead of imagery
    Fallback { reason: String },
    /// Selection changed while the raster was in flight; nothing installed
    Stale,
    /// Field has no boundary; previous overlay removed, nothing installed
    Cleared,
}

/// Layer and source ids owned by one field's overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayerIds {
    pub fill: String,
    pub fill_source: String,
    pub outline: String,
    pub outline_source: String,
}

impl OverlayLayerIds {
    pub fn for_field(field_id: &FieldId) -> Self {
        Self {
            fill: format!("field-{}-fill", field_id),
            fill_source: format!("field-{}-fill-src", field_id),
            outline: format!("field-{}-outline", field_id),
            outline_source: format!("field-{}-outline-src", field_id),
        }
    }
}
