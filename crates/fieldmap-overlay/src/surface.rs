//! In-memory map surface for headless rendering and tests.

use std::collections::HashMap;

use fieldmap_core::error::{FieldmapError, Result};
use fieldmap_core::models::BoundingBox;
use fieldmap_core::ports::{LayerSpec, MapSurface, SourceSpec};

/// Records sources and layers the way a map widget would hold them
#[derive(Debug, Clone, Default)]
pub struct InMemoryMapSurface {
    sources: HashMap<String, SourceSpec>,
    /// Install order, bottom to top
    layers: Vec<LayerSpec>,
    last_fit: Option<BoundingBox>,
}

impl InMemoryMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn last_fit(&self) -> Option<&BoundingBox> {
        self.last_fit.as_ref()
    }
}

impl MapSurface for InMemoryMapSurface {
    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<()> {
        if self.sources.contains_key(id) {
            return Err(FieldmapError::Surface {
                id: id.to_string(),
                reason: "source already exists".to_string(),
            });
        }
        self.sources.insert(id.to_string(), spec);
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<()> {
        if self.layers.iter().any(|l| l.source == id) {
            return Err(FieldmapError::Surface {
                id: id.to_string(),
                reason: "source is still used by a layer".to_string(),
            });
        }
        self.sources.remove(id);
        Ok(())
    }

    fn add_layer(&mut self, layer: LayerSpec) -> Result<()> {
        if self.has_layer(&layer.id) {
            return Err(FieldmapError::Surface {
                id: layer.id,
                reason: "layer already exists".to_string(),
            });
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(FieldmapError::Surface {
                id: layer.id,
                reason: format!("unknown source {}", layer.source),
            });
        }
        self.layers.push(layer);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<()> {
        self.layers.retain(|l| l.id != id);
        Ok(())
    }

    fn fit_bounds(&mut self, bbox: &BoundingBox) {
        self.last_fit = Some(*bbox);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }
}
