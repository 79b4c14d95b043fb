use fieldmap_core::config::OverlaySettings;
use fieldmap_core::error::Result;
use fieldmap_core::models::{FieldId, FieldRecord};
use fieldmap_core::ports::{LayerKind, LayerSpec, MapSurface, SourceSpec};
use fieldmap_raster::{field_raster_url, ClippedRaster, GradientGenerator};
use serde_json::json;

use crate::models::{Completion, OverlayLayerIds, OverlayRequest, OverlayState};

const FILL_OPACITY: f64 = 0.85;
const OUTLINE_COLOR: &str = "#ffffff";
const OUTLINE_WIDTH: f64 = 2.0;

/// Overlay state machine for one map surface
///
/// `select` and `complete` never overlap for a given surface; the raster
/// fetch between them runs without holding the surface.
pub struct OverlayOrchestrator<M: MapSurface> {
    surface: M,
    settings: OverlaySettings,
    gradient: GradientGenerator,
    state: OverlayState,
    generation: u64,
    installed: Option<FieldId>,
}

impl<M: MapSurface> OverlayOrchestrator<M> {
    pub fn new(surface: M, settings: OverlaySettings) -> Self {
        let gradient = GradientGenerator::new(settings.render_size);
        Self { surface, settings, gradient, state: OverlayState::Idle, generation: 0, installed: None }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn into_surface(self) -> M {
        self.surface
    }

    /// Start rendering `field`.
    ///
    /// Always tears down the overlay currently installed. Returns `None` when
    /// the field has no boundary; the state is then back to `Idle`.
    pub fn select(&mut self, field: &FieldRecord) -> Option<OverlayRequest> {
        self.generation += 1;
        self.teardown(&field.id);

        let Some(boundary) = field.boundary.clone() else {
            tracing::info!(field_id = %field.id, "Field has no boundary, overlay cleared");
            self.state = OverlayState::Idle;
            return None;
        };

        let bbox = boundary.bounding_box();
        let url = self.settings.raster_base_url.as_deref().and_then(|base| {
            field_raster_url(base, &field.id, &self.settings.palette)
                .map_err(|e| tracing::warn!(error = %e, "Cannot build raster URL"))
                .ok()
        });

        tracing::info!(
            field_id = %field.id,
            generation = self.generation,
            has_provider = url.is_some(),
            "Field selected, loading overlay"
        );
        tracing::debug!(bbox = ?bbox.to_array(), "Overlay bounding box");

        self.state =
            OverlayState::Loading { field_id: field.id.clone(), generation: self.generation };

        Some(OverlayRequest {
            field_id: field.id.clone(),
            generation: self.generation,
            url,
            boundary,
            bbox,
            ndvi: field.current_ndvi_value.unwrap_or(self.settings.default_ndvi),
        })
    }

    /// True while `request` is still the selection being loaded
    pub fn is_current(&self, request: &OverlayRequest) -> bool {
        matches!(
            &self.state,
            OverlayState::Loading { field_id, generation }
                if *generation == request.generation && *field_id == request.field_id
        )
    }

    /// Install the outcome of `request`.
    ///
    /// Stale requests are dropped without touching the surface. Any raster
    /// failure is replaced by the synthetic gradient, and the outline is
    /// installed in every case. If the surface rejects the outline the
    /// field's layers are removed again and the error is returned.
    pub fn complete(
        &mut self,
        request: OverlayRequest,
        fetched: Result<ClippedRaster>,
    ) -> Result<Completion> {
        if !self.is_current(&request) {
            tracing::debug!(
                field_id = %request.field_id,
                generation = request.generation,
                "Discarding stale overlay result"
            );
            return Ok(Completion::Stale);
        }

        let (raster, completion) = match fetched {
            Ok(raster) => (raster, Completion::Loaded),
            Err(e) => {
                tracing::warn!(
                    field_id = %request.field_id,
                    error = %e,
                    "Raster unavailable, using synthetic fill"
                );
                let gradient =
                    self.gradient.gradient_for(request.ndvi, &request.boundary, &request.bbox);
                (gradient, Completion::Fallback { reason: e.to_string() })
            }
        };

        // Recorded before any write so a partial install is still torn down
        self.installed = Some(request.field_id.clone());

        let ids = OverlayLayerIds::for_field(&request.field_id);
        if let Err(e) = self.install_fill(&ids, &raster) {
            tracing::warn!(field_id = %request.field_id, error = %e, "Fill layer not installed");
            self.remove_ids(&[ids.fill.as_str()], &[ids.fill_source.as_str()]);
        }
        if let Err(e) = self.install_outline(&ids, &request) {
            tracing::warn!(field_id = %request.field_id, error = %e, "Outline not installed, overlay rolled back");
            self.remove_overlay(&request.field_id);
            self.state = OverlayState::Idle;
            return Err(e);
        }
        self.surface.fit_bounds(&request.bbox);

        self.state = match completion {
            Completion::Loaded => OverlayState::Loaded { field_id: request.field_id.clone() },
            _ => OverlayState::Fallback { field_id: request.field_id.clone() },
        };
        tracing::info!(field_id = %request.field_id, outcome = ?completion, "Overlay installed");

        Ok(completion)
    }

    /// Remove the installed overlay and any leftovers for `next`
    fn teardown(&mut self, next: &FieldId) {
        let previous = self.installed.take();
        for field_id in previous.iter().chain(std::iter::once(next)) {
            self.remove_overlay(field_id);
        }
    }

    fn remove_overlay(&mut self, field_id: &FieldId) {
        let ids = OverlayLayerIds::for_field(field_id);
        self.remove_ids(
            &[ids.fill.as_str(), ids.outline.as_str()],
            &[ids.fill_source.as_str(), ids.outline_source.as_str()],
        );
    }

    /// Layers go before the sources they reference. Every id is attempted
    /// even when an earlier removal fails.
    fn remove_ids(&mut self, layers: &[&str], sources: &[&str]) {
        for id in layers {
            if let Err(e) = self.surface.remove_layer(id) {
                tracing::warn!(layer = %id, error = %e, "Layer not removed");
            }
        }
        for id in sources {
            if let Err(e) = self.surface.remove_source(id) {
                tracing::warn!(source = %id, error = %e, "Source not removed");
            }
        }
    }

    fn install_fill(&mut self, ids: &OverlayLayerIds, raster: &ClippedRaster) -> Result<()> {
        let url = raster.to_data_url()?;
        self.surface.add_source(&ids.fill_source, SourceSpec::image(url, raster.bbox()))?;
        self.surface.add_layer(LayerSpec {
            id: ids.fill.clone(),
            kind: LayerKind::Raster,
            source: ids.fill_source.clone(),
            paint: json!({ "raster-opacity": FILL_OPACITY }),
        })
    }

    fn install_outline(&mut self, ids: &OverlayLayerIds, request: &OverlayRequest) -> Result<()> {
        let outline = geojson::GeoJson::Feature(request.boundary.to_geojson_feature());
        self.surface.add_source(&ids.outline_source, SourceSpec::GeoJson { data: outline })?;
        self.surface.add_layer(LayerSpec {
            id: ids.outline.clone(),
            kind: LayerKind::Line,
            source: ids.outline_source.clone(),
            paint: json!({ "line-color": OUTLINE_COLOR, "line-width": OUTLINE_WIDTH }),
        })
    }
}
