use std::collections::BTreeMap;
use std::sync::Arc;

use fieldmap_core::geo::normalize_ring;
use fieldmap_core::models::FieldRecord;
use fieldmap_overlay::{InMemoryMapSurface, OverlayHandle, OverlayOrchestrator};
use fieldmap_raster::RasterClipper;

use crate::dto::{OverlayBody, OverlayResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for rendering a field overlay
pub struct OverlayService;

impl OverlayService {
    /// Run the overlay lifecycle for one field on a fresh headless surface
    /// and return what was installed
    pub async fn render(
        state: &AppState,
        field_id: &str,
        body: &OverlayBody,
    ) -> Result<OverlayResponse, ApiError> {
        let boundary = body.boundary.as_deref().map(normalize_ring).transpose()?;
        let mut field = FieldRecord::new(field_id, boundary);
        field.current_ndvi_value = body.current_ndvi_value;

        let orchestrator =
            OverlayOrchestrator::new(InMemoryMapSurface::new(), state.settings.clone());
        let clipper = RasterClipper::new(Arc::clone(&state.raster_source));
        let handle = OverlayHandle::new(orchestrator, clipper);

        let completion = handle.show_field(&field).await?;
        let overlay_state = handle.state().await;
        let (sources, layers, fit_bounds) = handle
            .with_surface(|surface| {
                let layers = surface.layers().to_vec();
                let sources: BTreeMap<_, _> = layers
                    .iter()
                    .filter_map(|layer| {
                        surface.source(&layer.source).map(|spec| (layer.source.clone(), spec.clone()))
                    })
                    .collect();
                (sources, layers, surface.last_fit().copied())
            })
            .await;

        Ok(OverlayResponse {
            field_id: field_id.to_string(),
            completion,
            state: overlay_state,
            sources,
            layers,
            fit_bounds,
        })
    }
}
