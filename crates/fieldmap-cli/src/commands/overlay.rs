use crate::cli::OverlayArgs;
use crate::output::OutputWriter;
use crate::output_types::{LayerSummary, OverlayOutput};
use anyhow::Result;
use fieldmap_core::config::LayeredConfig;
use fieldmap_core::models::FieldRecord;
use fieldmap_overlay::{Completion, InMemoryMapSurface, OverlayHandle, OverlayOrchestrator};
use fieldmap_raster::{HttpRasterSource, RasterClipper};
use tabled::Tabled;

use super::load_boundary;

pub async fn execute(
    args: OverlayArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let settings = config.overlay_settings();
    let boundary = load_boundary(&args.path)?;

    let mut field = FieldRecord::new(args.field_id.as_str(), Some(boundary));
    if let Some(ndvi) = args.ndvi {
        field = field.with_ndvi(ndvi);
    }

    let source = HttpRasterSource::with_timeout(settings.fetch_timeout)?;
    let orchestrator = OverlayOrchestrator::new(InMemoryMapSurface::new(), settings);
    let handle = OverlayHandle::new(orchestrator, RasterClipper::new(source));

    let completion = handle.show_field(&field).await?;
    let state = handle.state().await;
    let (layers, fitted_bounds) = handle
        .with_surface(|surface| {
            let layers: Vec<LayerSummary> = surface.layers().iter().map(LayerSummary::from).collect();
            (layers, surface.last_fit().copied())
        })
        .await;

    if let Completion::Fallback { reason } = &completion {
        output.warning(format!("Imagery unavailable ({}); synthetic fill installed", reason));
    }

    let result = OverlayOutput {
        field_id: args.field_id,
        completion,
        state,
        layers,
        fitted_bounds,
    };

    if output.is_json() {
        return output.result(result);
    }

    let outcome = match &result.completion {
        Completion::Loaded => "imagery",
        Completion::Fallback { .. } => "synthetic gradient",
        Completion::Stale => "stale (discarded)",
        Completion::Cleared => "cleared",
    };
    output.success(format!("Overlay for field {}: {}", result.field_id, outcome));

    #[derive(Tabled)]
    struct LayerRow {
        #[tabled(rename = "Layer")]
        id: String,
        #[tabled(rename = "Type")]
        kind: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    output.section("Installed Layers");
    output.table(
        result
            .layers
            .iter()
            .map(|layer| LayerRow {
                id: layer.id.clone(),
                kind: format!("{:?}", layer.kind).to_lowercase(),
                source: layer.source.clone(),
            })
            .collect(),
    );

    if let Some(bbox) = result.fitted_bounds {
        let [min_lng, min_lat, max_lng, max_lat] = bbox.to_array();
        output.kv(
            "Fitted bounds",
            format!("{:.6}, {:.6} → {:.6}, {:.6}", min_lng, min_lat, max_lng, max_lat),
        );
    }
    Ok(())
}
