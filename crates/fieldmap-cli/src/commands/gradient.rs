use crate::cli::GradientArgs;
use crate::output::OutputWriter;
use crate::output_types::RasterOutput;
use anyhow::{Context, Result};
use fieldmap_core::config::LayeredConfig;
use fieldmap_raster::{ClippedRaster, GradientGenerator};
use std::path::Path;

use super::load_boundary;

pub fn execute(args: GradientArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let settings = config.overlay_settings();
    let boundary = load_boundary(&args.path)?;
    let ndvi = args.ndvi.unwrap_or(settings.default_ndvi);

    let raster = GradientGenerator::new(settings.render_size).gradient_for(
        ndvi,
        &boundary,
        &boundary.bounding_box(),
    );
    let result = write_raster(&raster, &args.out, "gradient", None)?;

    report(output, result)
}

/// Encode `raster` as PNG at `path` and describe it
pub(crate) fn write_raster(
    raster: &ClippedRaster,
    path: &Path,
    source: &str,
    reason: Option<String>,
) -> Result<RasterOutput> {
    let png = raster.to_png()?;
    std::fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), visible = raster.visible_pixels(), "Raster written");

    Ok(RasterOutput {
        path: path.display().to_string(),
        width: raster.width(),
        height: raster.height(),
        visible_pixels: raster.visible_pixels(),
        source: source.to_string(),
        reason,
        corners: raster.bbox().image_corners(),
    })
}

pub(crate) fn report(output: &OutputWriter, result: RasterOutput) -> Result<()> {
    if output.is_json() {
        return output.result(result);
    }

    output.success(format!("Wrote {}", result.path));
    output.kv("Size", format!("{} × {} px", result.width, result.height));
    output.kv("Visible pixels", result.visible_pixels);
    output.kv("Fill", &result.source);
    let [top_left, _, bottom_right, _] = result.corners;
    output.kv(
        "Placement",
        format!(
            "[{:.6}, {:.6}] → [{:.6}, {:.6}]",
            top_left[0], top_left[1], bottom_right[0], bottom_right[1]
        ),
    );
    Ok(())
}
