use crate::cli::ClipArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use fieldmap_core::config::LayeredConfig;
use fieldmap_core::error::FieldmapError;
use fieldmap_core::models::{Boundary, BoundingBox};
use fieldmap_raster::{
    ClippedRaster, FileRasterSource, GradientGenerator, HttpRasterSource, RasterClipper,
    RasterSource,
};
use std::time::Duration;

use super::gradient::{report, write_raster};
use super::load_boundary;

pub async fn execute(args: ClipArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let settings = config.overlay_settings();
    let boundary = load_boundary(&args.path)?;
    let bbox = boundary.bounding_box();

    let fetched = if args.url.starts_with("http://") || args.url.starts_with("https://") {
        let source = HttpRasterSource::with_timeout(settings.fetch_timeout)?;
        clip_with(source, &args.url, &boundary, &bbox, settings.fetch_timeout).await
    } else {
        clip_with(FileRasterSource::new(), &args.url, &boundary, &bbox, settings.fetch_timeout)
            .await
    };

    let result = match fetched {
        Ok(raster) => write_raster(&raster, &args.out, "clipped", None)?,
        Err(e) if e.is_recoverable_render_error() => {
            output.warning(format!("{}; writing the synthetic gradient instead", e));
            let ndvi = args.ndvi.unwrap_or(settings.default_ndvi);
            let raster =
                GradientGenerator::new(settings.render_size).gradient_for(ndvi, &boundary, &bbox);
            write_raster(&raster, &args.out, "fallback", Some(e.to_string()))?
        }
        Err(e) => return Err(e.into()),
    };

    report(output, result)
}

async fn clip_with<S: RasterSource>(
    source: S,
    url: &str,
    boundary: &Boundary,
    bbox: &BoundingBox,
    timeout: Duration,
) -> fieldmap_core::Result<ClippedRaster> {
    tracing::info!(source = source.name(), url, "Clipping raster to boundary");
    let clipper = RasterClipper::new(source);
    match tokio::time::timeout(timeout, clipper.clip_to_polygon(url, boundary, bbox)).await {
        Ok(result) => result,
        Err(_) => Err(FieldmapError::raster_unavailable(format!(
            "no response within {} ms",
            timeout.as_millis()
        ))),
    }
}
