//! Clip provider imagery to a field boundary.

use fieldmap_core::error::{FieldmapError, Result};
use fieldmap_core::models::{Boundary, BoundingBox};
use image::RgbaImage;

use crate::mask::PolygonMask;
use crate::ports::RasterSource;
use crate::raster::ClippedRaster;

/// Fetches imagery through a [`RasterSource`] and masks it to a boundary
pub struct RasterClipper<S: RasterSource> {
    source: S,
}

impl<S: RasterSource> RasterClipper<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch `url`, decode it and clear every pixel outside `boundary`.
    ///
    /// The image keeps its natural size and is assumed to cover `bbox`
    /// exactly. All failures come back as `RasterUnavailable`.
    pub async fn clip_to_polygon(
        &self,
        url: &str,
        boundary: &Boundary,
        bbox: &BoundingBox,
    ) -> Result<ClippedRaster> {
        ensure_area(bbox)?;

        tracing::debug!(source = self.source.name(), url, "Fetching raster");
        let bytes = self.source.fetch(url).await?;
        clip_image_bytes(&bytes, boundary, bbox)
    }
}

fn ensure_area(bbox: &BoundingBox) -> Result<()> {
    if bbox.is_degenerate() {
        return Err(FieldmapError::raster_unavailable("bounding box has zero area"));
    }
    Ok(())
}

/// Decode encoded image bytes and mask them
pub fn clip_image_bytes(
    bytes: &[u8],
    boundary: &Boundary,
    bbox: &BoundingBox,
) -> Result<ClippedRaster> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| FieldmapError::raster_unavailable(format!("not a decodable image: {}", e)))?;
    clip_image(decoded.to_rgba8(), boundary, bbox)
}

/// Mask an already decoded image
pub fn clip_image(
    mut image: RgbaImage,
    boundary: &Boundary,
    bbox: &BoundingBox,
) -> Result<ClippedRaster> {
    ensure_area(bbox)?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(FieldmapError::raster_unavailable("image has no pixels"));
    }

    let mask = PolygonMask::new(boundary, bbox, width, height);
    mask.apply(&mut image);
    tracing::debug!(width, height, covered = mask.covered(), "Clipped raster to boundary");

    Ok(ClippedRaster::new(image, *bbox))
}
