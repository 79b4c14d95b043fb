//! Synthetic NDVI fill used when no imagery can be shown.
//!
//! Colors come from the shared NDVI scale: the band color of the field's
//! reading at the centre, fading to a darker, greyer variant of it at the
//! corners.

use fieldmap_core::config::DEFAULT_RENDER_SIZE;
use fieldmap_core::geo::area::{meters_per_degree_lat, meters_per_degree_lng};
use fieldmap_core::models::{Boundary, BoundingBox};
use fieldmap_core::ndvi::color_for;
use image::{Rgba, RgbaImage};

use crate::mask::PolygonMask;
use crate::raster::ClippedRaster;

const EDGE_DARKEN: f64 = 0.35;
const EDGE_DESATURATE: f64 = 0.45;
const FILL_ALPHA: u8 = 217;

/// Canvas with the bbox's ground aspect ratio and `longest_side` pixels on
/// its longer axis. Falls back to a square when the ratio is not usable.
pub fn canvas_size_for(bbox: &BoundingBox, longest_side: u32) -> (u32, u32) {
    let longest_side = longest_side.max(1);
    let mid_lat = bbox.center().lat;
    let width_m = bbox.span_lng() * meters_per_degree_lng(mid_lat);
    let height_m = bbox.span_lat() * meters_per_degree_lat(mid_lat);

    if !(width_m > 0.0 && height_m > 0.0 && width_m.is_finite() && height_m.is_finite()) {
        return (longest_side, longest_side);
    }

    let scaled = |short: f64, long: f64| {
        ((short / long) * longest_side as f64).round().clamp(1.0, longest_side as f64) as u32
    };
    if width_m >= height_m {
        (longest_side, scaled(height_m, width_m))
    } else {
        (scaled(width_m, height_m), longest_side)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientGenerator {
    longest_side: u32,
}

impl GradientGenerator {
    pub fn new(longest_side: u32) -> Self {
        Self { longest_side: longest_side.max(1) }
    }

    pub fn longest_side(&self) -> u32 {
        self.longest_side
    }

    /// Paint a radial gradient for `ndvi` and cut it to `boundary`.
    ///
    /// Pure and synchronous; there is no failure path.
    pub fn gradient_for(
        &self,
        ndvi: f64,
        boundary: &Boundary,
        bbox: &BoundingBox,
    ) -> ClippedRaster {
        let (width, height) = canvas_size_for(bbox, self.longest_side);
        let center = color_for(ndvi);
        let edge = center.darken(EDGE_DARKEN).desaturate(EDGE_DESATURATE);

        let half_w = width as f64 / 2.0;
        let half_h = height as f64 / 2.0;
        let mut image = RgbaImage::from_fn(width, height, |x, y| {
            let dx = (x as f64 + 0.5 - half_w) / half_w;
            let dy = (y as f64 + 0.5 - half_h) / half_h;
            let t = (dx * dx + dy * dy).sqrt() / std::f64::consts::SQRT_2;
            Rgba(center.mix(edge, t).rgba(FILL_ALPHA))
        });

        let mask = PolygonMask::new(boundary, bbox, width, height);
        mask.apply(&mut image);
        tracing::debug!(ndvi, width, height, color = %center, "Painted synthetic gradient");

        ClippedRaster::new(image, *bbox)
    }
}

impl Default for GradientGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_SIZE)
    }
}
