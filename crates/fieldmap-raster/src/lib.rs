//! Fieldmap Raster - Polygon masks, raster clipping and synthetic fills
//!
//! This crate turns a field boundary into a pixel mask and uses it to clip
//! remote NDVI imagery, or to cut out a synthetic gradient when no imagery
//! is available. Both paths share the same mask so they line up exactly.

pub mod clip;
pub mod gradient;
pub mod http;
pub mod mask;
pub mod ports;
pub mod raster;
pub mod source;

pub use clip::{clip_image, clip_image_bytes, RasterClipper};
pub use gradient::{canvas_size_for, GradientGenerator};
pub use http::{field_raster_url, HttpRasterSource};
pub use mask::{PixelMapper, PolygonMask};
pub use ports::RasterSource;
pub use raster::ClippedRaster;
pub use source::{FileRasterSource, MemoryRasterSource};
