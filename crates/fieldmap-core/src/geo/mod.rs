//! Geometry utilities for field boundaries
//!
//! Bounding boxes, planar and geodesic area, and ring normalization.

pub mod area;
pub mod bbox;
pub mod ring;

pub use area::{
    approximation_check, area_hectares, geodesic_area_hectares, planar_area_m2,
    ApproximationCheck,
};
pub use bbox::bounding_box_of;
pub use ring::{
    normalize_ring, normalize_ring_lenient, ring_points, NormalizedRing, RawCoordinate, RingPoints,
};
