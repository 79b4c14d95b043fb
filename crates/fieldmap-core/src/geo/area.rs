//! Field area measurement.
//!
//! The working method projects the ring onto a local tangent plane anchored
//! at its first vertex (equirectangular approximation) and applies the
//! shoelace formula. It is accurate to well under 1% for field-sized rings
//! at low and mid latitudes. [`geodesic_area_hectares`] is the ellipsoidal
//! reference for anything larger.

use ::geo::{Coord, GeodesicArea, LineString, Polygon};

use crate::models::{Boundary, GeoPoint};

pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Extent beyond which the planar approximation is no longer trusted
pub const MAX_PLANAR_EXTENT_M: f64 = 10_000.0;

/// Latitude beyond which the planar approximation is no longer trusted
pub const MAX_PLANAR_ABS_LAT: f64 = 60.0;

// Rings enclosing less than this are treated as having no area at all.
const DEGENERATE_AREA_M2: f64 = 1e-4;

/// Length of one degree of latitude at `lat` degrees, in meters
pub fn meters_per_degree_lat(lat: f64) -> f64 {
    let phi = lat.to_radians();
    111_132.92 - 559.82 * (2.0 * phi).cos() + 1.175 * (4.0 * phi).cos()
}

/// Length of one degree of longitude at `lat` degrees, in meters
pub fn meters_per_degree_lng(lat: f64) -> f64 {
    let phi = lat.to_radians();
    111_412.84 * phi.cos() - 93.5 * (3.0 * phi).cos()
}

/// Project a ring to local planar meters around its first vertex
pub fn project_local(points: &[GeoPoint]) -> Vec<(f64, f64)> {
    let Some(origin) = points.first() else {
        return Vec::new();
    };
    let kx = meters_per_degree_lng(origin.lat);
    let ky = meters_per_degree_lat(origin.lat);

    points.iter().map(|p| ((p.lng - origin.lng) * kx, (p.lat - origin.lat) * ky)).collect()
}

/// Planar area of an implicitly closed ring in square meters.
///
/// Winding does not matter. Fewer than three vertices or a ring with no
/// enclosed area yields `0.0`.
pub fn planar_area_m2(points: &[GeoPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let projected = project_local(points);
    let n = projected.len();
    let twice_signed: f64 = (0..n)
        .map(|i| {
            let (x0, y0) = projected[i];
            let (x1, y1) = projected[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum();

    let area = twice_signed.abs() / 2.0;
    if !area.is_finite() || area < DEGENERATE_AREA_M2 {
        0.0
    } else {
        area
    }
}

/// Planar area of a ring in hectares
pub fn area_hectares(points: &[GeoPoint]) -> f64 {
    planar_area_m2(points) / SQUARE_METERS_PER_HECTARE
}

/// Ellipsoidal (WGS84) area of a boundary in hectares
pub fn geodesic_area_hectares(boundary: &Boundary) -> f64 {
    let coords: Vec<Coord> =
        boundary.closed_lng_lat_ring().into_iter().map(|[x, y]| Coord { x, y }).collect();
    let polygon = Polygon::new(LineString::new(coords), vec![]);
    polygon.geodesic_area_unsigned() / SQUARE_METERS_PER_HECTARE
}

/// How far a boundary sits from the planar method's validity range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximationCheck {
    /// Longest side of the bounding box, in meters
    pub max_extent_m: f64,
    /// Largest absolute latitude of any vertex
    pub max_abs_lat: f64,
}

impl ApproximationCheck {
    pub fn within_validity_range(&self) -> bool {
        self.max_extent_m <= MAX_PLANAR_EXTENT_M && self.max_abs_lat <= MAX_PLANAR_ABS_LAT
    }
}

pub fn approximation_check(boundary: &Boundary) -> ApproximationCheck {
    let bbox = boundary.bounding_box();
    let mid_lat = bbox.center().lat;
    let width_m = bbox.width() * meters_per_degree_lng(mid_lat);
    let height_m = bbox.height() * meters_per_degree_lat(mid_lat);
    let max_abs_lat = bbox.min_lat.abs().max(bbox.max_lat.abs());

    ApproximationCheck { max_extent_m: width_m.max(height_m), max_abs_lat }
}
