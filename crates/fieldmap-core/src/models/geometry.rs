//! Canonical boundary types used across all fieldmap crates.
//!
//! A [`Boundary`] is the exterior ring of a field. The ring is stored open
//! (the closing vertex is never repeated) and every consumer treats it as
//! implicitly closed, wrapping from the last vertex back to the first.

use ::geo::{BoundingRect, MultiPoint, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{FieldmapError, Result};
use crate::geo::area;

/// Smallest span, in degrees, used when a bounding box collapses on an axis
pub const MIN_SPAN_DEGREES: f64 = 1e-9;

/// A WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a GeoJSON-ordered `[lng, lat]` position
    pub fn from_lng_lat(position: [f64; 2]) -> Self {
        Self { lat: position[1], lng: position[0] }
    }

    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Exterior ring of a field, validated at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GeoPoint>", into = "Vec<GeoPoint>")]
pub struct Boundary {
    points: Vec<GeoPoint>,
}

impl Boundary {
    /// Validate a ring and store it open.
    ///
    /// A trailing copy of the first vertex is dropped. Rings with fewer than
    /// three distinct vertices, coordinates outside the WGS84 range, or no
    /// enclosed area are rejected with `InvalidGeometry`.
    pub fn new(mut points: Vec<GeoPoint>) -> Result<Self> {
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        if points.len() < 3 {
            return Err(FieldmapError::invalid_geometry(format!(
                "boundary needs at least 3 points, found {}",
                points.len()
            )));
        }

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(FieldmapError::invalid_geometry(format!(
                "vertex {} has non-finite coordinates",
                index
            )));
        }

        if let Some(index) =
            points.iter().position(|p| p.lat.abs() > 90.0 || p.lng.abs() > 180.0)
        {
            return Err(FieldmapError::invalid_geometry(format!(
                "vertex {} ({}, {}) is outside the WGS84 range",
                index, points[index].lat, points[index].lng
            )));
        }

        if area::planar_area_m2(&points) == 0.0 {
            return Err(FieldmapError::invalid_geometry(
                "boundary is degenerate (collinear or coincident points)",
            ));
        }

        Ok(Self { points })
    }

    /// Build from GeoJSON-ordered `[lng, lat]` positions
    pub fn from_lng_lat(positions: &[[f64; 2]]) -> Result<Self> {
        Self::new(positions.iter().copied().map(GeoPoint::from_lng_lat).collect())
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ring edges, including the closing edge from the last vertex to the first
    pub fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        // A boundary always holds at least three vertices
        BoundingBox::enclosing(&self.points).unwrap_or_default()
    }

    /// Planar area in hectares, see [`crate::geo::area_hectares`]
    pub fn area_hectares(&self) -> f64 {
        area::area_hectares(&self.points)
    }

    /// Same ring with the opposite winding, still starting at the first vertex
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points[1..].reverse();
        Self { points }
    }

    /// `[lng, lat]` positions with the first vertex repeated at the end
    pub fn closed_lng_lat_ring(&self) -> Vec<[f64; 2]> {
        let mut ring: Vec<[f64; 2]> = self.points.iter().map(|p| p.to_lng_lat()).collect();
        ring.push(self.points[0].to_lng_lat());
        ring
    }

    /// GeoJSON polygon feature, used as the outline layer source
    pub fn to_geojson_feature(&self) -> geojson::Feature {
        let ring: Vec<Vec<f64>> =
            self.closed_lng_lat_ring().into_iter().map(|[lng, lat]| vec![lng, lat]).collect();
        let geometry = geojson::Geometry::new(geojson::Value::Polygon(vec![ring]));
        geojson::Feature::from(geometry)
    }
}

impl TryFrom<Vec<GeoPoint>> for Boundary {
    type Error = FieldmapError;

    fn try_from(points: Vec<GeoPoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Boundary> for Vec<GeoPoint> {
    fn from(boundary: Boundary) -> Self {
        boundary.points
    }
}

/// Axis-aligned lat/lng rectangle derived from a boundary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_lng: rect.min().x,
            max_lng: rect.max().x,
            min_lat: rect.min().y,
            max_lat: rect.max().y,
        }
    }
}

impl BoundingBox {
    pub fn new(min_lng: f64, max_lng: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lng: min_lng.min(max_lng),
            max_lng: min_lng.max(max_lng),
            min_lat: min_lat.min(max_lat),
            max_lat: min_lat.max(max_lat),
        }
    }

    /// Rectangle enclosing `points`, `None` for an empty slice
    pub(crate) fn enclosing(points: &[GeoPoint]) -> Option<Self> {
        let multi: MultiPoint<f64> = points.iter().map(|p| Point::new(p.lng, p.lat)).collect();
        multi.bounding_rect().map(Self::from)
    }

    pub fn width(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span, never smaller than [`MIN_SPAN_DEGREES`]
    pub fn span_lng(&self) -> f64 {
        self.width().max(MIN_SPAN_DEGREES)
    }

    /// Latitude span, never smaller than [`MIN_SPAN_DEGREES`]
    pub fn span_lat(&self) -> f64 {
        self.height().max(MIN_SPAN_DEGREES)
    }

    /// True when the box has no area on at least one axis
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lng >= self.min_lng
            && point.lng <= self.max_lng
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.min_lat + self.max_lat) / 2.0, (self.min_lng + self.max_lng) / 2.0)
    }

    /// Corner quad placing an image on the map: top-left, top-right,
    /// bottom-right, bottom-left, each as `[lng, lat]`.
    ///
    /// Real and synthetic fills are both positioned through this quad.
    pub fn image_corners(&self) -> [[f64; 2]; 4] {
        [
            [self.min_lng, self.max_lat],
            [self.max_lng, self.max_lat],
            [self.max_lng, self.min_lat],
            [self.min_lng, self.min_lat],
        ]
    }

    /// GeoJSON bbox order `[min_lng, min_lat, max_lng, max_lat]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(-15.0, -47.0),
            GeoPoint::new(-15.0, -46.99),
            GeoPoint::new(-14.99, -46.99),
            GeoPoint::new(-14.99, -47.0),
        ]
    }

    #[test]
    fn test_closing_vertex_is_stripped() {
        let mut closed = square();
        closed.push(closed[0]);
        let boundary = Boundary::new(closed).unwrap();
        assert_eq!(boundary.len(), 4);
        assert_eq!(boundary, Boundary::new(square()).unwrap());
    }

    #[test]
    fn test_rejects_two_points() {
        let err = Boundary::new(square()[..2].to_vec()).unwrap_err();
        assert!(matches!(err, FieldmapError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_rejects_closed_triangle_of_two_distinct_points() {
        let points = vec![GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 2.0), GeoPoint::new(1.0, 1.0)];
        assert!(Boundary::new(points).is_err());
    }

    #[test]
    fn test_rejects_collinear_ring() {
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.001),
            GeoPoint::new(0.002, 0.002),
        ];
        let err = Boundary::new(points).unwrap_err();
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut points = square();
        points[1].lng = f64::NAN;
        assert!(Boundary::new(points).is_err());
    }

    #[test]
    fn test_edges_wrap_around() {
        let boundary = Boundary::new(square()).unwrap();
        let edges: Vec<_> = boundary.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].0, boundary.points()[3]);
        assert_eq!(edges[3].1, boundary.points()[0]);
    }

    #[test]
    fn test_bounding_box_and_corners() {
        let bbox = Boundary::new(square()).unwrap().bounding_box();
        assert_eq!(bbox.min_lng, -47.0);
        assert_eq!(bbox.max_lng, -46.99);
        assert_eq!(bbox.min_lat, -15.0);
        assert_eq!(bbox.max_lat, -14.99);
        assert_eq!(bbox.image_corners()[0], [-47.0, -14.99]);
        assert_eq!(bbox.image_corners()[2], [-46.99, -15.0]);
        assert!(!bbox.is_degenerate());
    }

    #[test]
    fn test_degenerate_bbox_spans_are_positive() {
        let bbox = BoundingBox::new(10.0, 10.0, 5.0, 5.0);
        assert!(bbox.is_degenerate());
        assert_eq!(bbox.span_lng(), MIN_SPAN_DEGREES);
        assert_eq!(bbox.span_lat(), MIN_SPAN_DEGREES);
    }

    #[test]
    fn test_serde_goes_through_validation() {
        let json = r#"[{"lat":0.0,"lng":0.0},{"lat":1.0,"lng":1.0}]"#;
        assert!(serde_json::from_str::<Boundary>(json).is_err());

        let boundary = Boundary::new(square()).unwrap();
        let json = serde_json::to_string(&boundary).unwrap();
        let back: Boundary = serde_json::from_str(&json).unwrap();
        assert_eq!(boundary, back);
    }

    #[test]
    fn test_geojson_outline_is_closed_polygon() {
        let feature = Boundary::new(square()).unwrap().to_geojson_feature();
        match feature.geometry.map(|g| g.value) {
            Some(geojson::Value::Polygon(rings)) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0].first(), rings[0].last());
            }
            other => panic!("Expected Polygon geometry, got {:?}", other),
        }
    }
}
