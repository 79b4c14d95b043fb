use crate::error::{FieldmapError, Result};
use crate::models::{BoundingBox, GeoPoint};

/// Bounding box of a ring, recomputed from its vertices on every call.
///
/// Fails with `InvalidGeometry` when fewer than three vertices are given.
pub fn bounding_box_of(points: &[GeoPoint]) -> Result<BoundingBox> {
    if points.len() < 3 {
        return Err(FieldmapError::invalid_geometry(format!(
            "bounding box needs at least 3 points, found {}",
            points.len()
        )));
    }
    BoundingBox::enclosing(points)
        .ok_or_else(|| FieldmapError::invalid_geometry("bounding box of an empty ring"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_of_ring() {
        let points = vec![
            GeoPoint::new(-3.0, 10.0),
            GeoPoint::new(-1.0, 12.0),
            GeoPoint::new(-2.0, 11.5),
        ];
        let bbox = bounding_box_of(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(10.0, 12.0, -3.0, -1.0));
        assert!(points.iter().all(|p| bbox.contains(p)));
    }

    #[test]
    fn test_bounding_box_matches_geo_rect() {
        let points = vec![
            GeoPoint::new(-15.0, -47.0),
            GeoPoint::new(-14.9, -46.8),
            GeoPoint::new(-15.2, -46.9),
            GeoPoint::new(-14.95, -47.1),
        ];
        let bbox = bounding_box_of(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(-47.1, -46.8, -15.2, -14.9));
        assert_eq!(bbox.image_corners()[0], [-47.1, -14.9]);
        assert_eq!(bbox.image_corners()[2], [-46.8, -15.2]);
    }

    #[test]
    fn test_bounding_box_of_short_ring_fails() {
        let points = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)];
        assert!(matches!(
            bounding_box_of(&points),
            Err(FieldmapError::InvalidGeometry { .. })
        ));
    }
}
