//! Property tests for boundary geometry and the NDVI color scale

use fieldmap_core::geo::{area_hectares, bounding_box_of};
use fieldmap_core::models::{Boundary, GeoPoint};
use fieldmap_core::ndvi::{color_for, NdviBand};
use proptest::prelude::*;

/// Star-shaped (hence simple) ring around a center point
fn star_ring() -> impl Strategy<Value = Vec<GeoPoint>> {
    (-60.0..60.0f64, -170.0..170.0f64, prop::collection::vec((0.0..1.0f64, 0.001..0.05f64), 3..12))
        .prop_map(|(lat, lng, spokes)| {
            let n = spokes.len() as f64;
            spokes
                .iter()
                .enumerate()
                .map(|(i, (jitter, radius))| {
                    let angle = (i as f64 + jitter * 0.8) / n * std::f64::consts::TAU;
                    GeoPoint::new(lat + radius * angle.sin(), lng + radius * angle.cos())
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn area_is_invariant_under_winding(points in star_ring()) {
        let boundary = Boundary::new(points);
        prop_assume!(boundary.is_ok());
        let boundary = boundary.unwrap();

        let forward = boundary.area_hectares();
        let backward = boundary.reversed().area_hectares();
        prop_assert!(forward > 0.0);
        prop_assert!((forward - backward).abs() <= forward * 1e-12);
    }

    #[test]
    fn closing_vertex_does_not_change_area(points in star_ring()) {
        let mut closed = points.clone();
        closed.push(points[0]);
        let open = area_hectares(&points);
        prop_assert!((open - area_hectares(&closed)).abs() <= open * 1e-12 + 1e-12);
    }

    #[test]
    fn bounding_box_contains_every_vertex(points in star_ring()) {
        let bbox = bounding_box_of(&points).unwrap();
        prop_assert!(bbox.min_lng <= bbox.max_lng);
        prop_assert!(bbox.min_lat <= bbox.max_lat);
        for p in &points {
            prop_assert!(bbox.contains(p));
        }
    }

    #[test]
    fn color_is_total(value in prop::num::f64::ANY) {
        let color = color_for(value);
        prop_assert!(NdviBand::ALL.iter().any(|band| band.color() == color));
    }

    #[test]
    fn color_is_constant_within_a_band(band_index in 0usize..5, a in 0.0..1.0f64, b in 0.0..1.0f64) {
        let band = NdviBand::ALL[band_index];
        let (min, max) = band.range();
        let at = |t: f64| min + (max - min) * t * 0.999;
        prop_assert_eq!(color_for(at(a)), color_for(at(b)));
        prop_assert_eq!(NdviBand::classify(at(a)), band);
    }
}

#[test]
fn test_color_changes_across_every_band_boundary() {
    for pair in NdviBand::ALL.windows(2) {
        let threshold = pair[1].range().0;
        assert_ne!(color_for(threshold - 1e-9), color_for(threshold));
    }
}

#[test]
fn test_square_kilometer_is_100_hectares_at_several_latitudes() {
    use fieldmap_core::geo::area::{meters_per_degree_lat, meters_per_degree_lng};

    for lat in [-30.0, -12.0, 0.5, 25.0, 45.0] {
        let dlat = 1000.0 / meters_per_degree_lat(lat);
        let dlng = 1000.0 / meters_per_degree_lng(lat);
        let ring = [
            GeoPoint::new(lat, 10.0),
            GeoPoint::new(lat, 10.0 + dlng),
            GeoPoint::new(lat + dlat, 10.0 + dlng),
            GeoPoint::new(lat + dlat, 10.0),
        ];
        let area = area_hectares(&ring);
        assert!((area - 100.0).abs() < 1.0, "lat {}: {} ha", lat, area);
    }
}
