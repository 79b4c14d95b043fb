//! Coordinate ring normalization.
//!
//! Sources encode vertices in several shapes: GeoJSON `[lng, lat]` pairs,
//! `{lat, lng}` objects from drawing tools, and `{latitude, longitude}`
//! objects from device geolocation. Every entry is classified once into a
//! [`RawCoordinate`] and the ring is built from the classified values.

use serde_json::Value;

use crate::error::{FieldmapError, Result};
use crate::models::{Boundary, GeoPoint};

/// One vertex as found in a source document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawCoordinate {
    /// GeoJSON position, any trailing altitude is ignored
    LngLatPair { lng: f64, lat: f64 },
    LatLngObject { lat: f64, lng: f64 },
    LatitudeLongitudeObject { latitude: f64, longitude: f64 },
    /// A pair or object of a known shape whose contents are unusable
    Malformed,
    /// Not a shape any encoding uses
    Unsupported { found: &'static str },
}

impl RawCoordinate {
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                match (items.first().and_then(number), items.get(1).and_then(number)) {
                    (Some(lng), Some(lat)) => Self::LngLatPair { lng, lat },
                    _ => Self::Malformed,
                }
            }
            Value::Object(map) => {
                let field = |key: &str| map.get(key).and_then(number);
                if let (Some(lat), Some(lng)) = (field("lat"), field("lng")) {
                    Self::LatLngObject { lat, lng }
                } else if let (Some(latitude), Some(longitude)) =
                    (field("latitude"), field("longitude"))
                {
                    Self::LatitudeLongitudeObject { latitude, longitude }
                } else {
                    Self::Malformed
                }
            }
            Value::String(_) => Self::Unsupported { found: "string" },
            Value::Number(_) => Self::Unsupported { found: "number" },
            Value::Bool(_) => Self::Unsupported { found: "boolean" },
            Value::Null => Self::Unsupported { found: "null" },
        }
    }

    /// The vertex this entry describes, if it is well formed
    pub fn to_point(self) -> Option<GeoPoint> {
        match self {
            Self::LngLatPair { lng, lat } => Some(GeoPoint::new(lat, lng)),
            Self::LatLngObject { lat, lng } => Some(GeoPoint::new(lat, lng)),
            Self::LatitudeLongitudeObject { latitude, longitude } => {
                Some(GeoPoint::new(latitude, longitude))
            }
            Self::Malformed | Self::Unsupported { .. } => None,
        }
    }
}

/// Numbers may arrive as JSON numbers or numeric strings
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Vertices read from a ring, before boundary validation
#[derive(Debug, Clone, PartialEq)]
pub struct RingPoints {
    pub points: Vec<GeoPoint>,
    /// Malformed entries that were replaced by `{0, 0}`
    pub coerced: usize,
}

/// Read vertices from raw ring entries.
///
/// Malformed entries fall back to `{0, 0}` so a single bad vertex does not
/// discard the whole ring. Entries of an unsupported shape, or a ring in
/// which no entry is well formed, fail with `UnsupportedCoordinateFormat`.
pub fn ring_points(entries: &[Value]) -> Result<RingPoints> {
    let mut points = Vec::with_capacity(entries.len());
    let mut coerced = 0;

    for (index, entry) in entries.iter().enumerate() {
        let raw = RawCoordinate::classify(entry);
        match raw {
            RawCoordinate::Unsupported { found } => {
                return Err(FieldmapError::UnsupportedCoordinateFormat {
                    index,
                    reason: format!(
                        "expected a [lng, lat] pair or a {{lat, lng}} / {{latitude, longitude}} object, found a {}",
                        found
                    ),
                });
            }
            RawCoordinate::Malformed => {
                tracing::warn!(index, entry = %entry, "Malformed vertex replaced by (0, 0)");
                coerced += 1;
                points.push(GeoPoint::new(0.0, 0.0));
            }
            _ => {
                if let Some(point) = raw.to_point() {
                    points.push(point);
                }
            }
        }
    }

    if !entries.is_empty() && coerced == entries.len() {
        return Err(FieldmapError::UnsupportedCoordinateFormat {
            index: 0,
            reason: "no vertex matches a supported coordinate encoding".to_string(),
        });
    }

    Ok(RingPoints { points, coerced })
}

/// A validated boundary along with the number of coerced vertices
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRing {
    pub boundary: Boundary,
    pub coerced: usize,
}

pub fn normalize_ring_lenient(entries: &[Value]) -> Result<NormalizedRing> {
    let RingPoints { points, coerced } = ring_points(entries)?;
    let boundary = Boundary::new(points)?;
    Ok(NormalizedRing { boundary, coerced })
}

/// Normalize ring entries in any supported encoding into a [`Boundary`]
pub fn normalize_ring(entries: &[Value]) -> Result<Boundary> {
    normalize_ring_lenient(entries).map(|ring| ring.boundary)
}
