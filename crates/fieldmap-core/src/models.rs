pub mod field;
pub mod geometry;

pub use field::{FieldId, FieldRecord};
pub use geometry::{Boundary, BoundingBox, GeoPoint, MIN_SPAN_DEGREES};
