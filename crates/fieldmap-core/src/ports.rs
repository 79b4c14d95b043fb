//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod map_surface;

pub use map_surface::{LayerKind, LayerSpec, MapSurface, SourceSpec};
