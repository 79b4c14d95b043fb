//! Fieldmap Overlay - Per-field raster overlay lifecycle
//!
//! This crate drives the map surface for the selected field: it tears down
//! the previous overlay, requests clipped imagery, falls back to the
//! synthetic gradient and discards results that arrive after the selection
//! moved on.

pub mod handle;
pub mod models;
pub mod orchestrator;
pub mod surface;

pub use handle::OverlayHandle;
pub use models::{Completion, OverlayLayerIds, OverlayRequest, OverlayState};
pub use orchestrator::OverlayOrchestrator;
pub use surface::InMemoryMapSurface;
