//! Fieldmap Core - Domain models, geometry, NDVI scale and configuration
//!
//! This crate contains the pure domain logic of Fieldmap: boundary validation,
//! area measurement, the cadastral importer, the NDVI color scale, agronomic
//! metrics and the port definitions the overlay drives.

pub mod config;
pub mod error;
pub mod formats;
pub mod geo;
pub mod metrics;
pub mod models;
pub mod ndvi;
pub mod ports;

pub use error::{FieldmapError, Result};
