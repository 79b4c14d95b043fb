//! Error types for Fieldmap

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldmapError {
    // Geometry errors
    #[error("Invalid boundary: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Unsupported coordinate format at vertex {index}: {reason}")]
    UnsupportedCoordinateFormat { index: usize, reason: String },

    // Import errors
    #[error("{reason}")]
    MalformedSource { reason: String },

    // Rendering errors
    #[error("Raster unavailable: {reason}")]
    RasterUnavailable { reason: String },

    // Map surface errors
    #[error("Map surface rejected {id}: {reason}")]
    Surface { id: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FieldmapError {
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry { reason: reason.into() }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSource { reason: reason.into() }
    }

    pub fn raster_unavailable(reason: impl Into<String>) -> Self {
        Self::RasterUnavailable { reason: reason.into() }
    }

    /// True for failures the overlay lifecycle absorbs through the synthetic fallback
    pub fn is_recoverable_render_error(&self) -> bool {
        matches!(self, Self::RasterUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, FieldmapError>;
