use std::sync::Arc;

use fieldmap_core::config::OverlaySettings;
use fieldmap_raster::{HttpRasterSource, RasterSource};

#[derive(Clone)]
pub struct AppState {
    pub settings: OverlaySettings,
    pub raster_source: Arc<dyn RasterSource>,
}

impl AppState {
    pub fn new(settings: OverlaySettings, raster_source: Arc<dyn RasterSource>) -> Self {
        Self { settings, raster_source }
    }

    /// State backed by the HTTP raster provider
    pub fn with_http_source(settings: OverlaySettings) -> fieldmap_core::Result<Self> {
        let source = HttpRasterSource::with_timeout(settings.fetch_timeout)?;
        Ok(Self::new(settings, Arc::new(source)))
    }
}
