use std::sync::Arc;
use std::time::Duration;

use fieldmap_core::error::{FieldmapError, Result};
use fieldmap_core::models::FieldRecord;
use fieldmap_core::ports::MapSurface;
use fieldmap_raster::{ClippedRaster, RasterClipper, RasterSource};
use tokio::sync::Mutex;

use crate::models::{Completion, OverlayRequest, OverlayState};
use crate::orchestrator::OverlayOrchestrator;

/// Shared driver around an [`OverlayOrchestrator`].
///
/// The surface lock is held for teardown and for installation only; it is
/// released while the raster is in flight so a newer selection can proceed.
pub struct OverlayHandle<M, S>
where
    M: MapSurface + Send,
    S: RasterSource,
{
    orchestrator: Arc<Mutex<OverlayOrchestrator<M>>>,
    clipper: Arc<RasterClipper<S>>,
    fetch_timeout: Duration,
}

impl<M, S> Clone for OverlayHandle<M, S>
where
    M: MapSurface + Send,
    S: RasterSource,
{
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            clipper: Arc::clone(&self.clipper),
            fetch_timeout: self.fetch_timeout,
        }
    }
}

impl<M, S> OverlayHandle<M, S>
where
    M: MapSurface + Send,
    S: RasterSource,
{
    pub fn new(orchestrator: OverlayOrchestrator<M>, clipper: RasterClipper<S>) -> Self {
        let fetch_timeout = orchestrator.settings().fetch_timeout;
        Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            clipper: Arc::new(clipper),
            fetch_timeout,
        }
    }

    /// Select `field` and run its overlay to completion
    pub async fn show_field(&self, field: &FieldRecord) -> Result<Completion> {
        let request = self.orchestrator.lock().await.select(field);
        let Some(request) = request else {
            return Ok(Completion::Cleared);
        };

        let fetched = self.fetch(&request).await;
        self.orchestrator.lock().await.complete(request, fetched)
    }

    async fn fetch(&self, request: &OverlayRequest) -> Result<ClippedRaster> {
        let Some(url) = request.url.as_deref() else {
            return Err(FieldmapError::raster_unavailable("no raster provider configured"));
        };

        let clip = self.clipper.clip_to_polygon(url, &request.boundary, &request.bbox);
        match tokio::time::timeout(self.fetch_timeout, clip).await {
            Ok(result) => result,
            Err(_) => Err(FieldmapError::raster_unavailable(format!(
                "no response within {} ms",
                self.fetch_timeout.as_millis()
            ))),
        }
    }

    pub async fn state(&self) -> OverlayState {
        self.orchestrator.lock().await.state().clone()
    }

    /// Run `f` against the surface under the lock
    pub async fn with_surface<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        let orchestrator = self.orchestrator.lock().await;
        f(orchestrator.surface())
    }
}
