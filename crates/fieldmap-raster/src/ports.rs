//! Raster port definitions

use std::sync::Arc;

use async_trait::async_trait;
use fieldmap_core::error::Result;

/// Port for acquiring encoded raster bytes
///
/// Implementations report every failure (transport, status, missing image)
/// as `RasterUnavailable`; decoding is left to the caller.
#[async_trait]
pub trait RasterSource: Send + Sync {
    /// Fetch the encoded image behind `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: RasterSource + ?Sized> RasterSource for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
