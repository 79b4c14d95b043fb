//! Local raster sources: files on disk and in-memory images

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use fieldmap_core::error::{FieldmapError, Result};

use crate::ports::RasterSource;

/// Reads rasters from the local filesystem; `file://` prefixes are accepted
#[derive(Debug, Clone, Default)]
pub struct FileRasterSource {
    root: Option<PathBuf>,
}

impl FileRasterSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = PathBuf::from(location.strip_prefix("file://").unwrap_or(location));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

#[async_trait]
impl RasterSource for FileRasterSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.resolve(url);
        tokio::fs::read(&path).await.map_err(|e| {
            FieldmapError::raster_unavailable(format!("cannot read {}: {}", path.display(), e))
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Serves preloaded images keyed by URL
#[derive(Debug, Clone, Default)]
pub struct MemoryRasterSource {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryRasterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.images.insert(url.into(), bytes);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(url.into(), bytes);
    }
}

#[async_trait]
impl RasterSource for MemoryRasterSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| FieldmapError::raster_unavailable(format!("no raster at {}", url)))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
