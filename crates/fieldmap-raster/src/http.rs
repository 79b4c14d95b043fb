use std::time::Duration;

use async_trait::async_trait;
use fieldmap_core::error::{FieldmapError, Result};
use fieldmap_core::models::FieldId;

use crate::ports::RasterSource;

/// Raster provider reached over HTTP
pub struct HttpRasterSource {
    /// HTTP client
    client: reqwest::Client,
}

impl HttpRasterSource {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }

    /// Client with a transport-level timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            FieldmapError::ConfigInvalid {
                key: "fetch_timeout_ms".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            }
        })?;
        Ok(Self { client })
    }
}

impl Default for HttpRasterSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RasterSource for HttpRasterSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            FieldmapError::raster_unavailable(format!("request to {} failed: {}", url, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(FieldmapError::raster_unavailable(format!(
                "provider returned {} for {}",
                status, url
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            FieldmapError::raster_unavailable(format!("failed to read response body: {}", e))
        })?;

        if bytes.is_empty() {
            return Err(FieldmapError::raster_unavailable("provider returned an empty body"));
        }

        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Provider URL for a field's NDVI image: `{base}/fields/{id}/ndvi.png?palette=...`
pub fn field_raster_url(base: &str, field_id: &FieldId, palette: &str) -> Result<String> {
    let invalid = |reason: String| FieldmapError::ConfigInvalid {
        key: "raster_base_url".to_string(),
        reason,
    };

    let mut url = reqwest::Url::parse(base).map_err(|e| invalid(format!("{}: {}", base, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| invalid(format!("{} cannot be used as a base URL", base)))?;
        segments.pop_if_empty().extend(["fields", field_id.as_str(), "ndvi.png"]);
    }
    url.query_pairs_mut().append_pair("palette", palette);

    Ok(url.to_string())
}
