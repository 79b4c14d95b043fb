use crate::error::{FieldmapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PALETTE: &str = "ndvi";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_RENDER_SIZE: u32 = 512;
pub const DEFAULT_NDVI: f64 = 0.5;

// Synthetic canvases are clamped to this range
const MIN_RENDER_SIZE: u32 = 16;
const MAX_RENDER_SIZE: u32 = 4096;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Everything the overlay lifecycle needs, resolved once and passed down
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    /// Raster provider base URL; `None` renders the synthetic fallback only
    pub raster_base_url: Option<String>,
    pub palette: String,
    pub fetch_timeout: Duration,
    /// Longest side of synthetic canvases, in pixels
    pub render_size: u32,
    /// Gradient value for fields without a current reading
    pub default_ndvi: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            raster_base_url: None,
            palette: DEFAULT_PALETTE.to_string(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            render_size: DEFAULT_RENDER_SIZE,
            default_ndvi: DEFAULT_NDVI,
        }
    }
}

/// Layered configuration for Fieldmap
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub raster_base_url: ConfigValue<Option<String>>,
    pub palette: ConfigValue<String>,
    pub fetch_timeout_ms: ConfigValue<u64>,
    pub render_size: ConfigValue<u32>,
    pub default_ndvi: ConfigValue<f64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            raster_base_url: ConfigValue::new(None, ConfigSource::Default),
            palette: ConfigValue::new(DEFAULT_PALETTE.to_string(), ConfigSource::Default),
            fetch_timeout_ms: ConfigValue::new(DEFAULT_FETCH_TIMEOUT_MS, ConfigSource::Default),
            render_size: ConfigValue::new(DEFAULT_RENDER_SIZE, ConfigSource::Default),
            default_ndvi: ConfigValue::new(DEFAULT_NDVI, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FieldmapError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FieldmapError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(url) = file_config.raster_base_url {
            self.raster_base_url.update(Some(parse_base_url(&url)?), ConfigSource::File);
        }

        if let Some(palette) = file_config.palette {
            self.palette.update(palette, ConfigSource::File);
        }

        if let Some(timeout) = file_config.fetch_timeout_ms {
            self.fetch_timeout_ms.update(parse_timeout_ms(timeout)?, ConfigSource::File);
        }

        if let Some(size) = file_config.render_size {
            self.render_size.update(parse_render_size(size)?, ConfigSource::File);
        }

        if let Some(ndvi) = file_config.default_ndvi {
            self.default_ndvi.update(parse_ndvi(ndvi)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // FIELDMAP_RASTER_URL
        if let Ok(url) = env::var("FIELDMAP_RASTER_URL") {
            match parse_base_url(&url) {
                Ok(url) => self.raster_base_url.update(Some(url), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDMAP_RASTER_URL value '{}': expected an http(s) URL",
                    url
                ),
            }
        }

        // FIELDMAP_PALETTE
        if let Ok(palette) = env::var("FIELDMAP_PALETTE") {
            if palette.trim().is_empty() {
                tracing::warn!("Ignoring empty FIELDMAP_PALETTE");
            } else {
                self.palette.update(palette.trim().to_string(), ConfigSource::Environment);
            }
        }

        // FIELDMAP_FETCH_TIMEOUT_MS
        if let Ok(timeout_str) = env::var("FIELDMAP_FETCH_TIMEOUT_MS") {
            match timeout_str.parse::<u64>().ok().and_then(|t| parse_timeout_ms(t).ok()) {
                Some(timeout) => self.fetch_timeout_ms.update(timeout, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid FIELDMAP_FETCH_TIMEOUT_MS value '{}': expected a positive integer",
                    timeout_str
                ),
            }
        }

        // FIELDMAP_RENDER_SIZE
        if let Ok(size_str) = env::var("FIELDMAP_RENDER_SIZE") {
            match size_str.parse::<u32>().ok().and_then(|s| parse_render_size(s).ok()) {
                Some(size) => self.render_size.update(size, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid FIELDMAP_RENDER_SIZE value '{}': expected {}..={} pixels",
                    size_str,
                    MIN_RENDER_SIZE,
                    MAX_RENDER_SIZE
                ),
            }
        }

        // FIELDMAP_DEFAULT_NDVI
        if let Ok(ndvi_str) = env::var("FIELDMAP_DEFAULT_NDVI") {
            match ndvi_str.parse::<f64>().ok().and_then(|v| parse_ndvi(v).ok()) {
                Some(ndvi) => self.default_ndvi.update(ndvi, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid FIELDMAP_DEFAULT_NDVI value '{}': expected a number in [-1, 1]",
                    ndvi_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(url) = overrides.raster_base_url {
            self.raster_base_url.update(Some(url), ConfigSource::Cli);
        }

        if let Some(palette) = overrides.palette {
            self.palette.update(palette, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.fetch_timeout_ms {
            self.fetch_timeout_ms.update(timeout, ConfigSource::Cli);
        }

        if let Some(size) = overrides.render_size {
            self.render_size.update(size, ConfigSource::Cli);
        }

        if let Some(ndvi) = overrides.default_ndvi {
            self.default_ndvi.update(ndvi, ConfigSource::Cli);
        }
    }

    /// Resolve the settings handed to the overlay orchestrator
    pub fn overlay_settings(&self) -> OverlaySettings {
        OverlaySettings {
            raster_base_url: self.raster_base_url.value.clone(),
            palette: self.palette.value.clone(),
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms.value),
            render_size: self.render_size.value,
            default_ndvi: self.default_ndvi.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "raster_base_url".to_string(),
            (
                self.raster_base_url.value.clone().unwrap_or_else(|| "(none)".to_string()),
                self.raster_base_url.source,
            ),
        );

        map.insert("palette".to_string(), (self.palette.value.clone(), self.palette.source));

        map.insert(
            "fetch_timeout_ms".to_string(),
            (format!("{} ms", self.fetch_timeout_ms.value), self.fetch_timeout_ms.source),
        );

        map.insert(
            "render_size".to_string(),
            (format!("{} px", self.render_size.value), self.render_size.source),
        );

        map.insert(
            "default_ndvi".to_string(),
            (format!("{:.2}", self.default_ndvi.value), self.default_ndvi.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    raster_base_url: Option<String>,
    palette: Option<String>,
    fetch_timeout_ms: Option<u64>,
    render_size: Option<u32>,
    default_ndvi: Option<f64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub raster_base_url: Option<String>,
    pub palette: Option<String>,
    pub fetch_timeout_ms: Option<u64>,
    pub render_size: Option<u32>,
    pub default_ndvi: Option<f64>,
}

/// Validate a raster provider base URL, dropping any trailing slash
pub fn parse_base_url(s: &str) -> Result<String> {
    let trimmed = s.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(FieldmapError::ConfigInvalid {
            key: "raster_base_url".to_string(),
            reason: format!("Invalid URL: {}. Expected http:// or https://", s),
        })
    }
}

pub fn parse_timeout_ms(ms: u64) -> Result<u64> {
    if ms == 0 {
        return Err(FieldmapError::ConfigInvalid {
            key: "fetch_timeout_ms".to_string(),
            reason: "Timeout must be greater than zero".to_string(),
        });
    }
    Ok(ms)
}

pub fn parse_render_size(size: u32) -> Result<u32> {
    if !(MIN_RENDER_SIZE..=MAX_RENDER_SIZE).contains(&size) {
        return Err(FieldmapError::ConfigInvalid {
            key: "render_size".to_string(),
            reason: format!(
                "Render size {} out of range {}..={}",
                size, MIN_RENDER_SIZE, MAX_RENDER_SIZE
            ),
        });
    }
    Ok(size)
}

pub fn parse_ndvi(value: f64) -> Result<f64> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(FieldmapError::ConfigInvalid {
            key: "default_ndvi".to_string(),
            reason: format!("NDVI {} outside [-1, 1]", value),
        });
    }
    Ok(value)
}
