use std::env;

use fieldmap_core::config::{LayeredConfig, OverlaySettings};

pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Optional TOML file layered under the `FIELDMAP_*` overlay variables
    pub config_file: Option<String>,
    pub overlay: OverlaySettings,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("FIELDMAP_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT);

        let cors_origin =
            env::var("FIELDMAP_CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let config_file = env::var("FIELDMAP_CONFIG").ok();

        let mut layered = LayeredConfig::with_defaults();
        if let Some(path) = &config_file {
            match layered.clone().load_from_file(path) {
                Ok(loaded) => layered = loaded,
                Err(e) => tracing::warn!(path = %path, error = %e, "Ignoring config file"),
            }
        }
        let overlay = layered.load_from_env().overlay_settings();

        Self { port, cors_origin, config_file, overlay }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
