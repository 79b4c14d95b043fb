//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use fieldmap_core::config::{
    parse_base_url, parse_ndvi, parse_render_size, parse_timeout_ms, CliConfigOverrides,
    LayeredConfig,
};
use std::path::{Path, PathBuf};

use crate::cli::ConfigArgs;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "fieldmap.toml";

/// Resolve the file layer: the explicit path, else `./fieldmap.toml` if it exists
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
            candidate.is_file().then_some(candidate)
        }
    }
}

/// Build the layered configuration: defaults, file, environment, flags
pub fn load_config(explicit: Option<&Path>, args: &ConfigArgs) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file_path(explicit) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(validated_overrides(args)?);
    Ok(config)
}

/// Flags are checked with the same rules as the file and environment layers
fn validated_overrides(args: &ConfigArgs) -> Result<CliConfigOverrides> {
    Ok(CliConfigOverrides {
        raster_base_url: args.raster_url.as_deref().map(parse_base_url).transpose()?,
        palette: args.palette.clone(),
        fetch_timeout_ms: args.fetch_timeout_ms.map(parse_timeout_ms).transpose()?,
        render_size: args.render_size.map(parse_render_size).transpose()?,
        default_ndvi: args.default_ndvi.map(parse_ndvi).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::config::ConfigSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "palette = \"rdylgn\"\nrender_size = 256").unwrap();

        let args = ConfigArgs { render_size: Some(128), ..Default::default() };
        let config = load_config(Some(file.path()), &args).unwrap();

        assert_eq!(config.palette.source, ConfigSource::File);
        assert_eq!(config.render_size.value, 128);
        assert_eq!(config.render_size.source, ConfigSource::Cli);
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        let args = ConfigArgs { raster_url: Some("ftp://tiles".into()), ..Default::default() };
        assert!(load_config(None, &args).is_err());

        let args = ConfigArgs { default_ndvi: Some(3.0), ..Default::default() };
        assert!(load_config(None, &args).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let args = ConfigArgs::default();
        assert!(load_config(Some(Path::new("/nonexistent/fieldmap.toml")), &args).is_err());
    }
}
