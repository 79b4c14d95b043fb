use crate::config_loader::config_file_path;
use crate::output::OutputWriter;
use crate::output_types::{ConfigOutput, ConfigValue};
use anyhow::Result;
use fieldmap_core::config::LayeredConfig;
use std::path::Path;
use tabled::Tabled;

/// Inspect configuration
pub fn execute(explicit: Option<&Path>, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let config_file = config_file_path(explicit).map(|p| p.display().to_string());

    if output.is_json() {
        return output.result(ConfigOutput {
            config_file,
            raster_base_url: ConfigValue {
                value: config.raster_base_url.value.clone(),
                source: format!("{:?}", config.raster_base_url.source),
            },
            palette: ConfigValue {
                value: config.palette.value.clone(),
                source: format!("{:?}", config.palette.source),
            },
            fetch_timeout_ms: ConfigValue {
                value: config.fetch_timeout_ms.value,
                source: format!("{:?}", config.fetch_timeout_ms.source),
            },
            render_size: ConfigValue {
                value: config.render_size.value,
                source: format!("{:?}", config.render_size.source),
            },
            default_ndvi: ConfigValue {
                value: config.default_ndvi.value,
                source: format!("{:?}", config.default_ndvi.source),
            },
        });
    }

    output.section("Configuration Values");

    #[derive(Tabled)]
    struct ConfigRow {
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    let mut rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();

    // Sort by key for consistent output
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    output.table(rows);

    if let Some(path) = config_file {
        output.kv("Config file", path);
    }

    output.section("Configuration Precedence");
    output.info("CLI arguments > Environment variables > Config file > Defaults");

    Ok(())
}
