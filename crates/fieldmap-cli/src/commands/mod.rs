//! Command implementations

mod area;
mod clip;
mod config;
mod gdd;
mod gradient;
mod import;
mod ndvi;
mod overlay;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::errors::{boundary_unreadable, invalid_config};
use crate::output::OutputWriter;
use anyhow::Result;
use fieldmap_core::formats::import_parcel;
use fieldmap_core::geo::normalize_ring;
use fieldmap_core::models::Boundary;
use std::path::Path;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let Cli { json, config: config_path, overrides, command } = cli;
    let output = OutputWriter::new(json);
    let resolve = || {
        load_config(config_path.as_deref(), &overrides)
            .map_err(|e| anyhow::Error::from(invalid_config(&format!("{:#}", e))))
    };

    match command {
        Commands::Import(args) => import::execute(args, &output),
        Commands::Area(args) => area::execute(args, &output),
        Commands::Color(args) => ndvi::color(args, &output),
        Commands::Legend => ndvi::legend(&output),
        Commands::Gradient(args) => gradient::execute(args, &resolve()?, &output),
        Commands::Clip(args) => clip::execute(args, &resolve()?, &output).await,
        Commands::Overlay(args) => overlay::execute(args, &resolve()?, &output).await,
        Commands::Gdd(args) => gdd::execute(args, &output),
        Commands::Config => config::execute(config_path.as_deref(), &resolve()?, &output),
    }
}

/// Read a boundary from cadastral GeoJSON or a bare JSON array of vertices
pub(crate) fn load_boundary(path: &Path) -> Result<Boundary> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| boundary_unreadable(path, &format!("could not read file: {}", e)))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| boundary_unreadable(path, &format!("not valid JSON: {}", e)))?;

    let boundary = match value {
        serde_json::Value::Array(entries) => normalize_ring(&entries),
        _ => import_parcel(&text).map(|parcel| parcel.boundary),
    };
    boundary.map_err(|e| boundary_unreadable(path, &e.to_string()).into())
}
