use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// fieldmap - farm-field boundaries, NDVI colors and clipped overlays
#[derive(Parser, Debug)]
#[command(name = "fieldmap")]
#[command(about = "Farm-field boundary and NDVI overlay toolkit", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file (defaults to ./fieldmap.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings that take precedence over the config file and environment
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Base URL of the NDVI raster provider
    #[arg(long, global = true, value_name = "URL")]
    pub raster_url: Option<String>,

    /// Palette requested from the raster provider
    #[arg(long, global = true)]
    pub palette: Option<String>,

    /// Raster fetch timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub fetch_timeout_ms: Option<u64>,

    /// Longest side of rendered rasters, in pixels
    #[arg(long, global = true, value_name = "PX")]
    pub render_size: Option<u32>,

    /// NDVI used for the synthetic fill when a field has no reading
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub default_ndvi: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a cadastral (CAR/SICAR) GeoJSON export
    Import(ImportArgs),

    /// Measure the area of a field boundary
    Area(AreaArgs),

    /// Classify an NDVI value and show its color
    Color(ColorArgs),

    /// Show the NDVI legend
    Legend,

    /// Render the synthetic NDVI gradient for a boundary
    Gradient(GradientArgs),

    /// Clip an NDVI raster to a boundary
    Clip(ClipArgs),

    /// Run the field overlay lifecycle against a headless map surface
    Overlay(OverlayArgs),

    /// Growing degree days and rainfall from daily weather samples
    Gdd(GddArgs),

    /// Show the resolved configuration and where each value came from
    Config,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the GeoJSON file
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct AreaArgs {
    /// Boundary file: cadastral GeoJSON or a JSON array of coordinates
    pub path: PathBuf,

    /// Also compute the ellipsoidal area
    #[arg(long)]
    pub geodesic: bool,
}

#[derive(Args, Debug)]
pub struct ColorArgs {
    /// NDVI value, nominally in [-1, 1]
    #[arg(allow_hyphen_values = true)]
    pub value: f64,
}

#[derive(Args, Debug)]
pub struct GradientArgs {
    /// Boundary file: cadastral GeoJSON or a JSON array of coordinates
    pub path: PathBuf,

    /// NDVI the gradient is colored with (defaults to the configured value)
    #[arg(long, allow_hyphen_values = true)]
    pub ndvi: Option<f64>,

    /// Where to write the PNG
    #[arg(short, long, default_value = "gradient.png")]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Boundary file: cadastral GeoJSON or a JSON array of coordinates
    pub path: PathBuf,

    /// Raster to clip: an http(s) URL or a local image path
    #[arg(long)]
    pub url: String,

    /// NDVI for the fallback gradient (defaults to the configured value)
    #[arg(long, allow_hyphen_values = true)]
    pub ndvi: Option<f64>,

    /// Where to write the PNG
    #[arg(short, long, default_value = "clipped.png")]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct OverlayArgs {
    /// Boundary file: cadastral GeoJSON or a JSON array of coordinates
    pub path: PathBuf,

    /// Field identifier used for layer ids and the provider URL
    #[arg(long, default_value = "field")]
    pub field_id: String,

    /// Current NDVI reading of the field
    #[arg(long, allow_hyphen_values = true)]
    pub ndvi: Option<f64>,
}

#[derive(Args, Debug)]
pub struct GddArgs {
    /// JSON array of daily samples ({"date", "tMin", "tMax", "precipitationMm"})
    pub path: PathBuf,

    /// Base temperature in °C
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub base: f64,

    /// Upper temperature cap in °C
    #[arg(long)]
    pub cap: Option<f64>,

    /// First day of the rainfall window (defaults to the first sample)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the rainfall window (defaults to the last sample)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Print the running total per day
    #[arg(long)]
    pub series: bool,
}
