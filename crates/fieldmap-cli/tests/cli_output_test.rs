//! Integration tests for the fieldmap binary
//!
//! These run the real executable and check the JSON envelope on stdout.

use serde_json::{json, Value};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "FIELDMAP_RASTER_URL",
    "FIELDMAP_PALETTE",
    "FIELDMAP_FETCH_TIMEOUT_MS",
    "FIELDMAP_RENDER_SIZE",
    "FIELDMAP_DEFAULT_NDVI",
];

fn fieldmap(dir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fieldmap"));
    command.current_dir(dir).args(args).env("RUST_LOG", "off");
    for var in ENV_VARS {
        command.env_remove(var);
    }
    command.output().expect("Failed to execute fieldmap")
}

fn json_data(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(parsed["status"], "success");
    parsed["data"].clone()
}

fn write(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    std::fs::write(&path, value.to_string()).unwrap();
    path.display().to_string()
}

fn field_ring() -> Value {
    json!([[-47.0, -15.0], [-46.99, -15.0], [-46.99, -14.99], [-47.0, -14.99]])
}

#[test]
fn test_color_json() {
    let dir = TempDir::new().unwrap();
    let output = fieldmap(dir.path(), &["color", "0.72", "--json"]);
    assert!(output.status.success());

    let data = json_data(&output);
    assert_eq!(data["value"], 0.72);
    assert_eq!(data["colorClass"], "good");
    assert_eq!(data["color"], "#91cf60");
}

#[test]
fn test_negative_color_value_is_accepted() {
    let dir = TempDir::new().unwrap();
    let output = fieldmap(dir.path(), &["color", "-0.3", "--json"]);
    assert!(output.status.success());
    assert_eq!(json_data(&output)["colorClass"], "very-low");
}

#[test]
fn test_legend_lists_five_bands() {
    let dir = TempDir::new().unwrap();
    let output = fieldmap(dir.path(), &["legend", "--json"]);
    assert!(output.status.success());

    let data = json_data(&output);
    let bands = data.as_array().unwrap();
    assert_eq!(bands.len(), 5);
    assert_eq!(bands[0]["band"], "very-low");
    assert_eq!(bands[4]["band"], "excellent");
}

#[test]
fn test_import_uses_declared_area() {
    let dir = TempDir::new().unwrap();
    let collection = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "cod_imovel": "MT-5107925-ABC", "num_area": 123.45 },
            "geometry": { "type": "Polygon", "coordinates": [[
                [-55.70, -12.50], [-55.69, -12.50], [-55.69, -12.49],
                [-55.695, -12.485], [-55.70, -12.49], [-55.70, -12.50]
            ]] }
        }]
    });
    let path = write(dir.path(), "car.geojson", &collection);

    let output = fieldmap(dir.path(), &["import", &path, "--json"]);
    assert!(output.status.success());

    let data = json_data(&output);
    assert_eq!(data["success"], true);
    assert_eq!(data["data"]["areaTotal"], 123.45);
    assert_eq!(data["data"]["areaSource"], "declared");
    assert_eq!(data["boundaries"].as_array().unwrap().len(), 5);
}

#[test]
fn test_import_rejection_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let polygon = json!({
        "type": "Polygon",
        "coordinates": [[[-47.0, -15.0], [-46.99, -15.0]]]
    });
    let path = write(dir.path(), "broken.geojson", &polygon);

    let output = fieldmap(dir.path(), &["import", &path, "--json"]);
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(parsed["status"], "error");
    let data = &parsed["data"];
    assert_eq!(data["success"], false);
    assert!(!data["error"].as_str().unwrap().is_empty());
}

#[test]
fn test_area_of_coordinate_array() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "ring.json", &field_ring());

    let output = fieldmap(dir.path(), &["area", &path, "--geodesic", "--json"]);
    assert!(output.status.success());

    let data = json_data(&output);
    let planar = data["areaHectares"].as_f64().unwrap();
    let geodesic = data["geodesicHectares"].as_f64().unwrap();
    assert_eq!(data["vertices"], 4);
    assert_eq!(data["withinValidityRange"], true);
    assert!(planar > 100.0, "planar {}", planar);
    assert!((planar - geodesic).abs() / geodesic < 0.01);
}

#[test]
fn test_gradient_writes_png() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "ring.json", &field_ring());
    let out = dir.path().join("fill.png");

    let output = fieldmap(
        dir.path(),
        &["gradient", &path, "--ndvi", "0.8", "--out", out.to_str().unwrap(), "--render-size", "64", "--json"],
    );
    assert!(output.status.success());

    let data = json_data(&output);
    assert_eq!(data["source"], "gradient");
    // the field is a little taller than wide on the ground
    assert_eq!(data["height"], 64);
    assert!(data["width"].as_u64().unwrap() < 64);
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_clip_falls_back_when_raster_is_missing() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "ring.json", &field_ring());
    let out = dir.path().join("clip.png");
    let missing = dir.path().join("missing.png");

    let output = fieldmap(
        dir.path(),
        &[
            "clip",
            &path,
            "--url",
            missing.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--render-size",
            "32",
            "--json",
        ],
    );
    assert!(output.status.success());

    let data = json_data(&output);
    assert_eq!(data["source"], "fallback");
    assert!(data["reason"].as_str().unwrap().starts_with("Raster unavailable"));
    assert!(out.exists());
}

#[test]
fn test_overlay_without_provider_installs_fallback() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "ring.json", &field_ring());

    let output = fieldmap(
        dir.path(),
        &["overlay", &path, "--field-id", "7", "--ndvi", "0.4", "--render-size", "32", "--json"],
    );
    assert!(output.status.success());

    let data = json_data(&output);
    assert_eq!(data["completion"]["status"], "fallback");
    assert_eq!(data["state"]["state"], "fallback");
    let layers: Vec<&str> =
        data["layers"].as_array().unwrap().iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert_eq!(layers, vec!["field-7-fill", "field-7-outline"]);
    assert_eq!(data["fittedBounds"]["minLng"], -47.0);
}

#[test]
fn test_gdd_totals() {
    let dir = TempDir::new().unwrap();
    let samples = json!([
        { "date": "2024-10-01", "tMin": 18.0, "tMax": 30.0, "precipitationMm": 4.0 },
        { "date": "2024-10-02", "tMin": 8.0, "tMax": 20.0, "precipitationMm": 0.0 },
        { "date": "2024-10-03", "tMin": 20.0, "tMax": 36.0, "precipitationMm": 12.5 }
    ]);
    let path = write(dir.path(), "weather.json", &samples);

    let output = fieldmap(
        dir.path(),
        &["gdd", &path, "--base", "10", "--cap", "30", "--from", "2024-10-02", "--json"],
    );
    assert!(output.status.success());

    let data = json_data(&output);
    // 14 + 5 + 15
    assert_eq!(data["growingDegreeDays"], 34.0);
    assert_eq!(data["precipitationMm"], 12.5);
    assert_eq!(data["days"], 3);
}

#[test]
fn test_config_reports_cli_source() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("fieldmap.toml"), "palette = \"rdylgn\"\n").unwrap();

    let output = fieldmap(dir.path(), &["config", "--render-size", "256", "--json"]);
    assert!(output.status.success());

    let data = json_data(&output);
    assert_eq!(data["configFile"], "fieldmap.toml");
    assert_eq!(data["palette"]["value"], "rdylgn");
    assert_eq!(data["palette"]["source"], "File");
    assert_eq!(data["renderSize"]["value"], 256);
    assert_eq!(data["renderSize"]["source"], "Cli");
    assert_eq!(data["fetchTimeoutMs"]["source"], "Default");
}

#[test]
fn test_invalid_config_flag_fails() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "ring.json", &field_ring());
    let output = fieldmap(dir.path(), &["gradient", &path, "--default-ndvi", "4"]);
    assert!(!output.status.success());
}
