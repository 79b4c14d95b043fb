//! Boundary source formats
//!
//! Cadastral GeoJSON is the only import format; hand-drawn boundaries enter
//! through [`crate::geo::normalize_ring`] instead.

use std::path::Path;

pub mod cadastral;

pub use cadastral::{
    import_cadastral_geojson, import_parcel, AreaSource, CadastralAttributes, DeclaredAreas,
    ImportResult, ImportedParcel,
};

/// File extensions recognised as GeoJSON
pub const GEOJSON_EXTENSIONS: &[&str] = &["geojson", "json"];

pub fn is_geojson_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| GEOJSON_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Read and import a cadastral export from disk.
///
/// Read failures are reported the same way as parse failures, as a
/// rejected result.
pub fn read_cadastral_file(path: &Path) -> ImportResult {
    match std::fs::read_to_string(path) {
        Ok(text) => import_cadastral_geojson(&text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read boundary file");
            ImportResult::Rejected { error: format!("could not read {}: {}", path.display(), e) }
        }
    }
}
