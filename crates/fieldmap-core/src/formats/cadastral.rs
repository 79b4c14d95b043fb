//! Cadastral boundary importer for CAR (Cadastro Ambiental Rural) GeoJSON exports.
//!
//! Accepts a `FeatureCollection`, a `Feature` or a bare `Polygon` /
//! `MultiPolygon`. Failures never escape as errors: they come back as
//! [`ImportResult::Rejected`] carrying a message meant for the end user.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FieldmapError, Result};
use crate::geo::{approximation_check, area_hectares, ring_points, RingPoints};
use crate::models::Boundary;

const CODE_ALIASES: &[&str] =
    &["cod_imovel", "COD_IMOVEL", "codigo_car", "CODIGO_CAR", "cod_car", "COD_CAR"];
const NAME_ALIASES: &[&str] =
    &["nom_imovel", "NOM_IMOVEL", "nome_imovel", "NOME_IMOVEL", "nome", "NOME", "name"];
const MUNICIPALITY_ALIASES: &[&str] =
    &["municipio", "MUNICIPIO", "nom_munici", "NOM_MUNICI", "cidade", "CIDADE"];
const STATE_ALIASES: &[&str] = &["cod_estado", "COD_ESTADO", "uf", "UF", "estado", "ESTADO"];
const TOTAL_AREA_ALIASES: &[&str] =
    &["num_area", "NUM_AREA", "area_total", "AREA_TOTAL", "area_imovel", "AREA_IMOVEL"];
const LEGAL_RESERVE_ALIASES: &[&str] =
    &["area_rl", "AREA_RL", "num_area_rl", "NUM_AREA_RL", "reserva_legal", "RESERVA_LEGAL"];
const RIPARIAN_ALIASES: &[&str] =
    &["area_app", "AREA_APP", "num_area_app", "NUM_AREA_APP", "app", "APP"];
const CONSOLIDATED_ALIASES: &[&str] = &[
    "area_consolidada",
    "AREA_CONSOLIDADA",
    "area_uso_consolidado",
    "AREA_USO_CONSOLIDADO",
    "num_area_consolidada",
];

/// EPSG codes of geographic (degree-based) CRSs the importer reads as-is
const GEOGRAPHIC_EPSG: &[u32] = &[4326, 4674];

/// Where `areaTotal` came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaSource {
    Declared,
    Computed,
}

/// Attributes declared by the cadastral record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CadastralAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod_imovel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_imovel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
    /// Hectares; the declared value when present, else the computed one
    pub area_total: f64,
    pub area_source: AreaSource,
}

/// Area breakdown in hectares; undeclared values are zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredAreas {
    pub total: f64,
    pub reserva_legal: f64,
    pub app: f64,
    pub consolidada: f64,
}

/// A successfully imported parcel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedParcel {
    pub data: CadastralAttributes,
    #[serde(rename = "boundaries")]
    pub boundary: Boundary,
    pub areas: DeclaredAreas,
    /// MultiPolygon parts dropped in favour of the largest one
    pub discarded_parts: usize,
    /// Malformed vertices replaced by `{0, 0}`
    pub coerced_vertices: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_crs: Option<u32>,
}

/// Outcome of an import, serialized as `{"success": ..., ...}`
#[derive(Debug, Clone, PartialEq)]
pub enum ImportResult {
    Imported(ImportedParcel),
    Rejected { error: String },
}

impl ImportResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Imported(_))
    }

    pub fn parcel(&self) -> Option<&ImportedParcel> {
        match self {
            Self::Imported(parcel) => Some(parcel),
            Self::Rejected { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Imported(_) => None,
            Self::Rejected { error } => Some(error),
        }
    }

    pub fn into_parcel(self) -> std::result::Result<ImportedParcel, String> {
        match self {
            Self::Imported(parcel) => Ok(parcel),
            Self::Rejected { error } => Err(error),
        }
    }
}

impl Serialize for ImportResult {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Envelope<'a> {
            success: bool,
            #[serde(flatten)]
            parcel: Option<&'a ImportedParcel>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<&'a str>,
        }

        Envelope { success: self.is_success(), parcel: self.parcel(), error: self.error() }
            .serialize(serializer)
    }
}

/// Import a cadastral GeoJSON document
pub fn import_cadastral_geojson(text: &str) -> ImportResult {
    match import_parcel(text) {
        Ok(parcel) => {
            tracing::info!(
                vertices = parcel.boundary.len(),
                area_total = parcel.data.area_total,
                area_source = ?parcel.data.area_source,
                discarded_parts = parcel.discarded_parts,
                "Imported cadastral boundary"
            );
            ImportResult::Imported(parcel)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Cadastral import rejected");
            ImportResult::Rejected { error: err.to_string() }
        }
    }
}

/// Import steps with errors still typed; see [`import_cadastral_geojson`]
pub fn import_parcel(text: &str) -> Result<ImportedParcel> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| FieldmapError::malformed(format!("not valid JSON/GeoJSON: {}", e)))?;

    let (geometry, properties) = locate_geometry(&document)?;
    let (ring, discarded_parts) = select_exterior_ring(geometry)?;
    let RingPoints { points, coerced } = ring;
    let boundary = Boundary::new(points)?;

    let check = approximation_check(&boundary);
    if !check.within_validity_range() {
        tracing::warn!(
            extent_m = check.max_extent_m,
            max_abs_lat = check.max_abs_lat,
            "Boundary lies outside the planar area approximation's validity range"
        );
    }

    let declared_crs = declared_crs(&document);
    if let Some(code) = declared_crs.filter(|code| !GEOGRAPHIC_EPSG.contains(code)) {
        tracing::warn!(epsg = code, "Declared CRS is not geographic; coordinates read as degrees");
    }

    let computed = boundary.area_hectares();
    let declared_total = lookup_area(properties, TOTAL_AREA_ALIASES).filter(|a| *a > 0.0);
    let (area_total, area_source) = match declared_total {
        Some(total) => (total, AreaSource::Declared),
        None => (computed, AreaSource::Computed),
    };

    let data = CadastralAttributes {
        cod_imovel: lookup_text(properties, CODE_ALIASES),
        nome_imovel: lookup_text(properties, NAME_ALIASES),
        municipio: lookup_text(properties, MUNICIPALITY_ALIASES),
        uf: lookup_text(properties, STATE_ALIASES),
        area_total,
        area_source,
    };

    let areas = DeclaredAreas {
        total: area_total,
        reserva_legal: lookup_area(properties, LEGAL_RESERVE_ALIASES).unwrap_or(0.0),
        app: lookup_area(properties, RIPARIAN_ALIASES).unwrap_or(0.0),
        consolidada: lookup_area(properties, CONSOLIDATED_ALIASES).unwrap_or(0.0),
    };

    Ok(ImportedParcel {
        data,
        boundary,
        areas,
        discarded_parts,
        coerced_vertices: coerced,
        declared_crs,
    })
}

/// Polygonal geometry found in the document, pointing at its `coordinates`
#[derive(Debug, Clone, Copy)]
enum SourceGeometry<'a> {
    Polygon(&'a Value),
    MultiPolygon(&'a Value),
}

fn geometry_not_found(detail: &str) -> FieldmapError {
    FieldmapError::malformed(format!("geometry not found: {}", detail))
}

fn locate_geometry(
    document: &Value,
) -> Result<(SourceGeometry<'_>, Option<&Map<String, Value>>)> {
    match document.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let first = document
                .get("features")
                .and_then(Value::as_array)
                .and_then(|features| features.first())
                .ok_or_else(|| geometry_not_found("the feature collection is empty"))?;
            feature_geometry(first)
        }
        Some("Feature") => feature_geometry(document),
        Some("Polygon") | Some("MultiPolygon") => Ok((source_geometry(document)?, None)),
        Some(other) => Err(geometry_not_found(&format!("unsupported type '{}'", other))),
        None => Err(geometry_not_found("the document has no GeoJSON type")),
    }
}

fn feature_geometry(
    feature: &Value,
) -> Result<(SourceGeometry<'_>, Option<&Map<String, Value>>)> {
    let geometry = feature
        .get("geometry")
        .filter(|g| !g.is_null())
        .ok_or_else(|| geometry_not_found("the feature has no geometry"))?;
    let properties = feature.get("properties").and_then(Value::as_object);
    Ok((source_geometry(geometry)?, properties))
}

fn source_geometry(geometry: &Value) -> Result<SourceGeometry<'_>> {
    let coordinates = || {
        geometry
            .get("coordinates")
            .ok_or_else(|| geometry_not_found("the geometry has no coordinates"))
    };
    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => Ok(SourceGeometry::Polygon(coordinates()?)),
        Some("MultiPolygon") => Ok(SourceGeometry::MultiPolygon(coordinates()?)),
        Some(other) => Err(geometry_not_found(&format!("expected a polygon, found '{}'", other))),
        None => Err(geometry_not_found("the geometry has no type")),
    }
}

fn exterior_ring(polygon: &Value) -> Option<&[Value]> {
    polygon.as_array()?.first()?.as_array().map(Vec::as_slice)
}

/// Pick the exterior ring to import and count the parts left behind.
///
/// For a MultiPolygon the part with the largest planar area wins; on exact
/// ties the first one seen is kept.
fn select_exterior_ring(geometry: SourceGeometry<'_>) -> Result<(RingPoints, usize)> {
    match geometry {
        SourceGeometry::Polygon(coordinates) => {
            let ring = exterior_ring(coordinates)
                .ok_or_else(|| geometry_not_found("the polygon has no exterior ring"))?;
            Ok((ring_points(ring)?, 0))
        }
        SourceGeometry::MultiPolygon(coordinates) => {
            let parts = coordinates
                .as_array()
                .ok_or_else(|| geometry_not_found("the multipolygon has no parts"))?;

            let mut best: Option<(RingPoints, f64)> = None;
            let mut candidates = 0;
            for (index, part) in parts.iter().enumerate() {
                let Some(ring) = exterior_ring(part) else {
                    tracing::debug!(part = index, "Skipping multipolygon part without a ring");
                    continue;
                };
                let points = match ring_points(ring) {
                    Ok(points) => points,
                    Err(err) => {
                        tracing::debug!(part = index, error = %err, "Skipping unreadable part");
                        continue;
                    }
                };
                candidates += 1;
                let area = area_hectares(&points.points);
                tracing::debug!(part = index, area_ha = area, "Evaluated multipolygon part");
                if best.as_ref().map_or(true, |(_, best_area)| area > *best_area) {
                    best = Some((points, area));
                }
            }

            let (ring, _) =
                best.ok_or_else(|| geometry_not_found("the multipolygon has no readable part"))?;
            Ok((ring, candidates - 1))
        }
    }
}

/// Parse the legacy GeoJSON `crs` member, e.g. `EPSG:4674` or
/// `urn:ogc:def:crs:EPSG::4674`
fn declared_crs(document: &Value) -> Option<u32> {
    let name = document.get("crs")?.get("properties")?.get("name")?.as_str()?;
    let code = name.rsplit(':').next()?;
    if code.eq_ignore_ascii_case("CRS84") {
        return Some(4326);
    }
    code.parse().ok()
}

/// First alias whose value `convert` accepts; blank or null entries under an
/// earlier alias fall through to later ones
fn lookup<T>(
    properties: Option<&Map<String, Value>>,
    aliases: &[&str],
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let properties = properties?;
    aliases.iter().filter_map(|alias| properties.get(*alias)).find_map(convert)
}

fn lookup_text(properties: Option<&Map<String, Value>>, aliases: &[&str]) -> Option<String> {
    lookup(properties, aliases, |value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lookup_area(properties: Option<&Map<String, Value>>, aliases: &[&str]) -> Option<f64> {
    lookup(properties, aliases, |value| {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_decimal(s),
            _ => None,
        }
        .filter(|v| v.is_finite())
    })
}

/// Accepts `12.5`, `12,5` and `1.234,5`
fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else {
        text.to_string()
    };
    normalized.parse().ok()
}
