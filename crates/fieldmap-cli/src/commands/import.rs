use crate::cli::ImportArgs;
use crate::errors::import_rejected;
use crate::output::OutputWriter;
use anyhow::Result;
use fieldmap_core::formats::{read_cadastral_file, AreaSource, ImportResult};

pub fn execute(args: ImportArgs, output: &OutputWriter) -> Result<()> {
    let result = read_cadastral_file(&args.path);

    if !result.is_success() {
        output.failure(&result)?;
    } else if output.is_json() {
        output.result(&result)?;
    }

    let parcel = match result {
        ImportResult::Imported(parcel) => parcel,
        ImportResult::Rejected { error } => return Err(import_rejected(&args.path, &error).into()),
    };

    if parcel.discarded_parts > 0 {
        output.warning(format!(
            "MultiPolygon: kept the largest part, {} other part(s) discarded",
            parcel.discarded_parts
        ));
    }
    if parcel.coerced_vertices > 0 {
        output.warning(format!(
            "{} malformed vertex/vertices replaced by (0, 0); check the boundary",
            parcel.coerced_vertices
        ));
    }
    if output.is_json() {
        return Ok(());
    }

    output.success(format!("Imported boundary from {}", args.path.display()));

    let data = &parcel.data;
    output.section("Property");
    if let Some(code) = &data.cod_imovel {
        output.kv("Registry code", code);
    }
    if let Some(name) = &data.nome_imovel {
        output.kv("Name", name);
    }
    match (&data.municipio, &data.uf) {
        (Some(city), Some(uf)) => output.kv("Municipality", format!("{} / {}", city, uf)),
        (Some(city), None) => output.kv("Municipality", city),
        (None, Some(uf)) => output.kv("State", uf),
        (None, None) => {}
    }
    if let Some(epsg) = parcel.declared_crs {
        output.kv("Declared CRS", format!("EPSG:{}", epsg));
    }

    output.section("Areas");
    let source = match data.area_source {
        AreaSource::Declared => "declared",
        AreaSource::Computed => "computed",
    };
    output.kv("Total", format!("{:.2} ha ({})", data.area_total, source));
    output.kv("Reserva legal", format!("{:.2} ha", parcel.areas.reserva_legal));
    output.kv("APP", format!("{:.2} ha", parcel.areas.app));
    output.kv("Consolidated", format!("{:.2} ha", parcel.areas.consolidada));

    output.section("Boundary");
    output.kv("Vertices", parcel.boundary.len());
    let [min_lng, min_lat, max_lng, max_lat] = parcel.boundary.bounding_box().to_array();
    output.kv("Bounds", format!("{:.6}, {:.6} → {:.6}, {:.6}", min_lng, min_lat, max_lng, max_lat));

    Ok(())
}
