use crate::cli::AreaArgs;
use crate::output::OutputWriter;
use crate::output_types::AreaOutput;
use anyhow::Result;
use fieldmap_core::geo::{approximation_check, geodesic_area_hectares};

use super::load_boundary;

pub fn execute(args: AreaArgs, output: &OutputWriter) -> Result<()> {
    let boundary = load_boundary(&args.path)?;
    let check = approximation_check(&boundary);

    let result = AreaOutput {
        vertices: boundary.len(),
        area_hectares: boundary.area_hectares(),
        geodesic_hectares: args.geodesic.then(|| geodesic_area_hectares(&boundary)),
        max_extent_m: check.max_extent_m,
        within_validity_range: check.within_validity_range(),
        bbox: boundary.bounding_box().to_array(),
    };

    if !result.within_validity_range {
        output.warning(format!(
            "Boundary spans {:.1} km up to latitude {:.1}°; the planar area is approximate here",
            check.max_extent_m / 1000.0,
            check.max_abs_lat
        ));
    }

    if output.is_json() {
        return output.result(result);
    }

    output.kv("Vertices", result.vertices);
    output.kv("Area", format!("{:.4} ha", result.area_hectares));
    if let Some(geodesic) = result.geodesic_hectares {
        output.kv("Geodesic area", format!("{:.4} ha", geodesic));
    }
    output.kv("Largest extent", format!("{:.0} m", result.max_extent_m));

    Ok(())
}
