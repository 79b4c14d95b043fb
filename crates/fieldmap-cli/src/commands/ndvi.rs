use crate::cli::ColorArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use fieldmap_core::ndvi::{legend as legend_entries, NdviSample, NDVI_MAX, NDVI_MIN};
use tabled::Tabled;

pub fn color(args: ColorArgs, output: &OutputWriter) -> Result<()> {
    let sample = NdviSample::new(args.value);

    if args.value.is_nan() || !(NDVI_MIN..=NDVI_MAX).contains(&args.value) {
        output.warning(format!(
            "{} is outside [{}, {}]; using the nearest band",
            args.value, NDVI_MIN, NDVI_MAX
        ));
    }

    if output.is_json() {
        return output.result(sample);
    }

    let band = sample.color_class();
    output.kv("NDVI", format!("{:.3}", sample.value));
    output.kv("Band", band.label());
    output.kv("Color", sample.color());
    Ok(())
}

pub fn legend(output: &OutputWriter) -> Result<()> {
    let entries = legend_entries();

    if output.is_json() {
        return output.result(entries);
    }

    #[derive(Tabled)]
    struct LegendRow {
        #[tabled(rename = "Band")]
        band: String,
        #[tabled(rename = "Range")]
        range: String,
        #[tabled(rename = "Color")]
        color: String,
    }

    let rows = entries
        .iter()
        .map(|entry| LegendRow {
            band: entry.label.to_string(),
            range: format!("{:.1} – {:.1}", entry.min, entry.max),
            color: entry.color.to_hex(),
        })
        .collect();

    output.section("NDVI Legend");
    output.table(rows);
    Ok(())
}
