use crate::cli::GddArgs;
use crate::errors::weather_unreadable;
use crate::output::OutputWriter;
use crate::output_types::{GddOutput, GddPoint};
use anyhow::Result;
use fieldmap_core::metrics::{
    cumulative_gdd, growing_degree_days, precipitation_sum, DailyWeather,
};
use tabled::Tabled;

pub fn execute(args: GddArgs, output: &OutputWriter) -> Result<()> {
    let text = std::fs::read_to_string(&args.path)
        .map_err(|e| weather_unreadable(&args.path, &format!("could not read file: {}", e)))?;
    let samples: Vec<DailyWeather> = serde_json::from_str(&text)
        .map_err(|e| weather_unreadable(&args.path, &e.to_string()))?;

    let first = samples.iter().map(|day| day.date).min();
    let last = samples.iter().map(|day| day.date).max();
    let window = match (args.from.or(first), args.to.or(last)) {
        (Some(from), Some(to)) => Some((from, to)),
        _ => None,
    };

    let precipitation_mm =
        window.map_or(0.0, |(from, to)| precipitation_sum(&samples, from, to));
    let series = if args.series {
        cumulative_gdd(&samples, args.base, args.cap)
            .into_iter()
            .map(|(date, cumulative)| GddPoint { date, cumulative })
            .collect()
    } else {
        Vec::new()
    };

    let result = GddOutput {
        days: samples.len(),
        base: args.base,
        cap: args.cap,
        growing_degree_days: growing_degree_days(&samples, args.base, args.cap),
        precipitation_mm,
        window,
        series,
    };

    if samples.is_empty() {
        output.warning("No weather samples in file");
    }

    if output.is_json() {
        return output.result(result);
    }

    output.kv("Days", result.days);
    output.kv("Base temperature", format!("{:.1} °C", result.base));
    if let Some(cap) = result.cap {
        output.kv("Upper cap", format!("{:.1} °C", cap));
    }
    output.kv("Growing degree days", format!("{:.1} °C·d", result.growing_degree_days));
    if let Some((from, to)) = result.window {
        output.kv(
            "Precipitation",
            format!("{:.1} mm ({} to {})", result.precipitation_mm, from, to),
        );
    }

    if !result.series.is_empty() {
        #[derive(Tabled)]
        struct SeriesRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Cumulative GDD")]
            cumulative: String,
        }

        output.section("Accumulation");
        output.table(
            result
                .series
                .iter()
                .map(|point| SeriesRow {
                    date: point.date.to_string(),
                    cumulative: format!("{:.1}", point.cumulative),
                })
                .collect(),
        );
    }

    Ok(())
}
