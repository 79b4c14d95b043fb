//! Agronomic metrics derived from daily weather samples.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of weather observations for a field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub t_min: f64,
    pub t_max: f64,
    #[serde(default)]
    pub precipitation_mm: f64,
}

/// Heat units accumulated on a single day.
///
/// Modified average method: the minimum is raised to `base`, the maximum is
/// lowered to `cap` when one is given, and negative results count as zero.
pub fn daily_gdd(day: &DailyWeather, base: f64, cap: Option<f64>) -> f64 {
    let t_max = cap.map_or(day.t_max, |c| day.t_max.min(c));
    let t_min = day.t_min.max(base);
    ((t_max + t_min) / 2.0 - base).max(0.0)
}

/// Growing degree days over all samples
pub fn growing_degree_days(samples: &[DailyWeather], base: f64, cap: Option<f64>) -> f64 {
    samples.iter().map(|day| daily_gdd(day, base, cap)).sum()
}

/// Running GDD total per day, in date order
pub fn cumulative_gdd(
    samples: &[DailyWeather],
    base: f64,
    cap: Option<f64>,
) -> Vec<(NaiveDate, f64)> {
    let mut ordered: Vec<&DailyWeather> = samples.iter().collect();
    ordered.sort_by_key(|day| day.date);

    let mut total = 0.0;
    ordered
        .into_iter()
        .map(|day| {
            total += daily_gdd(day, base, cap);
            (day.date, total)
        })
        .collect()
}

/// Precipitation total for days in `from..=to`
pub fn precipitation_sum(samples: &[DailyWeather], from: NaiveDate, to: NaiveDate) -> f64 {
    samples
        .iter()
        .filter(|day| day.date >= from && day.date <= to)
        .map(|day| day.precipitation_mm.max(0.0))
        .sum()
}
