use axum::{extract::Query, Json};
use fieldmap_core::ndvi::{legend, LegendEntry, NdviSample};

use crate::dto::ColorQuery;

pub async fn ndvi_legend() -> Json<Vec<LegendEntry>> {
    Json(legend())
}

/// Out-of-range values are accepted and land in the nearest band
pub async fn ndvi_color(Query(query): Query<ColorQuery>) -> Json<NdviSample> {
    Json(NdviSample::new(query.value))
}
