mod boundaries;
mod health;
mod ndvi;
mod overlay;

pub use boundaries::{import_boundary, measure_area};
pub use health::health_check;
pub use ndvi::{ndvi_color, ndvi_legend};
pub use overlay::render_overlay;
