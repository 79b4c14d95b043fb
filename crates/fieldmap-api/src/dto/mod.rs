mod request;
mod response;

pub use request::{AreaRequest, ColorQuery, OverlayBody};
pub use response::{AreaResponse, HealthResponse, OverlayResponse};
