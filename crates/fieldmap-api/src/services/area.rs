use fieldmap_core::geo::{approximation_check, geodesic_area_hectares, normalize_ring};

use crate::dto::{AreaRequest, AreaResponse};
use crate::error::ApiError;

/// Service for measuring boundaries
pub struct AreaService;

impl AreaService {
    pub fn measure(request: &AreaRequest) -> Result<AreaResponse, ApiError> {
        let boundary = normalize_ring(&request.coordinates)?;
        let check = approximation_check(&boundary);

        if !check.within_validity_range() {
            tracing::warn!(
                extent_m = check.max_extent_m,
                max_abs_lat = check.max_abs_lat,
                "Boundary outside the planar approximation range"
            );
        }

        Ok(AreaResponse {
            vertices: boundary.len(),
            area_hectares: boundary.area_hectares(),
            geodesic_hectares: request.geodesic.then(|| geodesic_area_hectares(&boundary)),
            max_extent_m: check.max_extent_m,
            within_validity_range: check.within_validity_range(),
            bbox: boundary.bounding_box().to_array(),
        })
    }
}
