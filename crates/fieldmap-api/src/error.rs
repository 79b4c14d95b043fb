use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fieldmap_core::error::FieldmapError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<FieldmapError> for ApiError {
    fn from(err: FieldmapError) -> Self {
        match &err {
            FieldmapError::InvalidGeometry { .. }
            | FieldmapError::UnsupportedCoordinateFormat { .. } => {
                Self::bad_request("Invalid boundary").with_details(err.to_string())
            }
            FieldmapError::MalformedSource { .. } => {
                Self::bad_request("Malformed input").with_details(err.to_string())
            }
            FieldmapError::RasterUnavailable { .. } => {
                Self::bad_gateway("Raster unavailable").with_details(err.to_string())
            }
            _ => {
                tracing::error!(error = %err, "Request failed");
                Self::internal("Internal error").with_details(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let geometry: ApiError = FieldmapError::invalid_geometry("too few points").into();
        assert_eq!(geometry.status, StatusCode::BAD_REQUEST);

        let raster: ApiError = FieldmapError::raster_unavailable("timeout").into();
        assert_eq!(raster.status, StatusCode::BAD_GATEWAY);

        let config: ApiError =
            FieldmapError::ConfigMissing { key: "raster_base_url".into() }.into();
        assert_eq!(config.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
