use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Terminal estimation failures. These are the only errors a caller of
/// `EstimationEngine::estimate` ever sees; external-signal problems are
/// absorbed inside the engine (see `FetchError`).
#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("invalid coordinate lat={lat} lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("polygon requires >=3 points, got {0}")]
    InvalidPolygon(usize),

    #[error("area centroid ({lat:.4}, {lng:.4}) outside supported bounds")]
    UnsupportedRegion { lat: f64, lng: f64 },
}

impl IntoResponse for EstimateError {
    fn into_response(self) -> Response {
        let status = match self {
            EstimateError::InvalidCoordinate { .. } | EstimateError::InvalidPolygon(_) => {
                StatusCode::BAD_REQUEST
            }
            EstimateError::UnsupportedRegion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// A single failed external lookup. Every provider call that returns this
/// is replaced by its documented fallback value inside the engine, so the
/// type never crosses the `estimate` boundary.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("unexpected payload: {0}")]
    Payload(String),
}
