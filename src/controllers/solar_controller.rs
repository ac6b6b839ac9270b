use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::models::estimate::{EstimateRequest, EstimateResult};
use crate::shared_state::AppState;

/// POST /api/solar/estimate
/// Estimate the solar potential of a ground polygon
///
/// Computes geodesic area, queries the external signal sources, runs the
/// terrain shading simulation and returns the fused estimate with heatmap
/// and recommendations. External-source failures degrade to documented
/// fallbacks and never fail the request; only invalid geometry or an
/// unsupported region does.
#[utoipa::path(
    post,
    path = "/api/solar/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Best-effort solar estimate", body = EstimateResult),
        (status = 400, description = "Invalid coordinate or polygon"),
        (status = 422, description = "Centroid outside the supported region")
    )
)]
pub async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> impl IntoResponse {
    match state.engine.estimate(request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            log::info!("estimate rejected: {e}");
            e.into_response()
        }
    }
}

/// GET /api/health
/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
        "ts": chrono::Utc::now().timestamp_millis(),
    }))
}
