use utoipa::OpenApi;

use crate::controllers::solar_controller;
use crate::geo::coordinate;
use crate::models::{climate, estimate};

#[derive(OpenApi)]
#[openapi(
    paths(
        solar_controller::estimate,
        solar_controller::health
    ),
    components(
        schemas(
            estimate::EstimateRequest,
            estimate::PointDto,
            estimate::EstimateResult,
            estimate::GridCell,
            estimate::AnalysisData,
            estimate::ShadingBreakdown,
            estimate::PvYieldSummary,
            climate::MonthlyClimate,
            coordinate::Coordinate
        )
    ),
    tags(
        (name = "solar-terrain-analytics", description = "Solar terrain analytics API")
    )
)]
pub struct ApiDoc;
