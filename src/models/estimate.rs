use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::climate::MonthlyClimate;

// ─── Request ─────────────────────────────────────────────────────────────────

/// Polygon payload for which to estimate solar potential. Coordinates are
/// range-checked when the engine converts them; the optional fields
/// override the configured defaults for this call only.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub points: Vec<PointDto>,
    /// Reference year, accepted for wire compatibility
    pub year: Option<i32>,
    /// Module efficiency override (0-1)
    pub panel_efficiency: Option<f64>,
    /// Combined system-loss override (0-1)
    pub performance_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PointDto {
    pub lat: f64,
    pub lng: f64,
}

// ─── Heatmap ─────────────────────────────────────────────────────────────────

/// One interior grid point of the heatmap with its fused intensity and the
/// per-factor diagnostics that produced it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub lat: f64,
    pub lng: f64,
    /// Final fused intensity (kWh/m²/year equivalent)
    pub intensity: f64,
    /// Latitude/longitude heuristic surface before fusion
    pub base_intensity: f64,
    /// Nearest external solar sample, normalized to [0.5..1.5]
    pub solar_factor: f64,
    /// Average climate efficiency applied to this cell
    pub weather_factor: f64,
    /// Local shading fraction [0..1]
    pub shadow_factor: f64,
    /// 5-band color class, bright green (excellent) to red (poor)
    pub color: String,
    /// Expected production per month, index 0 = January
    pub monthly_production: Vec<f64>,
}

// ─── Analysis payload ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShadingBreakdown {
    pub average: f64,
    pub morning: f64,
    pub noon: f64,
    pub evening: f64,
    pub winter: f64,
    pub summer: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PvYieldSummary {
    /// Annual AC yield for the assumed system size (kWh)
    pub annual_kwh: f64,
    /// Monthly split of the annual yield, index 0 = January
    pub monthly_kwh: Vec<f64>,
    /// True when the seasonal-weight fallback replaced a live lookup
    pub from_fallback: bool,
}

/// Structured diagnostics attached to every estimate.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    pub shading: ShadingBreakdown,
    /// Fixed-size shadow intensity matrix sampled at solar noon; empty in
    /// degraded mode
    pub shadow_matrix: Vec<Vec<f64>>,
    pub average_climate_efficiency: f64,
    pub monthly_climate: Vec<MonthlyClimate>,
    /// Months with efficiency factor above 0.85
    pub best_production_months: Vec<String>,
    /// Months with efficiency factor below 0.6
    pub worst_production_months: Vec<String>,
    pub external_solar_available: bool,
    /// Mean yearly energy over the external sample set (kWh), when available
    pub external_solar_average_kwh: Option<f64>,
    /// Sunshine quantiles of the external sample nearest the centroid
    pub external_sunshine_quantiles: Vec<f64>,
    /// `1 - averageShading`
    pub overall_shading_factor: f64,
    /// `overallShadingFactor × averageClimateEfficiency`
    pub combined_efficiency_factor: f64,
    pub pv_yield: PvYieldSummary,
    /// External sources that fell back to their documented defaults
    pub degraded_sources: Vec<String>,
    pub recommendations: Vec<String>,
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// The sole output of an estimation call.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    /// Geodesic polygon area (m²)
    pub area_m2: f64,
    /// Installable area after setbacks/spacing (m²)
    pub usable_area_m2: f64,
    /// Assumed nameplate DC capacity (kWp)
    pub system_kwp: f64,
    /// Expected annual AC energy after all derate factors (kWh)
    pub annual_energy_kwh: f64,
    pub heatmap: Vec<GridCell>,
    pub analysis: AnalysisData,
}
