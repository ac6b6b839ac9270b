/// ============================================================
///  Solar Potential Estimation Engine
///
///  Orchestration pipeline:
///   1. Geometry       – geodesic area, usable fraction, centroid,
///                       supported-region check
///   2. Signal fetch   – solar yield (5×5 grid), monthly climate and
///                       elevation (10×10 grid) settle concurrently,
///                       each with its documented fallback
///   3. Shading        – terrain self-shading profile from the
///                       elevation samples
///   4. Fusion         – capacity, annual energy, per-cell heatmap
///                       (20×20 grid) and the analysis payload
/// ============================================================

use std::future::Future;
use std::time::Duration;

use futures_util::future::join_all;

use crate::config::SolarDefaults;
use crate::error::{EstimateError, FetchError};
use crate::geo::coordinate::Coordinate;
use crate::geo::geodesy;
use crate::geo::grid;
use crate::models::climate::{MONTH_NAMES, MonthlyClimate, PORTUGAL_CLIMATE};
use crate::models::estimate::{
    AnalysisData, EstimateRequest, EstimateResult, GridCell, PvYieldSummary, ShadingBreakdown,
};
use crate::providers::pvgis::PvYield;
use crate::providers::solar::SolarYieldSample;
use crate::providers::{ClimateProvider, ElevationProvider, PvYieldProvider, SolarYieldProvider};
use crate::services::shading_service::{self, ElevationSample, ShadingAnalysis};

// ─── Supported region ────────────────────────────────────────

// Continental Portugal rough bounding box. A business boundary, not a
// geometry limitation.
const REGION_MIN_LAT: f64 = 36.8;
const REGION_MAX_LAT: f64 = 42.3;
const REGION_MIN_LNG: f64 = -9.6;
const REGION_MAX_LNG: f64 = -6.0;

/// Regional average Global Horizontal Irradiance (kWh/m²/year).
const REGION_AVERAGE_GHI: f64 = 1650.0;

// ─── Calibration constants ───────────────────────────────────
// Empirical values carried over from field tuning; change with care.

/// Baseline of the lat/lng intensity surface (kWh/m²/year equivalent).
const BASE_INTENSITY_KWH: f64 = 1400.0;
/// Intensity decrease per degree northward.
const LAT_INTENSITY_SLOPE: f64 = 0.02;
/// Intensity increase per degree inland of the reference meridian.
const LNG_INTENSITY_SLOPE: f64 = 0.02;
const REFERENCE_LNG: f64 = -8.0;
/// Yearly energy that maps an external sample to factor 1.0.
const EXTERNAL_BASELINE_KWH: f64 = 1500.0;
/// Intensity that saturates the heatmap color scale.
const HEATMAP_NORMALIZATION_KWH: f64 = 2000.0;
/// Hard cap on derived capacity density (kWp/m²).
const KWP_PER_M2_CAP: f64 = 0.25;
/// Elevation relief that fully offsets the area-average shading (m).
const RELIEF_NORM_M: f64 = 100.0;

const HEATMAP_GRID_SIZE: usize = 20;
const ELEVATION_GRID_SIZE: usize = 10;
const SOLAR_GRID_SIZE: usize = 5;
const AVG_DAYS_PER_MONTH: f64 = 30.44;
/// Climate efficiency assumed when no table is available at all.
const DEFAULT_CLIMATE_EFFICIENCY: f64 = 0.8;

/// External yearly-energy sample pinned to the grid point it was fetched
/// for.
#[derive(Debug, Clone)]
struct SolarYieldPoint {
    point: Coordinate,
    sample: SolarYieldSample,
}

/// Stateless estimation orchestrator. One instance serves all requests;
/// per-call data never outlives `estimate`.
pub struct EstimationEngine<S, C, E, P> {
    defaults: SolarDefaults,
    solar: S,
    climate: C,
    elevation: E,
    pv: P,
}

impl<S, C, E, P> EstimationEngine<S, C, E, P>
where
    S: SolarYieldProvider,
    C: ClimateProvider,
    E: ElevationProvider,
    P: PvYieldProvider,
{
    pub fn new(defaults: SolarDefaults, solar: S, climate: C, elevation: E, pv: P) -> Self {
        Self { defaults, solar, climate, elevation, pv }
    }

    /// Best-effort solar estimate for a polygon. Geometry and region
    /// errors are terminal; every external-signal failure degrades to its
    /// documented fallback and is recorded in `analysis.degradedSources`.
    pub async fn estimate(&self, request: EstimateRequest) -> Result<EstimateResult, EstimateError> {
        let points: Vec<Coordinate> = request
            .points
            .iter()
            .map(|p| Coordinate::new(p.lat, p.lng))
            .collect::<Result<_, _>>()?;

        let area_m2 = geodesy::polygon_area_m2(&points)?;
        let usable_area_m2 = area_m2 * self.defaults.usable_fraction;
        let centroid = geodesy::centroid(&points);
        if !region_supported(&centroid) {
            return Err(EstimateError::UnsupportedRegion { lat: centroid.lat, lng: centroid.lng });
        }

        let panel_efficiency =
            request.panel_efficiency.unwrap_or(self.defaults.panel_efficiency);
        let performance_ratio =
            request.performance_ratio.unwrap_or(self.defaults.performance_ratio);
        if let Some(year) = request.year {
            log::debug!("estimate requested against reference year {year}");
        }

        let timeout = Duration::from_secs(self.defaults.fetch_timeout_secs);
        let mut degraded: Vec<String> = Vec::new();

        // The three location signals are independent; settle them together.
        let (solar_points, climate_result, (elevation_samples, elevation_failed)) = tokio::join!(
            self.fetch_solar_points(&points, timeout),
            with_timeout(timeout, self.climate.fetch_monthly_climate(centroid.lat, centroid.lng)),
            self.fetch_elevation_samples(&points, timeout),
        );

        if solar_points.is_empty() {
            degraded.push("solarYield".into());
        }
        if elevation_failed {
            degraded.push("elevation".into());
        }
        let climate = match climate_result {
            Ok(table) if !table.is_empty() => table,
            Ok(_) => {
                degraded.push("climate".into());
                PORTUGAL_CLIMATE.to_vec()
            }
            Err(e) => {
                log::warn!("Error fetching monthly climate: {e}");
                degraded.push("climate".into());
                PORTUGAL_CLIMATE.to_vec()
            }
        };

        let shading = shading_service::detailed_shading(centroid.lat, centroid.lng, elevation_samples);

        let avg_climate_efficiency = average_efficiency(&climate);
        let external_solar_average = external_average(&solar_points);

        let kwp_per_m2 = match external_solar_average {
            Some(avg) if avg > 0.0 => (avg / (REGION_AVERAGE_GHI * 365.0 * 24.0)).min(KWP_PER_M2_CAP),
            _ => panel_efficiency * avg_climate_efficiency,
        };
        let system_kwp = usable_area_m2 * kwp_per_m2;

        // PV yield needs the derived capacity, so it settles after the
        // fusion inputs; same timeout and fallback discipline.
        let pv_yield = match with_timeout(
            timeout,
            self.pv.fetch_annual_yield(centroid.lat, centroid.lng, system_kwp),
        )
        .await
        {
            Ok(y) => PvYieldSummary {
                annual_kwh: y.annual_kwh,
                monthly_kwh: y.monthly_kwh,
                from_fallback: false,
            },
            Err(e) => {
                log::warn!(
                    "PVGIS lookup failed for lat={:.4}, lon={:.4}: {e}",
                    centroid.lat,
                    centroid.lng
                );
                degraded.push("pvYield".into());
                let fallback = PvYield::fallback(system_kwp);
                PvYieldSummary {
                    annual_kwh: fallback.annual_kwh,
                    monthly_kwh: fallback.monthly_kwh,
                    from_fallback: true,
                }
            }
        };

        let shading_factor = 1.0 - shading.average;
        let annual_energy_kwh = system_kwp
            * REGION_AVERAGE_GHI
            * performance_ratio
            * avg_climate_efficiency
            * shading_factor;

        let heatmap =
            build_heatmap(&points, &solar_points, &shading, &climate, avg_climate_efficiency);

        if !degraded.is_empty() {
            log::warn!("estimate degraded, fallback sources: {}", degraded.join(", "));
        }

        let analysis = build_analysis(
            &shading,
            &climate,
            avg_climate_efficiency,
            &solar_points,
            external_solar_average,
            centroid,
            pv_yield,
            degraded,
        );

        Ok(EstimateResult {
            area_m2,
            usable_area_m2,
            system_kwp,
            annual_energy_kwh,
            heatmap,
            analysis,
        })
    }

    /// Yearly-energy lookups over the interior solar grid; failed points
    /// are omitted from the fusion set.
    async fn fetch_solar_points(
        &self,
        polygon: &[Coordinate],
        timeout: Duration,
    ) -> Vec<SolarYieldPoint> {
        let cells = grid::sample_grid(polygon, SOLAR_GRID_SIZE);
        let fetches = cells
            .iter()
            .map(|p| with_timeout(timeout, self.solar.fetch_solar_yield(*p)));
        let results = join_all(fetches).await;

        cells
            .into_iter()
            .zip(results)
            .filter_map(|(point, result)| match result {
                Ok(sample) => Some(SolarYieldPoint { point, sample }),
                Err(e) => {
                    log::warn!(
                        "Error fetching solar yield at ({:.4}, {:.4}): {e}",
                        point.lat,
                        point.lng
                    );
                    None
                }
            })
            .collect()
    }

    /// Elevation lookups over the interior shading grid. A point that
    /// fails falls back to 0 m; when every point fails the set is treated
    /// as empty so shading degrades to its fallback profile. Returns the
    /// samples and whether any lookup failed.
    async fn fetch_elevation_samples(
        &self,
        polygon: &[Coordinate],
        timeout: Duration,
    ) -> (Vec<ElevationSample>, bool) {
        let cells = grid::sample_grid(polygon, ELEVATION_GRID_SIZE);
        let fetches = cells
            .iter()
            .map(|p| with_timeout(timeout, self.elevation.fetch_elevation(*p)));
        let results = join_all(fetches).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            log::warn!("Error fetching elevation data: {failed}/{} points failed", results.len());
        }
        if !results.is_empty() && failed == results.len() {
            return (Vec::new(), true);
        }

        let samples = cells
            .into_iter()
            .zip(results)
            .map(|(point, result)| ElevationSample {
                point,
                elevation_m: result.unwrap_or(0.0),
            })
            .collect();
        (samples, failed > 0)
    }
}

async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(limit)),
    }
}

fn region_supported(centroid: &Coordinate) -> bool {
    (REGION_MIN_LAT..=REGION_MAX_LAT).contains(&centroid.lat)
        && (REGION_MIN_LNG..=REGION_MAX_LNG).contains(&centroid.lng)
}

fn average_efficiency(climate: &[MonthlyClimate]) -> f64 {
    if climate.is_empty() {
        return DEFAULT_CLIMATE_EFFICIENCY;
    }
    climate.iter().map(|m| m.efficiency_factor).sum::<f64>() / climate.len() as f64
}

fn external_average(samples: &[SolarYieldPoint]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().map(|s| s.sample.yearly_energy_kwh).sum::<f64>() / samples.len() as f64)
}

/// Nearest item by great-circle distance; ties keep the first encountered,
/// matching the iteration order of the sample sequence.
fn nearest<'a, T>(
    cell: &Coordinate,
    items: &'a [T],
    point_of: impl Fn(&T) -> &Coordinate,
) -> Option<&'a T> {
    let mut best: Option<(&'a T, f64)> = None;
    for item in items {
        let distance = geodesy::haversine_distance_m(cell, point_of(item));
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((item, distance)),
        }
    }
    best.map(|(item, _)| item)
}

// ─── Heatmap fusion ──────────────────────────────────────────

/// Latitude/longitude heuristic intensity surface: the regional average
/// with a small north-south gradient and a slight coastal bonus.
fn base_solar_intensity(lat: f64, lng: f64) -> f64 {
    let lat_factor = 1.0 - (lat - REGION_MIN_LAT) * LAT_INTENSITY_SLOPE;
    let lng_factor = 1.0 + (lng - REFERENCE_LNG) * LNG_INTENSITY_SLOPE;
    BASE_INTENSITY_KWH * lat_factor * lng_factor
}

fn external_solar_factor(cell: &Coordinate, samples: &[SolarYieldPoint]) -> f64 {
    match nearest(cell, samples, |s| &s.point) {
        Some(found) => (found.sample.yearly_energy_kwh / EXTERNAL_BASELINE_KWH).clamp(0.5, 1.5),
        None => 1.0,
    }
}

/// Local shading for one cell: the area-average shading eased off by how
/// far the nearest elevation sample rises above the area mean.
fn local_shading_factor(
    cell: &Coordinate,
    shading: &ShadingAnalysis,
    mean_elevation_m: f64,
) -> f64 {
    match nearest(cell, &shading.samples, |s| &s.point) {
        Some(sample) => {
            let relief = (sample.elevation_m - mean_elevation_m) / RELIEF_NORM_M;
            let adjustment = relief.clamp(0.0, 0.5);
            (shading.average - adjustment).max(0.0)
        }
        None => shading.average,
    }
}

fn color_class(intensity: f64, shadow_factor: f64, weather_factor: f64) -> String {
    let normalized = (intensity / HEATMAP_NORMALIZATION_KWH).clamp(0.0, 1.0);
    let color_intensity = normalized * (1.0 - shadow_factor * 0.5) * weather_factor;

    let hex = if color_intensity >= 0.8 {
        "#00FF00" // excellent
    } else if color_intensity >= 0.6 {
        "#80FF00" // very good
    } else if color_intensity >= 0.4 {
        "#FFFF00" // good
    } else if color_intensity >= 0.2 {
        "#FF8000" // fair
    } else {
        "#FF0000" // poor
    };
    hex.to_string()
}

fn build_heatmap(
    polygon: &[Coordinate],
    solar_points: &[SolarYieldPoint],
    shading: &ShadingAnalysis,
    climate: &[MonthlyClimate],
    avg_climate_efficiency: f64,
) -> Vec<GridCell> {
    let mean_elevation_m = if shading.samples.is_empty() {
        0.0
    } else {
        shading.samples.iter().map(|s| s.elevation_m).sum::<f64>() / shading.samples.len() as f64
    };

    grid::sample_grid(polygon, HEATMAP_GRID_SIZE)
        .into_iter()
        .map(|cell| {
            let base_intensity = base_solar_intensity(cell.lat, cell.lng);
            let solar_factor = external_solar_factor(&cell, solar_points);
            let shadow_factor = local_shading_factor(&cell, shading, mean_elevation_m);
            let intensity =
                base_intensity * solar_factor * avg_climate_efficiency * (1.0 - shadow_factor);

            let monthly_production = climate
                .iter()
                .map(|m| intensity * m.efficiency_factor * AVG_DAYS_PER_MONTH)
                .collect();

            GridCell {
                lat: cell.lat,
                lng: cell.lng,
                intensity,
                base_intensity,
                solar_factor,
                weather_factor: avg_climate_efficiency,
                shadow_factor,
                color: color_class(intensity, shadow_factor, avg_climate_efficiency),
                monthly_production,
            }
        })
        .collect()
}

// ─── Analysis payload ────────────────────────────────────────

fn months_where(climate: &[MonthlyClimate], keep: impl Fn(&MonthlyClimate) -> bool) -> Vec<String> {
    climate
        .iter()
        .filter(|m| keep(m))
        .filter_map(|m| (m.month as usize).checked_sub(1).and_then(|i| MONTH_NAMES.get(i)))
        .map(|name| name.to_string())
        .collect()
}

fn winter_efficiency(climate: &[MonthlyClimate]) -> f64 {
    let winter: Vec<f64> = climate
        .iter()
        .filter(|m| m.month == 12 || m.month == 1 || m.month == 2)
        .map(|m| m.efficiency_factor)
        .collect();
    if winter.is_empty() {
        return 0.5;
    }
    winter.iter().sum::<f64>() / winter.len() as f64
}

fn recommendations(
    shading: &ShadingAnalysis,
    avg_climate_efficiency: f64,
    winter_efficiency: f64,
    external_solar_average: Option<f64>,
) -> Vec<String> {
    let mut out = Vec::new();

    if shading.average > 0.3 {
        out.push("High shading detected. Consider tree trimming or alternative panel placement.".into());
    }
    if shading.morning > 0.4 {
        out.push("Significant morning shading. Consider east-facing installations for better afternoon production.".into());
    }
    if shading.evening > 0.4 {
        out.push("Evening shading detected. West-facing panels may be less efficient.".into());
    }
    if avg_climate_efficiency < 0.7 {
        out.push("Weather conditions may reduce efficiency. Consider higher-efficiency panels.".into());
    }
    if winter_efficiency < 0.4 {
        out.push("Low winter production expected. Consider battery storage or grid-tie systems.".into());
    }
    if let Some(avg) = external_solar_average {
        if avg > 1800.0 {
            out.push("Excellent solar potential according to external irradiance data. High ROI expected.".into());
        } else if avg < 1000.0 {
            out.push("Lower solar potential detected. Consider alternative energy solutions.".into());
        }
    }

    out
}

#[allow(clippy::too_many_arguments)]
fn build_analysis(
    shading: &ShadingAnalysis,
    climate: &[MonthlyClimate],
    avg_climate_efficiency: f64,
    solar_points: &[SolarYieldPoint],
    external_solar_average: Option<f64>,
    centroid: Coordinate,
    pv_yield: PvYieldSummary,
    degraded_sources: Vec<String>,
) -> AnalysisData {
    let overall_shading_factor = 1.0 - shading.average;
    let winter = winter_efficiency(climate);

    let external_sunshine_quantiles = nearest(&centroid, solar_points, |s| &s.point)
        .map(|s| s.sample.sunshine_quantiles.clone())
        .unwrap_or_default();

    AnalysisData {
        shading: ShadingBreakdown {
            average: shading.average,
            morning: shading.morning,
            noon: shading.noon,
            evening: shading.evening,
            winter: shading.winter,
            summer: shading.summer,
        },
        shadow_matrix: shading.shadow_matrix.clone(),
        average_climate_efficiency: avg_climate_efficiency,
        monthly_climate: climate.to_vec(),
        best_production_months: months_where(climate, |m| m.efficiency_factor > 0.85),
        worst_production_months: months_where(climate, |m| m.efficiency_factor < 0.6),
        external_solar_available: !solar_points.is_empty(),
        external_solar_average_kwh: external_solar_average,
        external_sunshine_quantiles,
        overall_shading_factor,
        combined_efficiency_factor: overall_shading_factor * avg_climate_efficiency,
        recommendations: recommendations(
            shading,
            avg_climate_efficiency,
            winter,
            external_solar_average,
        ),
        pv_yield,
        degraded_sources,
    }
}
