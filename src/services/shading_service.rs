/// ============================================================
///  Terrain Self-Shading Simulation
///
///  Algorithm pipeline:
///   1. Sun geometry     – simplified azimuth/elevation from local hour
///                         and a seasonal reference angle (no ephemeris)
///   2. Shadow casting   – pairwise elevation-vs-distance test between
///                         sample points along the sun direction
///   3. Shadow intensity – worst-case occluder height, normalized to a
///                         100 m reference and clamped to [0, 1]
///   4. Aggregation      – morning/noon/evening hours plus the two
///                         solstice tilts, averaged into one profile,
///                         with a fixed-size noon shadow matrix
/// ============================================================

use crate::geo::coordinate::Coordinate;
use crate::geo::geodesy::haversine_distance_m;

// ─── Model constants ─────────────────────────────────────────

/// Axial tilt used as the solstice reference angle (degrees).
const SOLSTICE_TILT_DEG: f64 = 23.5;
/// Occluder height that counts as full shadow (meters).
const SHADOW_HEIGHT_NORM_M: f64 = 100.0;
/// Side length of the square shadow-intensity matrix.
const SHADOW_MATRIX_SIZE: usize = 10;

const MORNING_HOUR: f64 = 8.0;
const NOON_HOUR: f64 = 12.0;
const EVENING_HOUR: f64 = 17.0;

// ─── Types ───────────────────────────────────────────────────

/// Terrain elevation at one grid point. Owned by a single estimation call.
#[derive(Debug, Clone, Copy)]
pub struct ElevationSample {
    pub point: Coordinate,
    pub elevation_m: f64,
}

/// Sun direction for one (location, hour, season) query. Recomputed per
/// query, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

/// Aggregated shading profile for one area.
#[derive(Debug, Clone)]
pub struct ShadingAnalysis {
    pub average: f64,
    pub morning: f64,
    pub noon: f64,
    pub evening: f64,
    pub winter: f64,
    pub summer: f64,
    pub samples: Vec<ElevationSample>,
    pub shadow_matrix: Vec<Vec<f64>>,
}

impl ShadingAnalysis {
    /// Conservative profile used when no elevation data is available.
    /// Shading unavailability must never abort an estimate.
    pub fn fallback() -> Self {
        Self {
            average: 0.2,
            morning: 0.3,
            noon: 0.1,
            evening: 0.25,
            winter: 0.4,
            summer: 0.15,
            samples: Vec::new(),
            shadow_matrix: Vec::new(),
        }
    }
}

// ─── Sun geometry ────────────────────────────────────────────

/// Simplified sun position: 15°/hour azimuth sweep around due south and a
/// sine-of-day elevation arc capped by `90° - |lat - reference|`. Chosen
/// for determinism and speed over astronomical precision.
pub fn sun_position(lat: f64, _lng: f64, hour: f64, reference_angle_deg: f64) -> SunPosition {
    let azimuth_deg = 180.0 + (hour - 12.0) * 15.0;
    let max_elevation = 90.0 - (lat - reference_angle_deg).abs();
    let hour_factor = ((hour - 6.0) * 15.0).to_radians().sin();
    SunPosition {
        azimuth_deg,
        elevation_deg: (max_elevation * hour_factor).max(0.0),
    }
}

// ─── Shadow casting ──────────────────────────────────────────

/// Whether `source` shades `target` under the given sun.
///
/// Only higher sources can cast; a sun at or below the horizon casts an
/// unbounded shadow (tan → 0 would otherwise divide away), so any higher
/// neighbor shades the target.
pub fn casts_shadow(source: &ElevationSample, target: &ElevationSample, sun: &SunPosition) -> bool {
    if source.elevation_m <= target.elevation_m {
        return false;
    }
    if sun.elevation_deg <= 0.0 {
        return true;
    }
    let shadow_length_m =
        (source.elevation_m - target.elevation_m) / sun.elevation_deg.to_radians().tan();
    haversine_distance_m(&source.point, &target.point) <= shadow_length_m
}

/// Shadow intensity at `target` in [0, 1]: the tallest effective occluder
/// height across all casting sources, normalized to 100 m.
pub fn shadow_intensity(
    target: &ElevationSample,
    samples: &[ElevationSample],
    sun: &SunPosition,
) -> f64 {
    if sun.elevation_deg <= 0.0 {
        // Horizon sun: full shadow whenever anything stands higher.
        let occluded = samples.iter().any(|s| s.elevation_m > target.elevation_m);
        return if occluded { 1.0 } else { 0.0 };
    }

    let mut max_height_m = 0.0_f64;
    for source in samples {
        if casts_shadow(source, target, sun) {
            let height_m =
                (source.elevation_m - target.elevation_m) / sun.elevation_deg.to_radians().sin();
            max_height_m = max_height_m.max(height_m);
        }
    }
    (max_height_m / SHADOW_HEIGHT_NORM_M).clamp(0.0, 1.0)
}

// ─── Aggregation ─────────────────────────────────────────────

fn is_shaded(target: &ElevationSample, samples: &[ElevationSample], sun: &SunPosition) -> bool {
    samples.iter().any(|s| casts_shadow(s, target, sun))
}

/// Mean shadow intensity over the points that are shaded at all; 0 when
/// nothing is shaded.
fn mean_shading(samples: &[ElevationSample], sun: &SunPosition) -> f64 {
    let mut total = 0.0;
    let mut shaded = 0usize;
    for target in samples {
        if is_shaded(target, samples, sun) {
            total += shadow_intensity(target, samples, sun);
            shaded += 1;
        }
    }
    if shaded > 0 { total / shaded as f64 } else { 0.0 }
}

fn shading_at_hour(lat: f64, lng: f64, samples: &[ElevationSample], hour: f64) -> f64 {
    let sun = sun_position(lat, lng, hour, SOLSTICE_TILT_DEG);
    mean_shading(samples, &sun)
}

fn seasonal_shading(lat: f64, lng: f64, samples: &[ElevationSample], tilt_deg: f64) -> f64 {
    // At solar noon the hour factor is 1, so elevation reduces to
    // 90° - |lat - tilt|, the seasonal worst/best case.
    let sun = sun_position(lat, lng, NOON_HOUR, tilt_deg);
    mean_shading(samples, &sun)
}

/// Noon shadow-intensity matrix over the first `SHADOW_MATRIX_SIZE²`
/// samples; rows past the sample count are zero-filled.
fn shadow_matrix(samples: &[ElevationSample]) -> Vec<Vec<f64>> {
    let mut matrix = Vec::with_capacity(SHADOW_MATRIX_SIZE);
    for i in 0..SHADOW_MATRIX_SIZE {
        let mut row = Vec::with_capacity(SHADOW_MATRIX_SIZE);
        for j in 0..SHADOW_MATRIX_SIZE {
            let idx = i * SHADOW_MATRIX_SIZE + j;
            match samples.get(idx) {
                Some(target) => {
                    let sun = sun_position(
                        target.point.lat,
                        target.point.lng,
                        NOON_HOUR,
                        SOLSTICE_TILT_DEG,
                    );
                    row.push(shadow_intensity(target, samples, &sun));
                }
                None => row.push(0.0),
            }
        }
        matrix.push(row);
    }
    matrix
}

/// Full shading profile for an area: three fixed hours, the two solstice
/// tilts, their average, and the noon matrix. An empty sample set (adapter
/// failure, or a polygon with no interior grid point) yields the fixed
/// fallback profile instead of an error.
pub fn detailed_shading(lat: f64, lng: f64, samples: Vec<ElevationSample>) -> ShadingAnalysis {
    if samples.is_empty() {
        return ShadingAnalysis::fallback();
    }

    let noon_sun = sun_position(lat, lng, NOON_HOUR, SOLSTICE_TILT_DEG);
    log::debug!(
        "shading {} samples at ({lat:.4}, {lng:.4}), noon sun azimuth {:.1}° elevation {:.1}°",
        samples.len(),
        noon_sun.azimuth_deg,
        noon_sun.elevation_deg
    );

    let morning = shading_at_hour(lat, lng, &samples, MORNING_HOUR);
    let noon = shading_at_hour(lat, lng, &samples, NOON_HOUR);
    let evening = shading_at_hour(lat, lng, &samples, EVENING_HOUR);
    let winter = seasonal_shading(lat, lng, &samples, -SOLSTICE_TILT_DEG);
    let summer = seasonal_shading(lat, lng, &samples, SOLSTICE_TILT_DEG);
    let average = (morning + noon + evening + winter + summer) / 5.0;

    let shadow_matrix = shadow_matrix(&samples);

    ShadingAnalysis {
        average,
        morning,
        noon,
        evening,
        winter,
        summer,
        samples,
        shadow_matrix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(lat: f64, lng: f64, elevation_m: f64) -> ElevationSample {
        ElevationSample {
            point: Coordinate::new(lat, lng).unwrap(),
            elevation_m,
        }
    }

    #[test]
    fn sun_sweeps_fifteen_degrees_per_hour() {
        let at_8 = sun_position(38.7, -9.1, 8.0, SOLSTICE_TILT_DEG);
        let at_12 = sun_position(38.7, -9.1, 12.0, SOLSTICE_TILT_DEG);
        let at_17 = sun_position(38.7, -9.1, 17.0, SOLSTICE_TILT_DEG);
        assert_eq!(at_8.azimuth_deg, 120.0);
        assert_eq!(at_12.azimuth_deg, 180.0);
        assert_eq!(at_17.azimuth_deg, 255.0);
        assert!(at_12.elevation_deg > at_8.elevation_deg);
        assert!(at_12.elevation_deg > at_17.elevation_deg);
    }

    #[test]
    fn noon_elevation_is_latitude_capped() {
        let noon = sun_position(38.7, -9.1, 12.0, SOLSTICE_TILT_DEG);
        // hour factor is exactly 1 at noon
        assert!((noon.elevation_deg - (90.0 - (38.7 - 23.5))).abs() < 1e-9);
    }

    #[test]
    fn polar_winter_sun_stays_below_horizon() {
        // 70°N against the winter tilt: 90 - |70 + 23.5| < 0, clamped to 0
        let sun = sun_position(70.0, 20.0, 12.0, -SOLSTICE_TILT_DEG);
        assert_eq!(sun.elevation_deg, 0.0);
    }

    #[test]
    fn lower_sources_never_cast() {
        let high = sample(38.70, -9.15, 100.0);
        let low = sample(38.701, -9.15, 20.0);
        let sun = sun_position(38.7, -9.15, 12.0, SOLSTICE_TILT_DEG);
        assert!(!casts_shadow(&low, &high, &sun));
    }

    #[test]
    fn tall_near_source_casts_under_low_sun() {
        let source = sample(38.7000, -9.15, 90.0);
        let target = sample(38.7005, -9.15, 10.0); // ~56 m away, 80 m below
        let low_sun = SunPosition { azimuth_deg: 180.0, elevation_deg: 10.0 };
        let high_sun = SunPosition { azimuth_deg: 180.0, elevation_deg: 80.0 };
        assert!(casts_shadow(&source, &target, &low_sun));
        assert!(!casts_shadow(&source, &target, &high_sun));
    }

    #[test]
    fn horizon_sun_means_always_shadowed() {
        let source = sample(38.70, -9.15, 50.0);
        let target = sample(38.74, -9.11, 10.0); // kilometers away
        let sun = SunPosition { azimuth_deg: 180.0, elevation_deg: 0.0 };
        assert!(casts_shadow(&source, &target, &sun));
        assert_eq!(shadow_intensity(&target, &[source], &sun), 1.0);
    }

    #[test]
    fn intensity_monotone_in_elevation_difference() {
        let sun = SunPosition { azimuth_deg: 180.0, elevation_deg: 25.0 };
        let target = sample(38.7005, -9.15, 0.0);
        let mut previous = 0.0;
        for source_height in [10.0, 30.0, 60.0, 90.0] {
            let source = sample(38.7000, -9.15, source_height);
            let intensity = shadow_intensity(&target, &[source], &sun);
            assert!(
                intensity >= previous,
                "intensity dropped from {previous} to {intensity} at {source_height} m"
            );
            previous = intensity;
        }
        assert!(previous > 0.0);
    }

    #[test]
    fn intensity_is_clamped() {
        let sun = SunPosition { azimuth_deg: 180.0, elevation_deg: 5.0 };
        let target = sample(38.7005, -9.15, 0.0);
        let towering = sample(38.7000, -9.15, 500.0);
        assert_eq!(shadow_intensity(&target, &[towering], &sun), 1.0);
    }

    #[test]
    fn flat_terrain_has_no_shading() {
        let samples: Vec<ElevationSample> = (0..9)
            .map(|i| sample(38.70 + 0.001 * i as f64, -9.15, 40.0))
            .collect();
        let analysis = detailed_shading(38.705, -9.15, samples);
        assert_eq!(analysis.average, 0.0);
        assert_eq!(analysis.noon, 0.0);
        assert_eq!(analysis.winter, 0.0);
    }

    #[test]
    fn empty_samples_yield_fallback_profile() {
        let analysis = detailed_shading(38.7, -9.1, Vec::new());
        assert_eq!(analysis.average, 0.2);
        assert_eq!(analysis.morning, 0.3);
        assert_eq!(analysis.noon, 0.1);
        assert_eq!(analysis.evening, 0.25);
        assert_eq!(analysis.winter, 0.4);
        assert_eq!(analysis.summer, 0.15);
        assert!(analysis.samples.is_empty());
        assert!(analysis.shadow_matrix.is_empty());
    }

    #[test]
    fn ridge_shades_the_valley() {
        // a 120 m ridge towering over close valley points
        let mut samples = vec![sample(38.7000, -9.15, 120.0)];
        for i in 1..6 {
            samples.push(sample(38.7000 + 0.0004 * i as f64, -9.15, 5.0));
        }
        let analysis = detailed_shading(38.701, -9.15, samples);
        assert!(analysis.average > 0.0);
        assert!(analysis.winter >= analysis.summer, "low winter sun casts longer shadows");
    }

    #[test]
    fn shadow_matrix_is_fixed_size() {
        let samples: Vec<ElevationSample> = (0..5)
            .map(|i| sample(38.70 + 0.001 * i as f64, -9.15, 10.0 * i as f64))
            .collect();
        let analysis = detailed_shading(38.702, -9.15, samples);
        assert_eq!(analysis.shadow_matrix.len(), 10);
        assert!(analysis.shadow_matrix.iter().all(|row| row.len() == 10));
        // rows beyond the sample count stay zero
        assert_eq!(analysis.shadow_matrix[5][0], 0.0);
    }
}
