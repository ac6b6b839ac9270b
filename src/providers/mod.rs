// External signal adapters. Each trait is one logical contract the
// estimation engine consumes; the HTTP implementations live alongside and
// can be swapped for deterministic fakes in tests. Fallback values for
// failed lookups are applied by the engine, not here.

pub mod elevation;
pub mod pvgis;
pub mod solar;
pub mod weather;

use crate::error::FetchError;
use crate::geo::coordinate::Coordinate;
use crate::models::climate::MonthlyClimate;
use crate::providers::pvgis::PvYield;
use crate::providers::solar::SolarYieldSample;

/// Per-point terrain elevation lookup. Fallback: 0.0 m per point; a call
/// where every point fails yields an empty elevation set.
pub trait ElevationProvider: Send + Sync {
    async fn fetch_elevation(&self, point: Coordinate) -> Result<f64, FetchError>;
}

/// Third-party yearly-energy lookup for one location. Fallback: the point
/// is omitted from the fusion set.
pub trait SolarYieldProvider: Send + Sync {
    async fn fetch_solar_yield(&self, point: Coordinate) -> Result<SolarYieldSample, FetchError>;
}

/// Monthly climate table for a region. Fallback: the built-in Portugal
/// reference table.
pub trait ClimateProvider: Send + Sync {
    async fn fetch_monthly_climate(&self, lat: f64, lng: f64)
    -> Result<Vec<MonthlyClimate>, FetchError>;
}

/// Annual PV yield with monthly breakdown for a given peak capacity.
/// Fallback: `PvYield::fallback`.
pub trait PvYieldProvider: Send + Sync {
    async fn fetch_annual_yield(
        &self,
        lat: f64,
        lng: f64,
        peak_kwp: f64,
    ) -> Result<PvYield, FetchError>;
}
