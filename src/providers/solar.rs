use serde::Deserialize;

use crate::error::FetchError;
use crate::geo::coordinate::Coordinate;
use crate::providers::SolarYieldProvider;

const SOLAR_API_BASE_URL: &str = "https://solar.googleapis.com/v1";

/// One third-party solar observation: yearly DC energy for the closest
/// surveyed installation plus its sunshine distribution.
#[derive(Debug, Clone)]
pub struct SolarYieldSample {
    pub yearly_energy_kwh: f64,
    pub sunshine_quantiles: Vec<f64>,
}

/// Google Solar API client (`buildingInsights:findClosest`).
pub struct GoogleSolarClient {
    http: reqwest::Client,
    api_key: String,
}

impl GoogleSolarClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

impl SolarYieldProvider for GoogleSolarClient {
    async fn fetch_solar_yield(&self, point: Coordinate) -> Result<SolarYieldSample, FetchError> {
        let url = format!("{}/buildingInsights:findClosest", SOLAR_API_BASE_URL);
        let response: BuildingInsights = self
            .http
            .get(url)
            .query(&[
                ("location.latitude", format!("{:.6}", point.lat)),
                ("location.longitude", format!("{:.6}", point.lng)),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let potential = response
            .solar_potential
            .ok_or_else(|| FetchError::Payload("no solar potential for location".into()))?;
        let yearly = potential
            .yearly_energy_dc_kwh
            .ok_or_else(|| FetchError::Payload("solar potential without yearly energy".into()))?;

        Ok(SolarYieldSample {
            yearly_energy_kwh: yearly,
            sunshine_quantiles: potential.sunshine_quantiles.unwrap_or_default(),
        })
    }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildingInsights {
    solar_potential: Option<SolarPotential>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolarPotential {
    yearly_energy_dc_kwh: Option<f64>,
    sunshine_quantiles: Option<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_building_insights() {
        let body = r#"{
            "solarPotential": {
                "yearlyEnergyDcKwh": 1723.5,
                "sunshineQuantiles": [0.1, 0.5, 0.9],
                "carbonOffsetFactorKgPerMwh": 420.0
            },
            "imageryDate": {"year": 2024, "month": 6, "day": 1}
        }"#;
        let parsed: BuildingInsights = serde_json::from_str(body).unwrap();
        let potential = parsed.solar_potential.unwrap();
        assert_eq!(potential.yearly_energy_dc_kwh, Some(1723.5));
        assert_eq!(potential.sunshine_quantiles.unwrap().len(), 3);
    }

    #[test]
    fn tolerates_empty_insights() {
        let parsed: BuildingInsights = serde_json::from_str("{}").unwrap();
        assert!(parsed.solar_potential.is_none());
    }
}
