use serde::Deserialize;

use crate::error::FetchError;
use crate::geo::coordinate::Coordinate;
use crate::providers::ElevationProvider;

const ELEVATION_API_URL: &str = "https://maps.googleapis.com/maps/api/elevation/json";

/// Google Elevation API client, one point per request.
pub struct GoogleElevationClient {
    http: reqwest::Client,
    api_key: String,
}

impl GoogleElevationClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

impl ElevationProvider for GoogleElevationClient {
    async fn fetch_elevation(&self, point: Coordinate) -> Result<f64, FetchError> {
        let response: ElevationResponse = self
            .http
            .get(ELEVATION_API_URL)
            .query(&[
                ("locations", format!("{:.6},{:.6}", point.lat, point.lng)),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            return Err(FetchError::Payload(format!(
                "elevation lookup status {}",
                response.status
            )));
        }
        response
            .results
            .first()
            .map(|r| r.elevation)
            .ok_or_else(|| FetchError::Payload("empty elevation results".into()))
    }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    #[serde(default)]
    results: Vec<ElevationResult>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_elevation_payload() {
        let body = r#"{
            "results": [{"elevation": 233.1, "location": {"lat": 38.7, "lng": -9.1}}],
            "status": "OK"
        }"#;
        let parsed: ElevationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.results[0].elevation, 233.1);
    }

    #[test]
    fn tolerates_missing_results() {
        let parsed: ElevationResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS"}"#).unwrap();
        assert!(parsed.results.is_empty());
    }
}
