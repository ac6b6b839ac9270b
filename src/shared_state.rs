use std::sync::Arc;

use crate::config::Config;
use crate::providers::elevation::GoogleElevationClient;
use crate::providers::pvgis::PvgisClient;
use crate::providers::solar::GoogleSolarClient;
use crate::providers::weather::RegionalClimateService;
use crate::services::estimation_service::EstimationEngine;

/// Engine wired to the production signal providers.
pub type HttpEngine =
    EstimationEngine<GoogleSolarClient, RegionalClimateService, GoogleElevationClient, PvgisClient>;

/// Immutable per-process state shared by all request handlers. No locks:
/// every estimation call owns its own data.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<HttpEngine>,
}

impl AppState {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let engine = EstimationEngine::new(
            config.solar.clone(),
            GoogleSolarClient::new(http.clone(), config.google.api_key.clone()),
            RegionalClimateService,
            GoogleElevationClient::new(http.clone(), config.google.api_key.clone()),
            PvgisClient::new(http),
        );
        Self { engine: Arc::new(engine) }
    }
}
