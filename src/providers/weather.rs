use crate::error::FetchError;
use crate::models::climate::{MonthlyClimate, PORTUGAL_CLIMATE};
use crate::providers::ClimateProvider;

/// Monthly climate normals for the supported region.
///
/// There is no public API serving monthly normals, so this provider embeds
/// the historical-average table; the trait boundary keeps the engine
/// oblivious and lets tests substitute degraded or exotic climates.
pub struct RegionalClimateService;

impl ClimateProvider for RegionalClimateService {
    async fn fetch_monthly_climate(
        &self,
        _lat: f64,
        _lng: f64,
    ) -> Result<Vec<MonthlyClimate>, FetchError> {
        Ok(PORTUGAL_CLIMATE.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_the_reference_table() {
        let table = RegionalClimateService
            .fetch_monthly_climate(38.7, -9.1)
            .await
            .unwrap();
        assert_eq!(table.len(), 12);
        assert_eq!(table[0].month, 1);
        assert_eq!(table[6].efficiency_factor, 0.98);
    }
}
