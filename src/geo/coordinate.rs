use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EstimateError;

/// WGS84 latitude/longitude pair, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Range-checked construction. Out-of-range input is rejected here and
    /// never reaches the estimation engine.
    pub fn new(lat: f64, lng: f64) -> Result<Self, EstimateError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(EstimateError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_range() {
        assert!(Coordinate::new(38.7, -9.15).is_ok());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(EstimateError::InvalidCoordinate { lat: 91.0, lng: 0.0 })
        );
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }
}
