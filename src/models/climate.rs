use serde::Serialize;
use utoipa::ToSchema;

/// One month of climate normals affecting PV production.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyClimate {
    /// Calendar month, 1-12
    pub month: u32,
    /// Average daily sun hours
    pub avg_sun_hours: f64,
    /// Relative humidity (%)
    pub humidity_pct: f64,
    /// Precipitation indicator for the month
    pub rainy_days: f64,
    /// Mean air temperature (°C)
    pub temperature_c: f64,
    /// Net panel efficiency factor [0..1] under these conditions
    pub efficiency_factor: f64,
}

/// Continental Portugal monthly climate normals (historical averages).
/// Initialized once, read-only for the process lifetime.
pub const PORTUGAL_CLIMATE: [MonthlyClimate; 12] = [
    MonthlyClimate { month: 1,  avg_sun_hours: 6.2,  humidity_pct: 55.0, rainy_days: 120.0, temperature_c: 12.5, efficiency_factor: 0.65 },
    MonthlyClimate { month: 2,  avg_sun_hours: 7.1,  humidity_pct: 52.0, rainy_days: 110.0, temperature_c: 14.1, efficiency_factor: 0.70 },
    MonthlyClimate { month: 3,  avg_sun_hours: 8.5,  humidity_pct: 48.0, rainy_days: 95.0,  temperature_c: 16.8, efficiency_factor: 0.75 },
    MonthlyClimate { month: 4,  avg_sun_hours: 9.8,  humidity_pct: 45.0, rainy_days: 80.0,  temperature_c: 18.9, efficiency_factor: 0.82 },
    MonthlyClimate { month: 5,  avg_sun_hours: 11.5, humidity_pct: 38.0, rainy_days: 60.0,  temperature_c: 22.3, efficiency_factor: 0.88 },
    MonthlyClimate { month: 6,  avg_sun_hours: 12.8, humidity_pct: 25.0, rainy_days: 25.0,  temperature_c: 26.1, efficiency_factor: 0.95 },
    MonthlyClimate { month: 7,  avg_sun_hours: 13.2, humidity_pct: 15.0, rainy_days: 5.0,   temperature_c: 28.7, efficiency_factor: 0.98 },
    MonthlyClimate { month: 8,  avg_sun_hours: 12.9, humidity_pct: 18.0, rainy_days: 10.0,  temperature_c: 28.9, efficiency_factor: 0.96 },
    MonthlyClimate { month: 9,  avg_sun_hours: 11.1, humidity_pct: 32.0, rainy_days: 45.0,  temperature_c: 26.2, efficiency_factor: 0.90 },
    MonthlyClimate { month: 10, avg_sun_hours: 9.2,  humidity_pct: 48.0, rainy_days: 85.0,  temperature_c: 21.8, efficiency_factor: 0.78 },
    MonthlyClimate { month: 11, avg_sun_hours: 7.5,  humidity_pct: 58.0, rainy_days: 115.0, temperature_c: 16.9, efficiency_factor: 0.68 },
    MonthlyClimate { month: 12, avg_sun_hours: 6.8,  humidity_pct: 60.0, rainy_days: 130.0, temperature_c: 13.8, efficiency_factor: 0.62 },
];

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_months_in_calendar_order() {
        for (i, m) in PORTUGAL_CLIMATE.iter().enumerate() {
            assert_eq!(m.month, i as u32 + 1);
        }
    }

    #[test]
    fn efficiency_factors_are_fractions() {
        for m in &PORTUGAL_CLIMATE {
            assert!(m.efficiency_factor > 0.0 && m.efficiency_factor <= 1.0);
        }
    }

    #[test]
    fn summer_outperforms_winter() {
        let july = &PORTUGAL_CLIMATE[6];
        let december = &PORTUGAL_CLIMATE[11];
        assert!(july.efficiency_factor > december.efficiency_factor);
        assert!(july.avg_sun_hours > december.avg_sun_hours);
    }
}
