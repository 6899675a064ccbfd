//! Scalar metrics displayed on the report panels.

use serde::{Deserialize, Serialize};

/// Synthetic environmental metrics for one location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    /// Fire risk, percent in [0, 5]
    pub fire_risk: u8,
    /// Landslide risk, percent in [0, 5]
    pub landslide_risk: u8,
    /// Elevation, meters in [0, 300]
    pub elevation: u16,
    /// Slope, degrees in [0, 100]
    pub slope: u8,
    /// Temperature, °C in [20, 42] with one decimal
    pub temperature: f32,
    /// Rain probability, percent in [0, 100]
    pub rain_probability: u8,
    /// Wind speed, knots in [0, 25]
    pub wind_speed: u8,
}

impl MetricSet {
    pub const RISK_RANGE: (u8, u8) = (0, 5);
    pub const ELEVATION_RANGE: (u16, u16) = (0, 300);
    pub const SLOPE_RANGE: (u8, u8) = (0, 100);
    pub const TEMPERATURE_RANGE: (f32, f32) = (20.0, 42.0);
    pub const RAIN_RANGE: (u8, u8) = (0, 100);
    pub const WIND_RANGE: (u8, u8) = (0, 25);

    /// Check every field against its documented domain.
    pub fn is_within_domain(&self) -> bool {
        let (risk_lo, risk_hi) = Self::RISK_RANGE;
        let (t_lo, t_hi) = Self::TEMPERATURE_RANGE;

        (risk_lo..=risk_hi).contains(&self.fire_risk)
            && (risk_lo..=risk_hi).contains(&self.landslide_risk)
            && self.elevation <= Self::ELEVATION_RANGE.1
            && self.slope <= Self::SLOPE_RANGE.1
            && self.temperature >= t_lo
            && self.temperature <= t_hi
            && self.rain_probability <= Self::RAIN_RANGE.1
            && self.wind_speed <= Self::WIND_RANGE.1
    }
}
