//! Wind conditions driving the simulated period
//!
//! The engine consumes a single wind speed and compass direction for the whole
//! run. Archive services usually report a speed band rather than one number, so
//! this module also carries the band (`WindEnvelope`) and the triangular fuzzy
//! defuzzification used to collapse it.

use crate::core_types::units::{Degrees, MetersPerSecond};
use serde::{Deserialize, Serialize};

/// Half-width of the speed band built around a point observation (m/s)
pub const DEFAULT_WIND_BAND: f64 = 1.0;

/// Wind speed and direction for the simulated period
///
/// # Example
/// ```
/// use fire_ca_core::WindConditions;
///
/// let wind = WindConditions::new(4.5, 45.0);
/// assert!(!wind.is_calm());
/// assert_eq!(*wind.direction, 45.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindConditions {
    /// Wind speed at 10 m (m/s, >= 0)
    pub speed: MetersPerSecond,
    /// Direction the wind blows toward, 0° = North, clockwise
    pub direction: Degrees,
}

impl WindConditions {
    /// Create wind conditions from raw speed (m/s) and compass direction (degrees)
    pub fn new(speed_mps: f64, direction_deg: f64) -> Self {
        Self {
            speed: MetersPerSecond::new(speed_mps),
            direction: Degrees::new(direction_deg),
        }
    }

    /// Calm air (zero speed, northerly bearing)
    pub fn calm() -> Self {
        Self::default()
    }

    /// A calm wind has no meaningful bearing
    pub fn is_calm(&self) -> bool {
        *self.speed == 0.0
    }
}

/// Speed band reported by a weather archive for the requested hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindEnvelope {
    /// Lower bound of the speed band (m/s)
    pub min_speed: f64,
    /// Upper bound of the speed band (m/s)
    pub max_speed: f64,
    /// Compass direction (degrees, 0° = North)
    pub direction: f64,
}

impl WindEnvelope {
    /// Build a band of ±`delta` around a point observation, floored at 0
    pub fn around(speed: f64, delta: f64, direction: f64) -> Self {
        Self {
            min_speed: (speed - delta).max(0.0),
            max_speed: speed + delta,
            direction,
        }
    }

    /// Collapse the band into a single representative wind
    pub fn to_conditions(&self) -> WindConditions {
        WindConditions::new(fuzzy_wind(self.min_speed, self.max_speed), self.direction)
    }
}

/// Defuzzify a speed band with a triangular membership centred on the midpoint:
/// `(min + 2·mid + max) / 4`
pub fn fuzzy_wind(min_speed: f64, max_speed: f64) -> f64 {
    let mid = (min_speed + max_speed) / 2.0;
    (min_speed + 2.0 * mid + max_speed) / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_wind_is_midpoint_for_symmetric_band() {
        assert!((fuzzy_wind(2.0, 4.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_envelope_floors_at_zero() {
        let env = WindEnvelope::around(0.4, DEFAULT_WIND_BAND, 270.0);
        assert_eq!(env.min_speed, 0.0);
        assert!((env.max_speed - 1.4).abs() < 1e-12);

        // Band is asymmetric after flooring, so the fuzzy speed moves up
        let wind = env.to_conditions();
        assert!((*wind.speed - 0.7).abs() < 1e-12);
        assert_eq!(*wind.direction, 270.0);
    }

    #[test]
    fn test_calm() {
        assert!(WindConditions::calm().is_calm());
        assert!(!WindConditions::new(0.1, 0.0).is_calm());
    }
}
