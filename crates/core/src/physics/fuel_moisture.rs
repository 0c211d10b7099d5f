//! Remote-sensing fuel moisture estimate
//!
//! Live-fuel moisture is approximated from two rasters: greener vegetation
//! (higher NDVI) holds more water, hot land surfaces (LST above 25 °C) dry it out.
//!
//! ```text
//! FMC% = 15 + 60·NDVI − 0.6·max(0, LST − 25)      clipped to [12, 55]
//! ```

use crate::core_types::units::Celsius;

/// Lower bound of plausible fuel moisture content (%)
pub const FMC_MIN_PERCENT: f64 = 12.0;

/// Upper bound of plausible fuel moisture content (%)
pub const FMC_MAX_PERCENT: f64 = 55.0;

/// Surface temperature above which fuels start drying (°C)
const DRYING_ONSET_CELSIUS: f64 = 25.0;

/// Estimate fuel moisture content as a fraction (0.12-0.55)
///
/// # Arguments
/// * `ndvi` - Vegetation index (roughly -1 to 1)
/// * `lst` - Land-surface temperature
pub fn fuel_moisture_fraction(ndvi: f64, lst: Celsius) -> f64 {
    let drying = 0.6 * (*lst - DRYING_ONSET_CELSIUS).max(0.0);
    let percent = 15.0 + 60.0 * ndvi - drying;
    percent.clamp(FMC_MIN_PERCENT, FMC_MAX_PERCENT) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greener_is_wetter() {
        let dry = fuel_moisture_fraction(0.1, Celsius::new(25.0));
        let green = fuel_moisture_fraction(0.5, Celsius::new(25.0));
        assert!(green > dry);
        assert!((dry - 0.21).abs() < 1e-12);
        assert!((green - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_heat_only_dries_above_onset() {
        let cool = fuel_moisture_fraction(0.3, Celsius::new(10.0));
        let onset = fuel_moisture_fraction(0.3, Celsius::new(25.0));
        let hot = fuel_moisture_fraction(0.3, Celsius::new(35.0));
        assert_eq!(cool, onset);
        assert!((onset - hot - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_clipped_to_plausible_range() {
        assert_eq!(fuel_moisture_fraction(-1.0, Celsius::new(60.0)), 0.12);
        assert_eq!(fuel_moisture_fraction(1.0, Celsius::new(0.0)), 0.55);
    }
}
