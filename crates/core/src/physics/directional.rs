//! Anisotropic spread multiplier for one neighbour pair
//!
//! The front spreads fastest along a resultant direction built from the wind and
//! from the neighbour bearing itself:
//!
//! ```text
//! r̂ = normalize(0.7·ŵ + 0.3·b̂)
//! scale = 0                              if b̂·r̂ ≤ 0
//!       = base + (1 − base)·(b̂·r̂)        otherwise
//! ```
//!
//! The `0.3·b̂` term stands in for a slope contribution but uses the bearing to
//! the neighbour, not the terrain gradient. It is kept for behavioural
//! compatibility with existing calibrations and should not be read as a slope
//! model: terrain slope only enters the spread rate through Rothermel.

use crate::core_types::units::Degrees;
use nalgebra::Vector2;

/// Weight of the wind direction in the resultant
pub const WIND_WEIGHT: f64 = 0.7;

/// Weight of the neighbour bearing in the resultant
pub const BEARING_WEIGHT: f64 = 0.3;

/// Unit vector pointing from `(from_row, from_col)` to `(to_row, to_col)` in
/// east/north axes. Rows grow southward, so the row delta is negated.
fn bearing(from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> Vector2<f64> {
    let dy = to_row as f64 - from_row as f64;
    let dx = to_col as f64 - from_col as f64;
    let angle = (-dy).atan2(dx);
    Vector2::new(angle.cos(), angle.sin())
}

/// Unit vector of the wind (compass bearing, 0° = North, clockwise)
pub fn wind_vector(wind_dir: Degrees) -> Vector2<f64> {
    let angle = wind_dir.compass_to_math_radians();
    Vector2::new(angle.cos(), angle.sin())
}

/// Spread multiplier in `[0, 1]` for fire travelling from one cell to a neighbour
///
/// Zero for every bearing more than 90° away from the resultant direction.
/// Coincident cells have no bearing and fall back to the positive x axis.
pub fn directional_scale(
    from_row: usize,
    from_col: usize,
    to_row: usize,
    to_col: usize,
    wind_dir: Degrees,
    dir_base: f64,
) -> f64 {
    let b = bearing(from_row, from_col, to_row, to_col);
    let blend = wind_vector(wind_dir) * WIND_WEIGHT + b * BEARING_WEIGHT;
    let norm = blend.norm();
    let resultant = if norm > 0.0 { blend / norm } else { blend };

    let cos_theta = b.dot(&resultant);
    if cos_theta <= 0.0 {
        return 0.0;
    }
    dir_base + (1.0 - dir_base) * cos_theta
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BASE: f64 = 0.40;

    #[test]
    fn test_downwind_neighbour_gets_full_scale() {
        // Wind toward east (90°), neighbour directly east
        let s = directional_scale(5, 5, 5, 6, Degrees::new(90.0), BASE);
        assert_relative_eq!(s, 1.0, max_relative = 1e-12);

        // Wind toward north (0°), neighbour on the row above
        let s = directional_scale(5, 5, 4, 5, Degrees::new(0.0), BASE);
        assert_relative_eq!(s, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_upwind_neighbour_gets_zero() {
        // Wind toward east, neighbour west: 0.7 outweighs 0.3, resultant stays east
        assert_eq!(directional_scale(5, 5, 5, 4, Degrees::new(90.0), BASE), 0.0);
    }

    #[test]
    fn test_crosswind_neighbour_is_partial() {
        // Wind toward east, neighbour north: resultant tilts 23° toward north
        let s = directional_scale(5, 5, 4, 5, Degrees::new(90.0), BASE);
        let blend = Vector2::new(0.7, 0.3).normalize();
        assert_relative_eq!(s, BASE + (1.0 - BASE) * blend.y, max_relative = 1e-12);
        assert!(s > BASE && s < 1.0);
    }

    #[test]
    fn test_scale_stays_in_unit_interval() {
        for dir in (0..360).step_by(15) {
            for (r, c) in [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
                let s = directional_scale(1, 1, r, c, Degrees::new(f64::from(dir)), BASE);
                assert!((0.0..=1.0 + 1e-12).contains(&s), "dir={dir} s={s}");
            }
        }
    }
}
