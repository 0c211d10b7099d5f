//! Rothermel Surface Fire Spread Model (1972)
//!
//! Per-cell rate of spread from remotely sensed inputs: slope, vegetation index,
//! land-surface temperature, wind and land cover. Works in the model's native
//! imperial units (ft, lb, BTU, ft/min) and converts the result to m/s.
//!
//! # References
//! - Rothermel, R.C. (1972). "A mathematical model for predicting fire spread in wildland fuels."
//!   USDA Forest Service Research Paper INT-115.
//! - Albini, F.A. (1976). "Estimating wildfire behavior and effects."
//!   USDA Forest Service General Technical Report INT-30.
//! - Anderson, H.E. (1982). "Aids to determining fuel models for estimating fire behavior."
//!   USDA Forest Service General Technical Report INT-122.

use crate::core_types::fuel::{FuelModel, FuelModelParams};
use crate::core_types::landcover::LandCover;
use crate::core_types::units::{Celsius, MetersPerSecond};
use crate::physics::fuel_moisture::fuel_moisture_fraction;

/// Spread rates below this are treated as a fire that cannot propagate (m/s)
pub const ROS_CUTOFF_MPS: f64 = 0.010;

/// Slopes steeper than this are capped (degrees)
pub const MAX_SLOPE_DEGREES: f64 = 35.0;

/// Ratio of mid-flame wind to 10 m wind
pub const MIDFLAME_WIND_FACTOR: f64 = 0.60;

/// Cap on effective mid-flame wind (m/s)
pub const MAX_MIDFLAME_WIND_MPS: f64 = 7.5;

/// Wind coefficient derate under a forest canopy
pub const FOREST_WIND_DERATE: f64 = 0.6;

/// Fuel bed constants shared by every fuel model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RothermelConstants {
    /// Low heat content (BTU/lb)
    pub heat_content: f64,
    /// Characteristic surface-area-to-volume ratio σ (ft⁻¹)
    pub surface_area_to_volume: f64,
    /// Reference fuel bed depth (ft), converts load to oven-dry bulk density
    pub fuel_bed_depth: f64,
    /// Dead fuel moisture of extinction (fraction)
    pub moisture_of_extinction: f64,
    /// Total mineral content `S_T` (fraction)
    pub total_mineral: f64,
    /// Effective (silica-free) mineral content `S_e` (fraction)
    pub effective_mineral: f64,
}

impl Default for RothermelConstants {
    fn default() -> Self {
        Self {
            heat_content: 7881.0,
            surface_area_to_volume: 5705.38,
            fuel_bed_depth: 0.4125,
            moisture_of_extinction: 0.20,
            total_mineral: 0.0555,
            effective_mineral: 0.01,
        }
    }
}

/// Calculate the rate of spread for one cell (m/s)
///
/// Pure and total: degenerate inputs or arithmetic (NaN slope/NDVI, zero
/// denominators, non-finite powers) yield 0 rather than an error. Results under
/// [`ROS_CUTOFF_MPS`] are also reported as exactly 0.
///
/// # Formula
/// ```text
/// R = I_R × ξ × (1 + Φ_w + Φ_s) / (ρ_b × ε × Q_ig)
/// ```
///
/// # Arguments
/// * `slope_tan` - Tangent of the terrain slope
/// * `ndvi` - Vegetation index, selects the fuel model and adds moisture
/// * `lst` - Land-surface temperature, dries fuel above 25 °C
/// * `wind` - 10 m wind speed
/// * `landcover` - Land-cover class (forest shelters the fuel bed from wind)
///
/// # Example
/// ```
/// use fire_ca_core::physics::calculate_ros;
/// use fire_ca_core::core_types::{Celsius, LandCover, MetersPerSecond};
///
/// let ros = calculate_ros(0.0, 0.3, Celsius::new(30.0), MetersPerSecond::new(5.0), LandCover::Shrub);
/// assert!(*ros > 0.05 && *ros < 0.08);
/// ```
pub fn calculate_ros(
    slope_tan: f64,
    ndvi: f64,
    lst: Celsius,
    wind: MetersPerSecond,
    landcover: LandCover,
) -> MetersPerSecond {
    if slope_tan.is_nan() || ndvi.is_nan() {
        return MetersPerSecond::ZERO;
    }

    let fuel = FuelModel::from_ndvi(ndvi).params();
    let moisture = fuel_moisture_fraction(ndvi, lst);

    let max_slope_tan = MAX_SLOPE_DEGREES.to_radians().tan();
    let slope_rad = slope_tan.min(max_slope_tan).atan();

    let midflame = (*wind * MIDFLAME_WIND_FACTOR).clamp(0.0, MAX_MIDFLAME_WIND_MPS);
    let wind_ft_min = MetersPerSecond::new(midflame).to_feet_per_minute();

    let Some(rate_ft_min) = spread_rate_ft_min(
        &RothermelConstants::default(),
        &fuel,
        moisture,
        slope_rad,
        wind_ft_min,
        landcover == LandCover::Forest,
    ) else {
        return MetersPerSecond::ZERO;
    };

    let ros = MetersPerSecond::from_feet_per_minute(rate_ft_min);
    if !ros.is_finite() || *ros < ROS_CUTOFF_MPS {
        return MetersPerSecond::ZERO;
    }
    ros
}

/// Rothermel spread rate in ft/min, `None` when the fuel bed is degenerate
fn spread_rate_ft_min(
    k: &RothermelConstants,
    fuel: &FuelModelParams,
    moisture: f64,
    slope_rad: f64,
    wind_ft_min: f64,
    under_canopy: bool,
) -> Option<f64> {
    let sigma = k.surface_area_to_volume;

    // Packing ratios: actual β from oven-dry bulk density, optimum β_op from σ
    let beta_op = 3.348 * sigma.powf(-0.8189);
    let oven_dry_bulk_density = fuel.fine_fuel_load / k.fuel_bed_depth;
    let beta = oven_dry_bulk_density / fuel.particle_density;
    if beta <= 0.0 || beta_op <= 0.0 {
        return None;
    }
    let relative_packing = beta / beta_op;

    let reaction_intensity = reaction_intensity(k, fuel, moisture, relative_packing);
    let propagating_flux = propagating_flux_ratio(sigma, beta);

    let mut wind_coefficient = wind_coefficient(sigma, wind_ft_min, relative_packing);
    if under_canopy {
        wind_coefficient *= FOREST_WIND_DERATE;
    }
    let slope_coefficient = 5.275 * beta.powf(-0.3) * slope_rad.tan().powi(2);

    // Heat sink: ρ_b × ε × Q_ig
    let effective_heating = (-138.0 / sigma).exp();
    let heat_preignition = 250.0 + 1116.0 * moisture;
    let heat_sink = oven_dry_bulk_density * effective_heating * heat_preignition;
    if heat_sink.is_nan() || heat_sink <= 0.0 {
        return None;
    }

    let rate = reaction_intensity * propagating_flux * (1.0 + wind_coefficient + slope_coefficient)
        / heat_sink;
    rate.is_finite().then_some(rate)
}

/// Reaction intensity `I_R = Γ' × w_n × h × η_M × η_s` (BTU/ft²/min)
fn reaction_intensity(
    k: &RothermelConstants,
    fuel: &FuelModelParams,
    moisture: f64,
    relative_packing: f64,
) -> f64 {
    let sigma = k.surface_area_to_volume;

    let net_load = fuel.fine_fuel_load * (1.0 - k.total_mineral);

    // Optimum reaction velocity Γ' = Γ'_max (β/β_op)^A exp(A(1 - β/β_op))
    let a = 133.0 / sigma.powf(0.7913);
    let sigma_15 = sigma.powf(1.5);
    let gamma_max = sigma_15 / (495.0 + 0.0594 * sigma_15);
    let gamma = gamma_max * relative_packing.powf(a) * (a * (1.0 - relative_packing)).exp();

    let moisture_damping = moisture_damping(moisture / k.moisture_of_extinction);
    let mineral_damping = 0.174 * k.effective_mineral.powf(-0.19);

    gamma * net_load * k.heat_content * moisture_damping * mineral_damping
}

/// Moisture damping `η_M = 1 - 2.59 r + 5.11 r² - 3.52 r³`, floored at 0.05
///
/// The floor keeps very wet fuel smouldering at a trickle instead of producing
/// negative intensities once `r` exceeds the polynomial's root.
fn moisture_damping(ratio: f64) -> f64 {
    let damping = 1.0 - 2.59 * ratio + 5.11 * ratio.powi(2) - 3.52 * ratio.powi(3);
    damping.max(0.05)
}

/// Propagating flux ratio `ξ = exp((0.792 + 0.681 σ^0.5)(β + 0.1)) / (192 + 0.2595 σ)`
fn propagating_flux_ratio(sigma: f64, beta: f64) -> f64 {
    ((0.792 + 0.681 * sigma.sqrt()) * (beta + 0.1)).exp() / (192.0 + 0.2595 * sigma)
}

/// Wind coefficient `Φ_w = C × U^B × (β/β_op)^(-E)`, U in ft/min
fn wind_coefficient(sigma: f64, wind_ft_min: f64, relative_packing: f64) -> f64 {
    let b = 0.02526 * sigma.powf(0.54);
    let c = 7.47 * (-0.1333 * sigma.powf(0.55)).exp();
    let e = 0.715 * (-0.000359 * sigma).exp();
    c * wind_ft_min.powf(b) * relative_packing.powf(-e)
}
