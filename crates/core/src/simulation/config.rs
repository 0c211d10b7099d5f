//! Run configuration and spread tuning constants

use crate::core_types::weather::WindConditions;
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};

/// Calibration knobs of the cellular automaton
///
/// Fixed for the lifetime of a simulation. The defaults reproduce the
/// calibrated behaviour of the production model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadTuning {
    /// Multiplier on every neighbour's effective spread rate
    pub spread_gain: f64,
    /// Delay adjustment when exactly one neighbour contributes (negative = faster)
    pub single_neighbor_penalty: f64,
    /// Delay reduction when two or more neighbours contribute
    pub multi_neighbor_bonus: f64,
    /// Floor of the directional multiplier for any bearing within 90° of the resultant
    pub dir_base: f64,
    /// NDVI a cell must exceed to carry fuel
    pub ndvi_fuel_threshold: f64,
    /// Divides the burn-through time (together with `spread_gain`)
    pub burn_duration_factor: f64,
    /// Search radius (cells) around the grid centre for the first ignition source
    pub spiral_max_radius: usize,
    /// Spread equally in all directions when the wind speed is exactly zero
    ///
    /// On by default so calm runs spread symmetrically. With `false` the wind
    /// bearing still weights the directional blend at zero speed.
    pub isotropic_when_calm: bool,
}

impl Default for SpreadTuning {
    fn default() -> Self {
        Self {
            spread_gain: 1.5,
            single_neighbor_penalty: -0.02,
            multi_neighbor_bonus: 0.03,
            dir_base: 0.40,
            ndvi_fuel_threshold: 0.24,
            burn_duration_factor: 1.15,
            spiral_max_radius: 10,
            isotropic_when_calm: true,
        }
    }
}

impl SpreadTuning {
    /// Check every knob is usable
    ///
    /// # Errors
    /// [`SimulationError::InvalidParameter`] naming the offending field.
    pub fn validate(&self) -> Result<(), SimulationError> {
        SimulationError::require_positive("spread_gain", self.spread_gain)?;
        SimulationError::require_positive("burn_duration_factor", self.burn_duration_factor)?;
        if !(0.0..=1.0).contains(&self.dir_base) {
            return Err(SimulationError::invalid(
                "dir_base",
                format!("must be within [0, 1], got {}", self.dir_base),
            ));
        }
        if !(-1.0..1.0).contains(&self.single_neighbor_penalty) {
            return Err(SimulationError::invalid(
                "single_neighbor_penalty",
                format!("must be within [-1, 1), got {}", self.single_neighbor_penalty),
            ));
        }
        if !(0.0..1.0).contains(&self.multi_neighbor_bonus) {
            return Err(SimulationError::invalid(
                "multi_neighbor_bonus",
                format!("must be within [0, 1), got {}", self.multi_neighbor_bonus),
            ));
        }
        if !self.ndvi_fuel_threshold.is_finite() {
            return Err(SimulationError::invalid(
                "ndvi_fuel_threshold",
                "must be finite",
            ));
        }
        Ok(())
    }
}

/// Everything needed to set up one simulation run
///
/// # Example
/// ```
/// use fire_ca_core::{SimulationConfig, WindConditions};
///
/// let config = SimulationConfig {
///     grid_x: 50,
///     grid_y: 40,
///     sim_minutes: 30.0,
///     wind: WindConditions::new(4.0, 225.0),
///     ..SimulationConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.total_steps(), 181);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Latitude of the grid centre (degrees)
    pub lat: f64,
    /// Longitude of the grid centre (degrees)
    pub lon: f64,
    /// Month the environmental inputs describe (1-12)
    pub month: u32,
    /// Number of columns
    pub grid_x: usize,
    /// Number of rows
    pub grid_y: usize,
    /// Edge length of a cell (m)
    pub cell_size: f64,
    /// Simulated horizon (minutes)
    pub sim_minutes: f64,
    /// Timestep (s)
    pub dt: f64,
    /// Burning neighbours required before a cell is scheduled
    pub min_neighbors_to_ignite: u32,
    /// Wind for the whole run
    pub wind: WindConditions,
    /// Spread calibration
    pub tuning: SpreadTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lat: 18.79,
            lon: 98.98,
            month: 3,
            grid_x: 100,
            grid_y: 100,
            cell_size: 30.0,
            sim_minutes: 60.0,
            dt: 10.0,
            min_neighbors_to_ignite: 1,
            wind: WindConditions::default(),
            tuning: SpreadTuning::default(),
        }
    }
}

impl SimulationConfig {
    /// Reject configurations that cannot describe a run
    ///
    /// Negative wind speed is accepted here; the simulation clamps it to zero.
    ///
    /// # Errors
    /// [`SimulationError::InvalidDimensions`] or
    /// [`SimulationError::InvalidParameter`] for the first problem found.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.grid_x == 0 || self.grid_y == 0 {
            return Err(SimulationError::InvalidDimensions {
                grid_x: self.grid_x,
                grid_y: self.grid_y,
            });
        }
        SimulationError::require_positive("cell_size", self.cell_size)?;
        SimulationError::require_positive("sim_minutes", self.sim_minutes)?;
        SimulationError::require_positive("dt", self.dt)?;
        if !(1..=12).contains(&self.month) {
            return Err(SimulationError::invalid(
                "month",
                format!("must be within 1-12, got {}", self.month),
            ));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(SimulationError::invalid(
                "lat",
                format!("must be within [-90, 90], got {}", self.lat),
            ));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(SimulationError::invalid(
                "lon",
                format!("must be within [-180, 180], got {}", self.lon),
            ));
        }
        if !self.wind.speed.is_finite() || !self.wind.direction.is_finite() {
            return Err(SimulationError::invalid("wind", "speed and direction must be finite"));
        }
        self.tuning.validate()
    }

    /// Simulated horizon in seconds
    pub fn sim_seconds(&self) -> f64 {
        self.sim_minutes * 60.0
    }

    /// Number of timesteps `t = 0, dt, 2·dt, … ≤ horizon`
    pub fn total_steps(&self) -> usize {
        (self.sim_seconds() / self.dt).floor() as usize + 1
    }
}
