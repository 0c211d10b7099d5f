//! End-to-end fire model run: wind lookup, data fetch, simulation, firebreak, report

use crate::core_types::weather::WindConditions;
use crate::error::SimulationError;
use crate::provider::{EnvironmentProvider, PatchRequest, WindProvider, WindRequest, DEFAULT_WIND_HOUR};
use crate::simulation::{FireSimulation, RunSummary, SimulationConfig, SpreadTuning, DEFAULT_FIREBREAK_WIDTH_M};
use crate::stats::{AreaSummary, LastIgnitionPoint, SimulationStats};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Parameters of one fire model request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireRequest {
    /// Ignition area latitude
    pub lat: f64,
    /// Ignition area longitude
    pub lon: f64,
    /// Year of the scenario date
    pub year: i32,
    /// Month of the scenario date (1-12)
    pub month: u32,
    /// Day of the scenario date
    pub day: u32,
    /// Columns
    pub grid_x: usize,
    /// Rows
    pub grid_y: usize,
    /// Cell edge length (m)
    pub cell_size: f64,
    /// Simulated horizon (minutes)
    pub sim_minutes: f64,
    /// Timestep (s)
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Firebreak width marked after the run (m)
    #[serde(default = "default_firebreak_width")]
    pub firebreak_width_m: f64,
    /// Burning neighbours a cell needs before it can ignite
    #[serde(default = "default_min_neighbors")]
    pub min_neighbors_to_ignite: u32,
    /// Spread calibration
    #[serde(default)]
    pub tuning: SpreadTuning,
}

fn default_dt() -> f64 {
    10.0
}

fn default_firebreak_width() -> f64 {
    DEFAULT_FIREBREAK_WIDTH_M
}

fn default_min_neighbors() -> u32 {
    1
}

impl FireRequest {
    fn patch(&self) -> PatchRequest {
        PatchRequest {
            lat: self.lat,
            lon: self.lon,
            month: self.month,
            year: self.year,
            grid_x: self.grid_x,
            grid_y: self.grid_y,
            cell_size: self.cell_size,
        }
    }

    fn wind_request(&self) -> WindRequest {
        WindRequest {
            lat: self.lat,
            lon: self.lon,
            year: self.year,
            month: self.month,
            day: self.day,
            hour: DEFAULT_WIND_HOUR,
        }
    }

    fn config(&self, wind: WindConditions) -> SimulationConfig {
        SimulationConfig {
            lat: self.lat,
            lon: self.lon,
            month: self.month,
            grid_x: self.grid_x,
            grid_y: self.grid_y,
            cell_size: self.cell_size,
            sim_minutes: self.sim_minutes,
            dt: self.dt,
            min_neighbors_to_ignite: self.min_neighbors_to_ignite,
            wind,
            tuning: self.tuning,
        }
    }
}

/// Outcome of [`run_fire_model`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireReport {
    /// Defuzzified wind speed, rounded to 3 decimals (m/s)
    pub wind_speed: f64,
    /// Wind direction, rounded to 1 decimal (degrees)
    pub wind_direction: f64,
    /// Area per burn state after the firebreak pass
    pub summary: AreaSummary,
    /// Cells turned into firebreak
    pub firebreak_cells: usize,
    /// Full statistics after the firebreak pass
    pub statistics: SimulationStats,
    /// Last burn completed within the horizon
    pub last_ignition: Option<LastIgnitionPoint>,
    /// Driver bookkeeping
    pub run: RunSummary,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Run the full model for a request
///
/// Fetches the wind band and collapses it to one speed, fetches the
/// environmental layers, runs the simulation to completion, marks the
/// firebreak and reports.
///
/// # Errors
/// Provider failures, invalid request parameters or mismatched layer shapes.
pub fn run_fire_model<E, W>(request: &FireRequest, environment: &E, wind: &W) -> Result<FireReport, SimulationError>
where
    E: EnvironmentProvider + ?Sized,
    W: WindProvider + ?Sized,
{
    let envelope = wind.fetch_wind(&request.wind_request())?;
    let conditions = envelope.to_conditions();
    info!(
        min = envelope.min_speed,
        max = envelope.max_speed,
        speed = *conditions.speed,
        direction = *conditions.direction,
        "Wind resolved"
    );

    let config = request.config(conditions);
    config.validate()?;
    let layers = environment.fetch_layers(&request.patch())?;

    let mut sim = FireSimulation::new(config, layers)?;
    let run = sim.run();
    let firebreak = sim.mark_firebreak(request.firebreak_width_m)?;
    let statistics = sim.statistics();

    Ok(FireReport {
        wind_speed: round_to(*conditions.speed, 3),
        wind_direction: round_to(*conditions.direction, 1),
        summary: statistics.areas,
        firebreak_cells: firebreak.len(),
        last_ignition: statistics.last_ignition,
        statistics,
        run,
    })
}
