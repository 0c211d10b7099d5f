//! Read-only summaries of a simulation's grid
//!
//! Nothing here mutates the simulation. All types serialize with serde so the
//! reporting layer can ship them as JSON.

pub mod geo;
mod summary;

pub use geo::{cell_to_lat_lon, meters_per_deg_lon, METERS_PER_DEG_LAT};
pub use summary::DetailedSummary;

use crate::core_types::cell_state::CellState;
use crate::core_types::units::Seconds;
use crate::simulation::FireSimulation;
use serde::Serialize;

/// Cell count and area of one burn state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StateBreakdown {
    /// Number of cells
    pub cells: usize,
    /// Area covered (m²)
    pub area_m2: f64,
}

/// Fixed four-way partition of the grid by burn state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AreaSummary {
    /// Not reached by fire
    pub unburned: StateBreakdown,
    /// Actively burning
    pub burning: StateBreakdown,
    /// Burnt out
    pub burned: StateBreakdown,
    /// Firebreak buffer
    pub firebreak: StateBreakdown,
}

impl AreaSummary {
    /// Breakdown for a single state
    pub fn get(&self, state: CellState) -> StateBreakdown {
        match state {
            CellState::Unburned => self.unburned,
            CellState::Burning => self.burning,
            CellState::Burned => self.burned,
            CellState::Firebreak => self.firebreak,
        }
    }

    /// Sum of all cells (equals the grid size)
    pub fn total_cells(&self) -> usize {
        self.unburned.cells + self.burning.cells + self.burned.cells + self.firebreak.cells
    }
}

/// Summary of the precomputed spread rates over cells that can spread fire
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RosStats {
    /// Cells with a positive, finite rate
    pub count: usize,
    /// Mean rate (m/s), 0 when `count` is 0
    pub mean: f64,
    /// Minimum rate (m/s)
    pub min: f64,
    /// Maximum rate (m/s)
    pub max: f64,
}

/// Cell whose burn completed last within the horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LastIgnitionPoint {
    /// Latitude of the cell
    pub lat: f64,
    /// Longitude of the cell
    pub lon: f64,
    /// `ignition_time + burn_duration`
    pub completion_time: Seconds,
    /// Grid row
    pub row: usize,
    /// Grid column
    pub col: usize,
}

/// Conditions at the most recently seeded ignition source
///
/// Values that cannot be determined (no source, no environmental layers, NaN
/// samples, non-positive spread rate) are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StartConditions {
    /// Grid position `(row, col)`
    pub grid_pos: Option<(usize, usize)>,
    /// Slope as a tangent
    pub slope_tan: Option<f64>,
    /// Slope in degrees
    pub slope_deg: Option<f64>,
    /// Slope in percent
    pub slope_pct: Option<f64>,
    /// Vegetation index
    pub ndvi: Option<f64>,
    /// Precomputed spread rate (m/s)
    pub ros: Option<f64>,
}

/// Simulation parameters echoed into the report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunParameters {
    /// Latitude of the grid centre
    pub lat: f64,
    /// Longitude of the grid centre
    pub lon: f64,
    /// Columns
    pub grid_x: usize,
    /// Rows
    pub grid_y: usize,
    /// Cell edge length (m)
    pub cell_size: f64,
    /// Wind speed used (m/s)
    pub wind_speed: f64,
    /// Wind direction (degrees, 0° = North)
    pub wind_dir: f64,
    /// Horizon (s)
    pub sim_time: f64,
    /// Timestep (s)
    pub dt: f64,
}

/// Everything the reporting layer needs from a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStats {
    /// Cells in the grid
    pub total_cells: usize,
    /// Cells carrying fuel
    pub fuel_cells: usize,
    /// Per-state counts and areas
    pub areas: AreaSummary,
    /// Burning plus burned area (m²)
    pub burned_area_m2: f64,
    /// Burning plus burned area (ha)
    pub burned_area_ha: f64,
    /// Fire-affected share of the whole grid (%)
    pub burn_percentage_all: f64,
    /// Fire-affected share of the fuelled cells (%)
    pub burn_percentage_of_fuel: f64,
    /// Spread-rate summary
    pub ros_stats: RosStats,
    /// Wall-clock stepping time (s)
    pub execution_time: f64,
    /// Wall-clock spread-rate precompute time (s)
    pub ros_computation_time: f64,
    /// Last burn completed within the horizon, if any
    pub last_ignition: Option<LastIgnitionPoint>,
    /// Conditions at the ignition source
    pub start: StartConditions,
    /// Run parameters
    pub parameters: RunParameters,
}

impl SimulationStats {
    /// Summarise a simulation in its current state
    pub fn collect(sim: &FireSimulation) -> Self {
        let grid = sim.grid();
        let areas = area_summary(sim);
        let total_cells = grid.len();
        let fuel_cells = grid.fuel_cell_count();

        let affected = areas.burning.cells + areas.burned.cells;
        let burned_area_m2 = areas.burning.area_m2 + areas.burned.area_m2;

        Self {
            total_cells,
            fuel_cells,
            areas,
            burned_area_m2,
            burned_area_ha: burned_area_m2 / 10_000.0,
            burn_percentage_all: percentage(affected, total_cells),
            burn_percentage_of_fuel: percentage(affected, fuel_cells.max(1)),
            ros_stats: ros_stats(sim),
            execution_time: sim.execution_time().as_secs_f64(),
            ros_computation_time: sim.ros_computation_time().as_secs_f64(),
            last_ignition: last_ignition_point(sim),
            start: start_conditions(sim),
            parameters: run_parameters(sim),
        }
    }

    /// Multi-section summary (brief summary plus spread-rate, start and parameter details)
    pub fn detailed(&self) -> DetailedSummary<'_> {
        DetailedSummary(self)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Cell counts and areas for each burn state
pub fn area_summary(sim: &FireSimulation) -> AreaSummary {
    let grid = sim.grid();
    let cell_area = grid.cell_area();
    let breakdown = |state| {
        let cells = grid.count(state);
        StateBreakdown {
            cells,
            area_m2: cells as f64 * cell_area,
        }
    };
    AreaSummary {
        unburned: breakdown(CellState::Unburned),
        burning: breakdown(CellState::Burning),
        burned: breakdown(CellState::Burned),
        firebreak: breakdown(CellState::Firebreak),
    }
}

/// Count, mean, min and max over cells with a positive, non-NaN spread rate
pub fn ros_stats(sim: &FireSimulation) -> RosStats {
    let (count, sum, min, max) = sim
        .grid()
        .ros_values()
        .iter()
        .map(|r| r.value())
        .filter(|r| !r.is_nan() && *r > 0.0)
        .fold((0_usize, 0.0, f64::INFINITY, f64::NEG_INFINITY), |(n, s, lo, hi), r| {
            (n + 1, s + r, lo.min(r), hi.max(r))
        });

    if count == 0 {
        return RosStats::default();
    }
    RosStats {
        count,
        mean: sum / count as f64,
        min,
        max,
    }
}

/// The burning or burned cell maximising `ignition_time + burn_duration ≤ horizon`
///
/// Ties go to the first cell in row-major order.
pub fn last_ignition_point(sim: &FireSimulation) -> Option<LastIgnitionPoint> {
    let grid = sim.grid();
    let horizon = *sim.sim_time();
    let mut best: Option<(f64, usize)> = None;

    for idx in 0..grid.len() {
        let (row, col) = grid.position(idx);
        if !grid.state(row, col).is_fire_affected() {
            continue;
        }
        let ignition = grid.ignition_times()[idx];
        let duration = grid.burn_durations()[idx];
        if !ignition.is_finite() || !duration.is_finite() {
            continue;
        }
        let completion = *ignition + *duration;
        if completion <= horizon && best.is_none_or(|(t, _)| completion > t) {
            best = Some((completion, idx));
        }
    }

    let (completion, idx) = best?;
    let (row, col) = grid.position(idx);
    let config = sim.config();
    let (lat, lon) = cell_to_lat_lon(
        config.lat,
        config.lon,
        grid.grid_x(),
        grid.grid_y(),
        *grid.cell_size(),
        row,
        col,
    );
    Some(LastIgnitionPoint {
        lat,
        lon,
        completion_time: Seconds::new(completion),
        row,
        col,
    })
}

/// Slope, NDVI and spread rate at the most recent ignition source
pub fn start_conditions(sim: &FireSimulation) -> StartConditions {
    let Some((row, col)) = sim.current_source() else {
        return StartConditions::default();
    };

    let ros = *sim.grid().ros(row, col);
    let mut start = StartConditions {
        grid_pos: Some((row, col)),
        ros: (ros.is_finite() && ros > 0.0).then_some(ros),
        ..StartConditions::default()
    };

    if let Some(env) = sim.environment() {
        let slope_tan = env.slope_tan_at(row, col);
        if !slope_tan.is_nan() {
            start.slope_tan = Some(slope_tan);
            start.slope_deg = Some(slope_tan.atan().to_degrees());
            start.slope_pct = Some(slope_tan * 100.0);
        }
        let ndvi = env.ndvi_at(row, col);
        start.ndvi = (!ndvi.is_nan()).then_some(ndvi);
    }
    start
}

fn run_parameters(sim: &FireSimulation) -> RunParameters {
    let config = sim.config();
    let wind = sim.wind();
    RunParameters {
        lat: config.lat,
        lon: config.lon,
        grid_x: config.grid_x,
        grid_y: config.grid_y,
        cell_size: config.cell_size,
        wind_speed: *wind.speed,
        wind_dir: *wind.direction,
        sim_time: config.sim_seconds(),
        dt: config.dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Meters, MetersPerSecond};
    use crate::grid::FireGrid;
    use crate::simulation::SimulationConfig;
    use approx::assert_relative_eq;

    fn sim_with(ros: Vec<f64>, mask: Vec<bool>, minutes: f64) -> FireSimulation {
        let n = ros.len();
        let side = (n as f64).sqrt() as usize;
        let grid = FireGrid::new(
            side,
            side,
            Meters::new(10.0),
            ros.into_iter().map(MetersPerSecond::new).collect(),
            mask,
        )
        .unwrap();
        let config = SimulationConfig {
            sim_minutes: minutes,
            lat: 0.0,
            lon: 0.0,
            ..SimulationConfig::default()
        };
        FireSimulation::from_grid(config, grid).unwrap()
    }

    #[test]
    fn test_ros_stats_ignore_zero_and_nan() {
        let sim = sim_with(
            vec![0.0, 0.02, f64::NAN, 0.04, 0.0, 0.06, 0.0, 0.0, 0.0],
            vec![true; 9],
            1.0,
        );
        let stats = ros_stats(&sim);
        assert_eq!(stats.count, 3);
        assert_relative_eq!(stats.mean, 0.04, max_relative = 1e-12);
        assert_relative_eq!(stats.min, 0.02);
        assert_relative_eq!(stats.max, 0.06);
    }

    #[test]
    fn test_ros_stats_empty() {
        let sim = sim_with(vec![0.0; 9], vec![false; 9], 1.0);
        assert_eq!(ros_stats(&sim), RosStats::default());
    }

    #[test]
    fn test_area_partition_covers_grid() {
        let mut sim = sim_with(vec![0.05; 9], vec![true; 9], 1.0);
        sim.run();
        let stats = sim.statistics();
        assert_eq!(stats.areas.total_cells(), 9);
        assert_eq!(stats.areas.burning.cells, 1);
        assert_relative_eq!(stats.areas.burning.area_m2, 100.0);
        assert_relative_eq!(stats.burned_area_m2, 100.0);
        assert_relative_eq!(stats.burn_percentage_all, 100.0 / 9.0, max_relative = 1e-12);
    }

    #[test]
    fn test_no_completion_within_short_horizon() {
        let mut sim = sim_with(vec![0.05; 9], vec![true; 9], 1.0);
        sim.run();
        // Centre burns for 10 / 0.05 / 1.725 = 115.9 s, beyond the 60 s horizon
        assert!(last_ignition_point(&sim).is_none());
    }

    #[test]
    fn test_last_ignition_found_after_burnout() {
        let mut mask = vec![false; 9];
        mask[4] = true;
        let mut sim = sim_with(vec![0.05; 9], mask, 5.0);
        sim.run();
        let point = last_ignition_point(&sim).unwrap();
        assert_eq!((point.row, point.col), (1, 1));
        assert_relative_eq!(*point.completion_time, 200.0 / 1.725, max_relative = 1e-9);
        assert_eq!((point.lat, point.lon), (0.0, 0.0));
    }

    #[test]
    fn test_start_conditions_without_environment() {
        let sim = sim_with(vec![0.05; 9], vec![true; 9], 1.0);
        let start = start_conditions(&sim);
        assert_eq!(start.grid_pos, Some((1, 1)));
        assert_eq!(start.ros, Some(0.05));
        assert_eq!(start.slope_tan, None);
        assert_eq!(start.ndvi, None);
    }
}
