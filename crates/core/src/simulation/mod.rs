//! Discrete-event cellular-automaton fire spread
//!
//! `FireSimulation` advances a fixed timestep from `t = 0` to the horizon. Each
//! step runs four phases in strict order:
//! 1. Drain due events from the ignition queue (stale ones are dropped)
//! 2. Re-ignite at the next viable source when the fire has died out
//! 3. Evaluate candidate ignitions for unburned cells (parallel, read-only)
//! 4. Burn out cells whose burn duration has elapsed

pub mod config;
pub mod firebreak;
pub mod ignition_queue;
pub mod ignition_source;
pub mod scheduler;

pub use config::{SimulationConfig, SpreadTuning};
pub use firebreak::{mark_firebreak, DEFAULT_FIREBREAK_WIDTH_M};
pub use ignition_queue::{IgnitionQueue, PendingIgnition};
pub use ignition_source::{is_viable_source, SourceTracker};
pub use scheduler::{Candidate, DirectionalKernel, IMPROVEMENT_EPSILON};

use crate::core_types::cell_state::CellState;
use crate::core_types::units::{Meters, MetersPerSecond, Seconds};
use crate::core_types::weather::WindConditions;
use crate::error::SimulationError;
use crate::grid::{EnvironmentLayers, FireGrid};
use crate::stats::SimulationStats;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Steps between progress log lines
const PROGRESS_LOG_INTERVAL: usize = 100;

/// Why the driver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// Every timestep up to the horizon was executed
    HorizonReached,
    /// No cell could ever be ignited
    NoViableSource,
    /// The fire died out and no untried source remains
    FireExhausted,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HaltReason::HorizonReached => "horizon reached",
            HaltReason::NoViableSource => "no viable ignition source",
            HaltReason::FireExhausted => "fire exhausted",
        };
        f.write_str(text)
    }
}

/// Result of a single [`FireSimulation::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// More steps remain
    Continue,
    /// The driver will not advance any further
    Halted(HaltReason),
}

/// Bookkeeping for a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Timesteps executed (including a final partial step that halted)
    pub steps_executed: usize,
    /// Simulation time of the last executed step
    pub final_time: Seconds,
    /// Why the run stopped
    pub halt_reason: HaltReason,
    /// Ignition sources seeded (initial plus fallback re-ignitions)
    pub sources_seeded: usize,
    /// Events ever pushed onto the ignition queue
    pub events_pushed: u64,
    /// Events that ignited their target
    pub events_committed: u64,
    /// Stale events dropped at pop time
    pub events_discarded: u64,
    /// Wall-clock time spent stepping
    pub execution_time: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} steps (t = {}), {} source(s), events: {} pushed / {} committed / {} stale, {:.3}s wall",
            self.halt_reason,
            self.steps_executed,
            self.final_time,
            self.sources_seeded,
            self.events_pushed,
            self.events_committed,
            self.events_discarded,
            self.execution_time.as_secs_f64()
        )
    }
}

/// Cellular-automaton wildfire simulation over one grid
pub struct FireSimulation {
    config: SimulationConfig,
    /// Wind actually used (negative speeds clamped to zero)
    wind: WindConditions,
    grid: FireGrid,
    environment: Option<EnvironmentLayers>,
    queue: IgnitionQueue,
    sources: SourceTracker,
    kernel: DirectionalKernel,
    total_steps: usize,
    steps_executed: usize,
    current_time: Seconds,
    halted: Option<HaltReason>,
    execution_time: Duration,
    ros_computation_time: Duration,
}

impl FireSimulation {
    /// Build a simulation from environmental layers
    ///
    /// Derives the fuel mask, precomputes the rate of spread for every cell and
    /// seeds the initial ignition source.
    ///
    /// # Errors
    /// Invalid configuration, or layers whose shape differs from the configured grid.
    pub fn new(config: SimulationConfig, environment: EnvironmentLayers) -> Result<Self, SimulationError> {
        config.validate()?;
        if environment.grid_x() != config.grid_x || environment.grid_y() != config.grid_y {
            return Err(SimulationError::invalid(
                "environment",
                format!(
                    "layers are {}x{} but the grid is {}x{}",
                    environment.grid_x(),
                    environment.grid_y(),
                    config.grid_x,
                    config.grid_y
                ),
            ));
        }

        let wind = clamp_wind(config.wind);
        info!(
            grid_x = config.grid_x,
            grid_y = config.grid_y,
            cell_size = config.cell_size,
            wind_speed = *wind.speed,
            wind_dir = *wind.direction,
            "Creating fire simulation"
        );

        let ros_start = Instant::now();
        let fuel_mask = environment.fuel_mask(config.tuning.ndvi_fuel_threshold);
        let ros = environment.compute_ros(wind.speed, &fuel_mask);
        let ros_computation_time = ros_start.elapsed();

        let grid = FireGrid::new(
            config.grid_x,
            config.grid_y,
            Meters::new(config.cell_size),
            ros,
            fuel_mask,
        )?;
        debug!(
            fuel_cells = grid.fuel_cell_count(),
            elapsed_ms = ros_computation_time.as_secs_f64() * 1000.0,
            "Rate of spread precomputed"
        );

        Ok(Self::assemble(config, wind, grid, Some(environment), ros_computation_time))
    }

    /// Build a simulation over a prepared grid (spread rates already known)
    ///
    /// Grid dimensions and cell size are taken from `grid`, overriding the config.
    ///
    /// # Errors
    /// Invalid configuration.
    pub fn from_grid(mut config: SimulationConfig, grid: FireGrid) -> Result<Self, SimulationError> {
        config.grid_x = grid.grid_x();
        config.grid_y = grid.grid_y();
        config.cell_size = *grid.cell_size();
        config.validate()?;
        let wind = clamp_wind(config.wind);
        Ok(Self::assemble(config, wind, grid, None, Duration::ZERO))
    }

    fn assemble(
        config: SimulationConfig,
        wind: WindConditions,
        grid: FireGrid,
        environment: Option<EnvironmentLayers>,
        ros_computation_time: Duration,
    ) -> Self {
        let kernel = DirectionalKernel::new(&wind, &config.tuning);
        let total_steps = config.total_steps();
        let mut sim = Self {
            config,
            wind,
            grid,
            environment,
            queue: IgnitionQueue::new(),
            sources: SourceTracker::new(),
            kernel,
            total_steps,
            steps_executed: 0,
            current_time: Seconds::new(0.0),
            halted: None,
            execution_time: Duration::ZERO,
            ros_computation_time,
        };
        sim.set_initial_source();
        sim
    }

    /// Grid centre if viable, otherwise the nearest viable cell on square rings
    fn set_initial_source(&mut self) {
        let (cy, cx) = (self.grid.grid_y() / 2, self.grid.grid_x() / 2);
        let pick = if is_viable_source(&self.grid, cy, cx) {
            Some((cy, cx))
        } else {
            ignition_source::spiral_search(&self.grid, cy, cx, self.config.tuning.spiral_max_radius)
        };

        match pick {
            Some((row, col)) => self.seed_source(row, col, Seconds::new(0.0)),
            None => debug!("No viable source near the grid centre, deferring to linear scan"),
        }
    }

    /// Ignite a source cell at `time`, forcing it to carry fuel
    fn seed_source(&mut self, row: usize, col: usize, time: Seconds) {
        let idx = self.grid.index(row, col);
        self.sources.record(&self.grid, row, col);
        self.grid.refuel(idx);
        let duration = self.burn_duration(idx);
        self.grid.ignite(idx, time, duration);
        info!(row, col, t = *time, "Ignition source seeded");
    }

    fn burn_duration(&self, idx: usize) -> Seconds {
        let tuning = &self.config.tuning;
        self.grid
            .burn_duration_for(idx, tuning.spread_gain, tuning.burn_duration_factor)
    }

    /// Explicitly ignite a cell at the current simulation time
    ///
    /// Unlike neighbour spread this also ignites cells without fuel. A run that
    /// halted because the fire died out can continue afterwards.
    ///
    /// # Errors
    /// [`SimulationError::OutOfBounds`] for cells outside the grid,
    /// [`SimulationError::InvalidParameter`] if the cell is no longer unburned
    /// or the horizon has already been reached.
    pub fn ignite_at(&mut self, row: usize, col: usize) -> Result<(), SimulationError> {
        let idx = self.grid.check_bounds(row, col)?;
        if self.halted == Some(HaltReason::HorizonReached) {
            return Err(SimulationError::invalid("ignite_at", "simulation horizon already reached"));
        }
        let state = self.grid.state_at(idx);
        if state != CellState::Unburned {
            return Err(SimulationError::invalid(
                "ignite_at",
                format!("cell ({row}, {col}) is already {state}"),
            ));
        }
        self.seed_source(row, col, self.current_time);
        self.halted = None;
        Ok(())
    }

    /// Advance one timestep
    pub fn step(&mut self) -> StepOutcome {
        if let Some(reason) = self.halted {
            return StepOutcome::Halted(reason);
        }
        if self.steps_executed >= self.total_steps {
            return self.halt(HaltReason::HorizonReached);
        }

        let t = Seconds::new(self.steps_executed as f64 * self.config.dt);
        self.current_time = t;
        self.steps_executed += 1;

        self.drain_queue(t);

        if !self.grid.any_burning() && self.queue.is_empty() {
            match self.sources.next_linear(&self.grid) {
                Some((row, col)) if *t < self.config.sim_seconds() => {
                    debug!(t = *t, "Fire died out, re-igniting");
                    self.seed_source(row, col, t);
                }
                Some(_) => return self.halt(HaltReason::HorizonReached),
                None if self.sources.seeded() == 0 => return self.halt(HaltReason::NoViableSource),
                None => return self.halt(HaltReason::FireExhausted),
            }
        }

        self.schedule_candidates();
        let burned_out = self.complete_burns(t);

        debug!(
            t = *t,
            burning = self.grid.count(CellState::Burning),
            burned_out,
            queued = self.queue.len(),
            next_event = self.next_ignition_time().map_or(f64::INFINITY, |t| *t),
            "Step complete"
        );
        if self.steps_executed % PROGRESS_LOG_INTERVAL == 0 {
            info!(
                step = self.steps_executed,
                total = self.total_steps,
                t = *t,
                burned = self.grid.count(CellState::Burned),
                burning = self.grid.count(CellState::Burning),
                "Simulation progress"
            );
        }

        if self.steps_executed >= self.total_steps {
            return self.halt(HaltReason::HorizonReached);
        }
        StepOutcome::Continue
    }

    /// Step until the driver halts
    pub fn run(&mut self) -> RunSummary {
        let start = Instant::now();
        while let StepOutcome::Continue = self.step() {}
        self.execution_time += start.elapsed();

        let summary = self.summary();
        info!(%summary, "Simulation finished");
        summary
    }

    /// Bookkeeping so far (halt reason defaults to the horizon while running)
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            steps_executed: self.steps_executed,
            final_time: self.current_time,
            halt_reason: self.halted.unwrap_or(HaltReason::HorizonReached),
            sources_seeded: self.sources.seeded(),
            events_pushed: self.queue.pushed(),
            events_committed: self.queue.committed(),
            events_discarded: self.queue.discarded(),
            execution_time: self.execution_time,
        }
    }

    fn halt(&mut self, reason: HaltReason) -> StepOutcome {
        info!(%reason, t = *self.current_time, steps = self.steps_executed, "Simulation halted");
        self.halted = Some(reason);
        StepOutcome::Halted(reason)
    }

    /// Phase 1: ignite every due event whose target is still unburned
    fn drain_queue(&mut self, t: Seconds) {
        while let Some(event) = self.queue.pop_due(t) {
            let idx = self.grid.index(event.row, event.col);
            if self.grid.state_at(idx) != CellState::Unburned {
                self.queue.note_discarded();
                continue;
            }
            let duration = self.burn_duration(idx);
            self.grid.ignite(idx, event.ignite_time, duration);
            self.queue.note_committed();
            trace!(
                row = event.row,
                col = event.col,
                ignite_time = *event.ignite_time,
                "Cell ignited"
            );
        }
    }

    /// Phase 3: evaluate in parallel, commit improvements in row-major order
    fn schedule_candidates(&mut self) {
        let candidates = scheduler::evaluate_candidates(
            &self.grid,
            &self.kernel,
            &self.config.tuning,
            self.config.min_neighbors_to_ignite,
        );
        for candidate in candidates {
            let recorded = self.grid.ignition_times()[candidate.index];
            if !scheduler::improves(candidate.ignite_time, recorded) {
                continue;
            }
            let (row, col) = self.grid.position(candidate.index);
            self.grid.record_candidate(candidate.index, candidate.ignite_time);
            self.queue.push(PendingIgnition::new(
                candidate.ignite_time,
                row,
                col,
                candidate.travel_delay,
            ));
            trace!(row, col, ignite_time = *candidate.ignite_time, "Ignition scheduled");
        }
    }

    /// Phase 4: burning cells whose duration has elapsed become burned
    fn complete_burns(&mut self, t: Seconds) -> usize {
        let done: Vec<usize> = (0..self.grid.len())
            .filter(|&idx| {
                if self.grid.state_at(idx) != CellState::Burning {
                    return false;
                }
                let duration = *self.grid.burn_durations()[idx];
                let elapsed = *t - *self.grid.ignition_times()[idx];
                duration.is_finite() && elapsed >= 0.0 && elapsed / duration >= 1.0
            })
            .collect();
        for &idx in &done {
            self.grid.set_state(idx, CellState::Burned);
        }
        done.len()
    }

    /// Mark a firebreak ring around the cells still burning
    ///
    /// # Errors
    /// Rejects negative or non-finite widths.
    pub fn mark_firebreak(&mut self, width_m: f64) -> Result<Vec<(usize, usize)>, SimulationError> {
        firebreak::mark_firebreak(&mut self.grid, width_m)
    }

    /// Summary statistics of the current grid
    pub fn statistics(&self) -> SimulationStats {
        SimulationStats::collect(self)
    }

    /// The state grid
    pub fn grid(&self) -> &FireGrid {
        &self.grid
    }

    /// Run configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Wind in effect (after clamping)
    pub fn wind(&self) -> WindConditions {
        self.wind
    }

    /// Environmental inputs, when the simulation was built from them
    pub fn environment(&self) -> Option<&EnvironmentLayers> {
        self.environment.as_ref()
    }

    /// Time of the most recently executed step
    pub fn current_time(&self) -> Seconds {
        self.current_time
    }

    /// Horizon in seconds
    pub fn sim_time(&self) -> Seconds {
        Seconds::new(self.config.sim_seconds())
    }

    /// Number of timesteps executed
    pub fn steps_executed(&self) -> usize {
        self.steps_executed
    }

    /// Why the driver stopped, if it has
    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halted
    }

    /// Whether the driver has stopped
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Queued ignition events in pop order (stale entries included)
    pub fn pending_ignitions(&self) -> Vec<PendingIgnition> {
        self.queue.pending()
    }

    /// Time of the earliest queued ignition, stale entries included
    pub fn next_ignition_time(&self) -> Option<Seconds> {
        self.queue.next_time()
    }

    /// Most recently seeded ignition source
    pub fn current_source(&self) -> Option<(usize, usize)> {
        self.sources.current()
    }

    /// Number of sources seeded so far
    pub fn sources_seeded(&self) -> usize {
        self.sources.seeded()
    }

    /// Wall-clock time spent stepping
    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    /// Wall-clock time spent precomputing spread rates
    pub fn ros_computation_time(&self) -> Duration {
        self.ros_computation_time
    }
}

fn clamp_wind(wind: WindConditions) -> WindConditions {
    if *wind.speed < 0.0 {
        warn!(speed = *wind.speed, "Negative wind speed clamped to zero");
        WindConditions {
            speed: MetersPerSecond::ZERO,
            ..wind
        }
    } else {
        wind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::MetersPerSecond;

    fn config(minutes: f64) -> SimulationConfig {
        SimulationConfig {
            grid_x: 5,
            grid_y: 5,
            cell_size: 20.0,
            sim_minutes: minutes,
            dt: 10.0,
            ..SimulationConfig::default()
        }
    }

    fn uniform_sim(minutes: f64, ros: f64) -> FireSimulation {
        let grid = FireGrid::uniform(5, 5, Meters::new(20.0), MetersPerSecond::new(ros)).unwrap();
        FireSimulation::from_grid(config(minutes), grid).unwrap()
    }

    #[test]
    fn test_centre_seeded_at_construction() {
        let sim = uniform_sim(2.0, 0.05);
        assert_eq!(sim.current_source(), Some((2, 2)));
        assert_eq!(sim.grid().state(2, 2), CellState::Burning);
        assert_eq!(*sim.grid().ignition_time(2, 2), 0.0);
        assert_eq!(sim.sources_seeded(), 1);
    }

    #[test]
    fn test_short_horizon_only_schedules_neighbours() {
        let mut sim = uniform_sim(2.0, 0.05);
        let summary = sim.run();
        assert_eq!(summary.halt_reason, HaltReason::HorizonReached);
        assert_eq!(summary.steps_executed, 13);
        assert_eq!(*summary.final_time, 120.0);
        assert_eq!(summary.events_pushed, 8);
        assert_eq!(summary.events_committed, 0);
        assert_eq!(sim.pending_ignitions().len(), 8);
        assert_eq!(sim.grid().count(CellState::Burning), 1);

        // Orthogonal neighbours are due first: 400/1.5 s scaled by 1 - 0.02·0.98
        let next = sim.next_ignition_time().unwrap();
        assert!((*next - 400.0 / 1.5 * (1.0 - 0.02 * 0.98)).abs() < 1e-9);
        assert_eq!(Some(next), sim.pending_ignitions().first().map(|e| e.ignite_time));
    }

    #[test]
    fn test_next_ignition_time_empty_before_scheduling() {
        let grid = FireGrid::uniform(5, 5, Meters::new(20.0), MetersPerSecond::new(0.05)).unwrap();
        let sim = FireSimulation::from_grid(config(1.0), grid).unwrap();
        assert_eq!(sim.next_ignition_time(), None);
    }

    #[test]
    fn test_no_fuel_halts_at_time_zero() {
        let grid = FireGrid::new(
            5,
            5,
            Meters::new(20.0),
            vec![MetersPerSecond::new(0.05); 25],
            vec![false; 25],
        )
        .unwrap();
        let mut sim = FireSimulation::from_grid(config(10.0), grid).unwrap();
        let summary = sim.run();
        assert_eq!(summary.halt_reason, HaltReason::NoViableSource);
        assert_eq!(summary.steps_executed, 1);
        assert_eq!(*summary.final_time, 0.0);
        assert_eq!(sim.grid().count(CellState::Unburned), 25);
    }

    #[test]
    fn test_single_cell_fire_exhausts() {
        let mut mask = vec![false; 25];
        mask[12] = true;
        let grid = FireGrid::new(5, 5, Meters::new(20.0), vec![MetersPerSecond::new(0.05); 25], mask)
            .unwrap();
        let mut sim = FireSimulation::from_grid(config(30.0), grid).unwrap();
        let summary = sim.run();
        assert_eq!(summary.halt_reason, HaltReason::FireExhausted);
        assert_eq!(sim.grid().state(2, 2), CellState::Burned);
        // Burn duration 231.9 s: burned out at t = 240, halts on the next step
        assert_eq!(*summary.final_time, 250.0);
    }

    #[test]
    fn test_negative_wind_is_clamped() {
        let grid = FireGrid::uniform(5, 5, Meters::new(20.0), MetersPerSecond::new(0.05)).unwrap();
        let cfg = SimulationConfig {
            wind: WindConditions::new(-3.0, 45.0),
            ..config(1.0)
        };
        let sim = FireSimulation::from_grid(cfg, grid).unwrap();
        assert!(sim.wind().is_calm());
        assert_eq!(*sim.wind().direction, 45.0);
    }

    #[test]
    fn test_ignite_at_validates() {
        let mut sim = uniform_sim(2.0, 0.05);
        assert!(matches!(sim.ignite_at(9, 0), Err(SimulationError::OutOfBounds { .. })));
        assert!(matches!(
            sim.ignite_at(2, 2),
            Err(SimulationError::InvalidParameter { name: "ignite_at", .. })
        ));
        assert!(sim.ignite_at(0, 0).is_ok());
        assert_eq!(sim.grid().state(0, 0), CellState::Burning);
        assert_eq!(sim.sources_seeded(), 2);
    }

    #[test]
    fn test_environment_shape_must_match() {
        let env = EnvironmentLayers::uniform(
            4,
            5,
            0.0,
            0.3,
            crate::core_types::units::Celsius::new(30.0),
            crate::core_types::landcover::LandCover::Shrub,
        )
        .unwrap();
        assert!(FireSimulation::new(config(1.0), env).is_err());
    }
}
