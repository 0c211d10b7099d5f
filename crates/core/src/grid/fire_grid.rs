//! Cellular-automaton state grid
//!
//! Owns every per-cell array the spread engine mutates: burn state, ignition
//! time, burn duration, rate of spread, fuel mask and fuel left. Storage is
//! row-major (`row * grid_x + col`, row = y growing southward, col = x).
//!
//! Mutation is crate-private so that only the simulation driver and the
//! firebreak pass can move cells through their state machine.

use crate::core_types::cell_state::CellState;
use crate::core_types::units::{Meters, MetersPerSecond, Seconds};
use crate::error::SimulationError;
use serde::Serialize;

/// 8-connected neighbourhood offsets `(d_row, d_col)` in row-major order
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Raster of cell states and timing for one simulation
#[derive(Debug, Clone, Serialize)]
pub struct FireGrid {
    grid_x: usize,
    grid_y: usize,
    cell_size: Meters,
    state: Vec<CellState>,
    /// Time the cell ignited, or best recorded candidate while still unburned
    ignition_time: Vec<Seconds>,
    required_burn_duration: Vec<Seconds>,
    ros: Vec<MetersPerSecond>,
    fuel_mask: Vec<bool>,
    fuel_left: Vec<f64>,
}

impl FireGrid {
    /// Create a grid from precomputed spread rates and fuel mask
    ///
    /// # Errors
    /// Rejects empty grids, non-positive cell size and layers whose length is
    /// not `grid_x * grid_y`.
    pub fn new(
        grid_x: usize,
        grid_y: usize,
        cell_size: Meters,
        ros: Vec<MetersPerSecond>,
        fuel_mask: Vec<bool>,
    ) -> Result<Self, SimulationError> {
        if grid_x == 0 || grid_y == 0 {
            return Err(SimulationError::InvalidDimensions { grid_x, grid_y });
        }
        SimulationError::require_positive("cell_size", *cell_size)?;

        let n = grid_x * grid_y;
        for (layer, actual) in [("ros", ros.len()), ("fuel_mask", fuel_mask.len())] {
            if actual != n {
                return Err(SimulationError::ShapeMismatch {
                    layer,
                    expected: n,
                    actual,
                });
            }
        }

        Ok(Self {
            grid_x,
            grid_y,
            cell_size,
            state: vec![CellState::Unburned; n],
            ignition_time: vec![Seconds::INFINITY; n],
            required_burn_duration: vec![Seconds::INFINITY; n],
            ros,
            fuel_mask,
            fuel_left: vec![1.0; n],
        })
    }

    /// Fully fuelled grid with the same spread rate everywhere
    ///
    /// # Errors
    /// Same as [`FireGrid::new`].
    pub fn uniform(
        grid_x: usize,
        grid_y: usize,
        cell_size: Meters,
        ros: MetersPerSecond,
    ) -> Result<Self, SimulationError> {
        let n = grid_x * grid_y;
        Self::new(grid_x, grid_y, cell_size, vec![ros; n], vec![true; n])
    }

    /// Number of columns
    #[inline]
    pub fn grid_x(&self) -> usize {
        self.grid_x
    }

    /// Number of rows
    #[inline]
    pub fn grid_y(&self) -> usize {
        self.grid_y
    }

    /// Edge length of one square cell
    #[inline]
    pub fn cell_size(&self) -> Meters {
        self.cell_size
    }

    /// Area of one cell (m²)
    #[inline]
    pub fn cell_area(&self) -> f64 {
        *self.cell_size * *self.cell_size
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Always false: construction rejects empty grids
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Flat index of a cell
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.grid_x + col
    }

    /// `(row, col)` of a flat index
    #[inline]
    pub fn position(&self, idx: usize) -> (usize, usize) {
        (idx / self.grid_x, idx % self.grid_x)
    }

    /// Whether signed coordinates fall inside the grid
    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.grid_y && (col as usize) < self.grid_x
    }

    /// Validate coordinates coming from callers
    ///
    /// # Errors
    /// [`SimulationError::OutOfBounds`] when the cell is outside the grid.
    pub fn check_bounds(&self, row: usize, col: usize) -> Result<usize, SimulationError> {
        if row < self.grid_y && col < self.grid_x {
            Ok(self.index(row, col))
        } else {
            Err(SimulationError::OutOfBounds {
                row,
                col,
                grid_y: self.grid_y,
                grid_x: self.grid_x,
            })
        }
    }

    /// Burn state of a cell
    #[inline]
    pub fn state(&self, row: usize, col: usize) -> CellState {
        self.state[self.index(row, col)]
    }

    /// All burn states, row-major
    #[inline]
    pub fn states(&self) -> &[CellState] {
        &self.state
    }

    /// Ignition time (or best pending candidate while unburned)
    #[inline]
    pub fn ignition_time(&self, row: usize, col: usize) -> Seconds {
        self.ignition_time[self.index(row, col)]
    }

    /// All ignition times, row-major
    #[inline]
    pub fn ignition_times(&self) -> &[Seconds] {
        &self.ignition_time
    }

    /// How long the cell stays burning once ignited
    #[inline]
    pub fn burn_duration(&self, row: usize, col: usize) -> Seconds {
        self.required_burn_duration[self.index(row, col)]
    }

    /// All burn durations, row-major
    #[inline]
    pub fn burn_durations(&self) -> &[Seconds] {
        &self.required_burn_duration
    }

    /// Precomputed rate of spread
    #[inline]
    pub fn ros(&self, row: usize, col: usize) -> MetersPerSecond {
        self.ros[self.index(row, col)]
    }

    /// All spread rates, row-major
    #[inline]
    pub fn ros_values(&self) -> &[MetersPerSecond] {
        &self.ros
    }

    /// Whether the cell carries fuel
    #[inline]
    pub fn has_fuel(&self, row: usize, col: usize) -> bool {
        self.fuel_mask[self.index(row, col)]
    }

    /// Fuel mask, row-major
    #[inline]
    pub fn fuel_mask(&self) -> &[bool] {
        &self.fuel_mask
    }

    /// Fraction of fuel remaining in a cell
    #[inline]
    pub fn fuel_left(&self, row: usize, col: usize) -> f64 {
        self.fuel_left[self.index(row, col)]
    }

    /// Number of cells in a given state
    pub fn count(&self, state: CellState) -> usize {
        self.state.iter().filter(|&&s| s == state).count()
    }

    /// Number of fuel-bearing cells
    pub fn fuel_cell_count(&self) -> usize {
        self.fuel_mask.iter().filter(|&&f| f).count()
    }

    /// Any cell currently burning
    pub fn any_burning(&self) -> bool {
        self.state.contains(&CellState::Burning)
    }

    /// In-bounds 8-connected neighbours as `(row, col, d_row, d_col)`
    pub fn neighbors(
        &self,
        row: usize,
        col: usize,
    ) -> impl Iterator<Item = (usize, usize, isize, isize)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let r = row as isize + dr;
            let c = col as isize + dc;
            self.contains(r, c)
                .then(|| (r as usize, c as usize, dr, dc))
        })
    }

    /// In-bounds cells at Chebyshev distance exactly `radius`, row-major
    ///
    /// Radius 0 yields the centre itself.
    pub fn ring(&self, row: usize, col: usize, radius: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (cy, cx, r) = (row as isize, col as isize, radius as isize);
        ((cy - r)..=(cy + r)).flat_map(move |i| {
            let on_edge_row = i == cy - r || i == cy + r;
            ((cx - r)..=(cx + r)).filter_map(move |j| {
                let on_perimeter = on_edge_row || j == cx - r || j == cx + r;
                (on_perimeter && self.contains(i, j)).then(|| (i as usize, j as usize))
            })
        })
    }

    /// Time to burn through a cell at its own spread rate
    ///
    /// `ta(cell, max(floor, ros)) / (gain · factor)`; the floor keeps force-seeded
    /// zero-ROS cells from burning forever.
    pub(crate) fn burn_duration_for(&self, idx: usize, gain: f64, factor: f64) -> Seconds {
        let ros = MetersPerSecond::new(self.ros[idx].value().max(MIN_SEED_ROS));
        (self.cell_size / ros) / (gain * factor)
    }

    /// Move a cell to BURNING at `time`
    pub(crate) fn ignite(&mut self, idx: usize, time: Seconds, duration: Seconds) {
        debug_assert!(self.state[idx].can_transition_to(CellState::Burning));
        self.state[idx] = CellState::Burning;
        self.ignition_time[idx] = time;
        self.required_burn_duration[idx] = duration;
    }

    /// Force a cell to carry fuel (ignition sources are always fuelled)
    pub(crate) fn refuel(&mut self, idx: usize) {
        self.fuel_mask[idx] = true;
        self.fuel_left[idx] = 1.0;
    }

    /// Record a better pending ignition candidate for an unburned cell
    pub(crate) fn record_candidate(&mut self, idx: usize, time: Seconds) {
        debug_assert_eq!(self.state[idx], CellState::Unburned);
        self.ignition_time[idx] = time;
    }

    /// Apply a legal state transition
    pub(crate) fn set_state(&mut self, idx: usize, next: CellState) {
        debug_assert!(
            self.state[idx].can_transition_to(next),
            "illegal transition {} -> {next}",
            self.state[idx]
        );
        self.state[idx] = next;
    }

    /// State by flat index
    #[inline]
    pub(crate) fn state_at(&self, idx: usize) -> CellState {
        self.state[idx]
    }
}

/// Lower bound on the spread rate used for burn durations (m/s)
pub const MIN_SEED_ROS: f64 = 1e-6;

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(grid_x: usize, grid_y: usize) -> FireGrid {
        FireGrid::uniform(grid_x, grid_y, Meters::new(20.0), MetersPerSecond::new(0.05)).unwrap()
    }

    #[test]
    fn test_new_grid_is_unburned_and_unscheduled() {
        let g = grid(4, 3);
        assert_eq!(g.len(), 12);
        assert_eq!(g.count(CellState::Unburned), 12);
        assert!(g.ignition_times().iter().all(|t| !t.is_finite()));
        assert!((g.fuel_left(2, 3) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_construction() {
        assert!(matches!(
            FireGrid::uniform(0, 3, Meters::new(20.0), MetersPerSecond::ZERO),
            Err(SimulationError::InvalidDimensions { .. })
        ));
        assert!(FireGrid::uniform(3, 3, Meters::new(0.0), MetersPerSecond::ZERO).is_err());
        assert!(matches!(
            FireGrid::new(2, 2, Meters::new(10.0), vec![MetersPerSecond::ZERO; 4], vec![true; 3]),
            Err(SimulationError::ShapeMismatch { layer: "fuel_mask", .. })
        ));
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let g = grid(5, 5);
        assert_eq!(g.neighbors(0, 0).count(), 3);
        assert_eq!(g.neighbors(0, 2).count(), 5);
        assert_eq!(g.neighbors(2, 2).count(), 8);
    }

    #[test]
    fn test_ring_enumeration() {
        let g = grid(7, 7);
        assert_eq!(g.ring(3, 3, 0).collect::<Vec<_>>(), vec![(3, 3)]);
        assert_eq!(g.ring(3, 3, 1).count(), 8);
        assert_eq!(g.ring(3, 3, 2).count(), 16);
        // Clipped at the corner: (0,1) (1,0) (1,1)
        assert_eq!(g.ring(0, 0, 1).collect::<Vec<_>>(), vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_bounds_check() {
        let g = grid(4, 3);
        assert_eq!(g.check_bounds(2, 3), Ok(11));
        assert_eq!(
            g.check_bounds(3, 0),
            Err(SimulationError::OutOfBounds {
                row: 3,
                col: 0,
                grid_y: 3,
                grid_x: 4
            })
        );
    }

    #[test]
    fn test_burn_duration_floors_ros() {
        let mut g = FireGrid::uniform(3, 3, Meters::new(20.0), MetersPerSecond::ZERO).unwrap();
        let d = g.burn_duration_for(4, 1.5, 1.15);
        assert!(d.is_finite());
        g.ignite(4, Seconds::new(0.0), d);
        assert_eq!(g.state(1, 1), CellState::Burning);
    }
}
