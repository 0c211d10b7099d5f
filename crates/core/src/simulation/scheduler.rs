//! Candidate ignition evaluation
//!
//! For every unburned, fuelled cell the scheduler looks at its burning
//! neighbours, derives the earliest time the front could arrive and applies the
//! neighbour-count adjustment. The scan only reads the grid, so it runs in
//! parallel; the caller commits the returned candidates in row-major order.

use crate::core_types::cell_state::CellState;
use crate::core_types::units::{MetersPerSecond, Seconds};
use crate::core_types::weather::WindConditions;
use crate::grid::FireGrid;
use crate::physics::{directional_scale, neighbor_delay};
use crate::simulation::config::SpreadTuning;
use rayon::prelude::*;

/// Minimum improvement (s) before a new candidate replaces a recorded one
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Directional multipliers for the eight neighbour offsets
///
/// The multiplier only depends on the offset and the wind, so it is computed
/// once per run instead of per cell pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalKernel {
    /// Indexed by `(d_row + 1) * 3 + (d_col + 1)`, offset from source to target
    scales: [f64; 9],
}

impl DirectionalKernel {
    /// Build the kernel for a wind and tuning
    pub fn new(wind: &WindConditions, tuning: &SpreadTuning) -> Self {
        let mut scales = [0.0; 9];
        for d_row in -1_isize..=1 {
            for d_col in -1_isize..=1 {
                let slot = Self::slot(d_row, d_col);
                scales[slot] = if d_row == 0 && d_col == 0 {
                    0.0
                } else if wind.is_calm() && tuning.isotropic_when_calm {
                    1.0
                } else {
                    // Source at (1, 1), target at (1 + d_row, 1 + d_col)
                    directional_scale(
                        1,
                        1,
                        (1 + d_row) as usize,
                        (1 + d_col) as usize,
                        wind.direction,
                        tuning.dir_base,
                    )
                };
            }
        }
        Self { scales }
    }

    #[inline]
    fn slot(d_row: isize, d_col: isize) -> usize {
        ((d_row + 1) * 3 + (d_col + 1)) as usize
    }

    /// Multiplier for fire travelling by `(d_row, d_col)` from source to target
    #[inline]
    pub fn scale(&self, d_row: isize, d_col: isize) -> f64 {
        self.scales[Self::slot(d_row, d_col)]
    }
}

/// Earliest arrival found for one cell this timestep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Flat index of the target cell
    pub index: usize,
    /// Adjusted ignition time
    pub ignite_time: Seconds,
    /// Adjusted travel delay
    pub travel_delay: Seconds,
    /// Burning neighbours that produced a finite arrival
    pub contributing_neighbors: u32,
}

/// Evaluate every unburned, fuelled cell against its burning neighbours
///
/// Returns candidates in row-major order. No improvement check is applied here:
/// the commit step compares against the recorded best time.
pub fn evaluate_candidates(
    grid: &FireGrid,
    kernel: &DirectionalKernel,
    tuning: &SpreadTuning,
    min_neighbors: u32,
) -> Vec<Candidate> {
    (0..grid.len())
        .into_par_iter()
        .filter_map(|idx| evaluate_cell(grid, kernel, tuning, min_neighbors, idx))
        .collect()
}

/// Candidate for a single cell, if it qualifies
pub fn evaluate_cell(
    grid: &FireGrid,
    kernel: &DirectionalKernel,
    tuning: &SpreadTuning,
    min_neighbors: u32,
    idx: usize,
) -> Option<Candidate> {
    let (row, col) = grid.position(idx);
    if grid.state_at(idx) != CellState::Unburned || !grid.has_fuel(row, col) {
        return None;
    }

    let mut burning_neighbors = 0_u32;
    let mut best_time = Seconds::INFINITY;
    let mut best_delay = Seconds::INFINITY;

    for (n_row, n_col, d_row, d_col) in grid.neighbors(row, col) {
        if grid.state(n_row, n_col) != CellState::Burning {
            continue;
        }
        // Fire travels from the neighbour to this cell: reverse the offset
        let scale = kernel.scale(-d_row, -d_col);
        let ros_eff = *grid.ros(n_row, n_col) * scale * tuning.spread_gain;
        if ros_eff.is_nan() || ros_eff <= 0.0 {
            continue;
        }

        let delay = neighbor_delay(grid.cell_size(), MetersPerSecond::new(ros_eff), d_row, d_col);
        let arrival = grid.ignition_time(n_row, n_col) + delay;
        if arrival.is_finite() {
            burning_neighbors += 1;
            if arrival < best_time {
                best_time = arrival;
                best_delay = delay;
            }
        }
    }

    if burning_neighbors < min_neighbors.max(1) || !best_time.is_finite() {
        return None;
    }

    let (ignite_time, travel_delay) = adjust_for_neighbors(best_time, best_delay, burning_neighbors, tuning);
    Some(Candidate {
        index: idx,
        ignite_time,
        travel_delay,
        contributing_neighbors: burning_neighbors,
    })
}

/// Neighbour-count adjustment of the best arrival
///
/// One contributor: `delay *= 1 + p; t += p · delay`.
/// Two or more: `delay *= 1 − b; t −= b · delay`.
pub fn adjust_for_neighbors(
    time: Seconds,
    delay: Seconds,
    burning_neighbors: u32,
    tuning: &SpreadTuning,
) -> (Seconds, Seconds) {
    match burning_neighbors {
        0 => (time, delay),
        1 => {
            let p = tuning.single_neighbor_penalty;
            let delay = delay * (1.0 + p);
            (time + delay * p, delay)
        }
        _ => {
            let b = tuning.multi_neighbor_bonus;
            let delay = delay * (1.0 - b);
            (time - delay * b, delay)
        }
    }
}

/// Whether `candidate` beats the recorded best by more than [`IMPROVEMENT_EPSILON`]
#[inline]
pub fn improves(candidate: Seconds, recorded: Seconds) -> bool {
    *candidate + IMPROVEMENT_EPSILON < *recorded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Meters;
    use approx::assert_relative_eq;

    fn burning_centre(ros: f64) -> FireGrid {
        let mut grid = FireGrid::uniform(5, 5, Meters::new(20.0), MetersPerSecond::new(ros)).unwrap();
        let idx = grid.index(2, 2);
        let duration = grid.burn_duration_for(idx, 1.5, 1.15);
        grid.ignite(idx, Seconds::new(0.0), duration);
        grid
    }

    #[test]
    fn test_calm_kernel_is_isotropic() {
        let kernel = DirectionalKernel::new(&WindConditions::calm(), &SpreadTuning::default());
        for (dr, dc) in crate::grid::NEIGHBOR_OFFSETS {
            assert_eq!(kernel.scale(dr, dc), 1.0);
        }
    }

    #[test]
    fn test_calm_kernel_keeps_bearing_when_not_isotropic() {
        let tuning = SpreadTuning {
            isotropic_when_calm: false,
            ..SpreadTuning::default()
        };
        let kernel = DirectionalKernel::new(&WindConditions::new(0.0, 90.0), &tuning);
        assert_relative_eq!(kernel.scale(0, 1), 1.0, max_relative = 1e-12);
        assert_eq!(kernel.scale(0, -1), 0.0);
        assert!(kernel.scale(-1, 0) < 1.0);
    }

    #[test]
    fn test_windy_kernel_blocks_upwind() {
        let kernel = DirectionalKernel::new(&WindConditions::new(5.0, 90.0), &SpreadTuning::default());
        assert_relative_eq!(kernel.scale(0, 1), 1.0, max_relative = 1e-12);
        assert_eq!(kernel.scale(0, -1), 0.0);
    }

    #[test]
    fn test_single_neighbor_candidates_around_ignition() {
        let grid = burning_centre(0.05);
        let tuning = SpreadTuning::default();
        let kernel = DirectionalKernel::new(&WindConditions::calm(), &tuning);
        let candidates = evaluate_candidates(&grid, &kernel, &tuning, 1);

        assert_eq!(candidates.len(), 8);
        // Row-major: (1,1) diagonal first, (1,2) orthogonal second
        let diag = candidates[0];
        let orth = candidates[1];
        assert_eq!(grid.position(diag.index), (1, 1));
        assert_eq!(grid.position(orth.index), (1, 2));

        // ta = 20 / (0.05 · 1.5) = 266.67 s, then the single-neighbour bonus
        let ta = 20.0 / 0.075;
        assert_relative_eq!(*orth.travel_delay, ta * 0.98, max_relative = 1e-9);
        assert_relative_eq!(*orth.ignite_time, ta - 0.02 * ta * 0.98, max_relative = 1e-9);
        assert_relative_eq!(
            *diag.ignite_time,
            ta * std::f64::consts::SQRT_2 * (1.0 - 0.02 * 0.98),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_min_neighbors_filters() {
        let grid = burning_centre(0.05);
        let tuning = SpreadTuning::default();
        let kernel = DirectionalKernel::new(&WindConditions::calm(), &tuning);
        assert!(evaluate_candidates(&grid, &kernel, &tuning, 2).is_empty());
    }

    #[test]
    fn test_zero_ros_neighbor_does_not_spread() {
        let grid = burning_centre(0.0);
        let tuning = SpreadTuning::default();
        let kernel = DirectionalKernel::new(&WindConditions::calm(), &tuning);
        assert!(evaluate_candidates(&grid, &kernel, &tuning, 1).is_empty());
    }

    #[test]
    fn test_multi_neighbor_bonus() {
        let tuning = SpreadTuning::default();
        let (t, d) = adjust_for_neighbors(Seconds::new(100.0), Seconds::new(50.0), 3, &tuning);
        assert_relative_eq!(*d, 48.5, max_relative = 1e-12);
        assert_relative_eq!(*t, 100.0 - 0.03 * 48.5, max_relative = 1e-12);
    }

    #[test]
    fn test_improvement_threshold() {
        assert!(improves(Seconds::new(10.0), Seconds::INFINITY));
        assert!(!improves(Seconds::new(10.0), Seconds::new(10.0 + 1e-10)));
        assert!(improves(Seconds::new(10.0), Seconds::new(10.1)));
    }
}
