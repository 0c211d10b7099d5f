//! Ignition source selection
//!
//! The first source is the grid centre when it can burn, otherwise the nearest
//! viable cell on expanding square rings around it. When the fire dies out the
//! driver re-ignites at the next viable cell in row-major order after the last
//! source, wrapping around and never reusing a source.

use crate::core_types::cell_state::CellState;
use crate::grid::FireGrid;
use rustc_hash::FxHashSet;

/// A cell that can start a fire: fuelled, positive spread rate, still unburned
pub fn is_viable_source(grid: &FireGrid, row: usize, col: usize) -> bool {
    if row >= grid.grid_y() || col >= grid.grid_x() {
        return false;
    }
    grid.has_fuel(row, col)
        && grid.ros(row, col).is_spreading()
        && grid.state(row, col) == CellState::Unburned
}

/// First viable cell on the square rings `1..=max_radius` around `(row, col)`
///
/// Rings are scanned row-major; the centre itself is not considered.
pub fn spiral_search(grid: &FireGrid, row: usize, col: usize, max_radius: usize) -> Option<(usize, usize)> {
    (1..=max_radius).find_map(|r| grid.ring(row, col, r).find(|&(i, j)| is_viable_source(grid, i, j)))
}

/// Bookkeeping of sources used so far
#[derive(Debug, Clone, Default)]
pub struct SourceTracker {
    tried: FxHashSet<usize>,
    last: Option<usize>,
    current: Option<(usize, usize)>,
}

impl SourceTracker {
    /// Empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `(row, col)` as the latest source
    pub fn record(&mut self, grid: &FireGrid, row: usize, col: usize) {
        let idx = grid.index(row, col);
        self.tried.insert(idx);
        self.last = Some(idx);
        self.current = Some((row, col));
    }

    /// Whether a flat index has already been used as a source
    pub fn was_tried(&self, idx: usize) -> bool {
        self.tried.contains(&idx)
    }

    /// Number of sources seeded
    pub fn seeded(&self) -> usize {
        self.tried.len()
    }

    /// Most recent source position
    pub fn current(&self) -> Option<(usize, usize)> {
        self.current
    }

    /// Next untried viable cell in row-major order after the last source
    ///
    /// Starts from index 0 when no source has been used yet. Visits every cell
    /// at most once (the last source itself comes last).
    pub fn next_linear(&self, grid: &FireGrid) -> Option<(usize, usize)> {
        let n = grid.len();
        let start = self.last.map_or(0, |last| last + 1);
        (0..n)
            .map(|k| (start + k) % n)
            .filter(|idx| !self.was_tried(*idx))
            .map(|idx| grid.position(idx))
            .find(|&(row, col)| is_viable_source(grid, row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Meters, MetersPerSecond};

    fn grid_with_fuel(grid_x: usize, grid_y: usize, fuelled: &[(usize, usize)]) -> FireGrid {
        let n = grid_x * grid_y;
        let mut mask = vec![false; n];
        for &(r, c) in fuelled {
            mask[r * grid_x + c] = true;
        }
        FireGrid::new(grid_x, grid_y, Meters::new(10.0), vec![MetersPerSecond::new(0.05); n], mask)
            .unwrap()
    }

    #[test]
    fn test_viability_needs_fuel_and_ros() {
        let grid = grid_with_fuel(3, 3, &[(0, 0)]);
        assert!(is_viable_source(&grid, 0, 0));
        assert!(!is_viable_source(&grid, 1, 1));
        assert!(!is_viable_source(&grid, 3, 0));

        let no_ros = FireGrid::uniform(3, 3, Meters::new(10.0), MetersPerSecond::ZERO).unwrap();
        assert!(!is_viable_source(&no_ros, 1, 1));
    }

    #[test]
    fn test_spiral_prefers_nearest_ring() {
        let grid = grid_with_fuel(9, 9, &[(0, 0), (6, 4)]);
        assert_eq!(spiral_search(&grid, 4, 4, 10), Some((6, 4)));
        assert_eq!(spiral_search(&grid, 4, 4, 1), None);
    }

    #[test]
    fn test_linear_scan_wraps_and_skips_tried() {
        let grid = grid_with_fuel(4, 4, &[(0, 1), (3, 2)]);
        let mut tracker = SourceTracker::new();
        assert_eq!(tracker.next_linear(&grid), Some((0, 1)));

        tracker.record(&grid, 3, 2);
        // Wraps past the end of the grid back to (0, 1)
        assert_eq!(tracker.next_linear(&grid), Some((0, 1)));

        tracker.record(&grid, 0, 1);
        assert_eq!(tracker.next_linear(&grid), None);
        assert_eq!(tracker.seeded(), 2);
        assert_eq!(tracker.current(), Some((0, 1)));
    }
}
