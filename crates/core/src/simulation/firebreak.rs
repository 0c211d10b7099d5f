//! Firebreak delineation around the active front
//!
//! One-shot pass over the final grid: every cell within Chebyshev distance `r`
//! of a burning cell that the fire has not reached becomes a firebreak.

use crate::core_types::cell_state::CellState;
use crate::error::SimulationError;
use crate::grid::FireGrid;
use tracing::{debug, warn};

/// Default firebreak width (m)
pub const DEFAULT_FIREBREAK_WIDTH_M: f64 = 8.0;

/// Ring radius in cells for a firebreak width: `max(1, round(width / cell))`
///
/// Halves round to even, so a 50 m break on a 20 m grid is two cells wide.
///
/// # Errors
/// Rejects negative or non-finite widths.
pub fn firebreak_radius(width_m: f64, cell_size: f64) -> Result<usize, SimulationError> {
    if !width_m.is_finite() || width_m < 0.0 {
        return Err(SimulationError::invalid(
            "firebreak_width",
            format!("must be finite and non-negative, got {width_m}"),
        ));
    }
    Ok(((width_m / cell_size).round_ties_even() as usize).max(1))
}

/// Mark firebreak rings around all burning cells
///
/// Returns the newly marked cells in row-major order; empty when nothing is
/// burning.
///
/// # Errors
/// See [`firebreak_radius`].
pub fn mark_firebreak(grid: &mut FireGrid, width_m: f64) -> Result<Vec<(usize, usize)>, SimulationError> {
    let radius = firebreak_radius(width_m, *grid.cell_size())?;

    let burning: Vec<usize> = (0..grid.len())
        .filter(|&idx| grid.state_at(idx) == CellState::Burning)
        .collect();
    if burning.is_empty() {
        warn!("No burning cells, firebreak not created");
        return Ok(Vec::new());
    }

    let mut marked = vec![false; grid.len()];
    for &idx in &burning {
        let (row, col) = grid.position(idx);
        for r in 1..=radius {
            for (i, j) in grid.ring(row, col, r) {
                let target = grid.index(i, j);
                if grid.state_at(target) == CellState::Unburned {
                    marked[target] = true;
                }
            }
        }
    }

    let cells: Vec<(usize, usize)> = marked
        .iter()
        .enumerate()
        .filter(|(_, &m)| m)
        .map(|(idx, _)| grid.position(idx))
        .collect();
    for &(row, col) in &cells {
        let idx = grid.index(row, col);
        grid.set_state(idx, CellState::Firebreak);
    }

    debug!(
        burning = burning.len(),
        radius,
        marked = cells.len(),
        "Firebreak marked"
    );
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Meters, MetersPerSecond, Seconds};

    fn grid_burning_at(cells: &[(usize, usize)], size: usize, cell_size: f64) -> FireGrid {
        let mut grid =
            FireGrid::uniform(size, size, Meters::new(cell_size), MetersPerSecond::new(0.05)).unwrap();
        for &(r, c) in cells {
            let idx = grid.index(r, c);
            grid.ignite(idx, Seconds::new(0.0), Seconds::new(100.0));
        }
        grid
    }

    #[test]
    fn test_radius_rounding() {
        assert_eq!(firebreak_radius(8.0, 30.0), Ok(1));
        assert_eq!(firebreak_radius(30.0, 30.0), Ok(1));
        assert_eq!(firebreak_radius(50.0, 20.0), Ok(2));
        assert_eq!(firebreak_radius(70.0, 20.0), Ok(4));
        assert_eq!(firebreak_radius(40.0, 20.0), Ok(2));
        assert!(firebreak_radius(-1.0, 20.0).is_err());
        assert!(firebreak_radius(f64::NAN, 20.0).is_err());
    }

    #[test]
    fn test_one_cell_ring() {
        let mut grid = grid_burning_at(&[(3, 3)], 7, 20.0);
        let marked = mark_firebreak(&mut grid, 20.0).unwrap();
        assert_eq!(marked.len(), 8);
        assert_eq!(grid.count(CellState::Firebreak), 8);
        assert_eq!(grid.state(3, 3), CellState::Burning);
        assert_eq!(grid.state(1, 3), CellState::Unburned);
    }

    #[test]
    fn test_never_overwrites_fire() {
        let mut grid = grid_burning_at(&[(2, 2), (2, 3)], 6, 10.0);
        let idx = grid.index(1, 2);
        grid.ignite(idx, Seconds::new(0.0), Seconds::new(1.0));
        grid.set_state(idx, CellState::Burned);

        let marked = mark_firebreak(&mut grid, 10.0).unwrap();
        assert!(!marked.contains(&(1, 2)));
        assert_eq!(grid.state(1, 2), CellState::Burned);
        assert_eq!(grid.state(2, 3), CellState::Burning);
        // 4x3 box around the pair minus the three fire cells
        assert_eq!(marked.len(), 9);
    }

    #[test]
    fn test_nothing_burning_marks_nothing() {
        let mut grid = grid_burning_at(&[], 4, 10.0);
        assert!(mark_firebreak(&mut grid, 10.0).unwrap().is_empty());
        assert_eq!(grid.count(CellState::Firebreak), 0);
    }
}
