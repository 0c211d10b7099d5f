//! Cell-to-cell travel time of the fire front
//!
//! On the 8-connected grid an orthogonal neighbour sits one cell size away and a
//! diagonal neighbour `√2` cell sizes away.

use crate::core_types::units::{Meters, MetersPerSecond, Seconds};
use std::f64::consts::SQRT_2;

/// Time for the front to cross one cell orthogonally (`ta = cell / ros`)
///
/// Non-positive or NaN spread rates never arrive ([`Seconds::INFINITY`]).
#[inline]
pub fn orthogonal_delay(cell_size: Meters, ros: MetersPerSecond) -> Seconds {
    cell_size / ros
}

/// Time for the front to cross one cell diagonally (`td = √2 · cell / ros`)
#[inline]
pub fn diagonal_delay(cell_size: Meters, ros: MetersPerSecond) -> Seconds {
    (cell_size * SQRT_2) / ros
}

/// Travel delay to a neighbour at offset `(d_row, d_col)`, each in `-1..=1`
#[inline]
pub fn neighbor_delay(cell_size: Meters, ros: MetersPerSecond, d_row: isize, d_col: isize) -> Seconds {
    if d_row != 0 && d_col != 0 {
        diagonal_delay(cell_size, ros)
    } else {
        orthogonal_delay(cell_size, ros)
    }
}
