//! Grid data model: environmental inputs and the mutable fire-state raster

pub mod environment;
pub mod fire_grid;

pub use environment::EnvironmentLayers;
pub use fire_grid::{FireGrid, NEIGHBOR_OFFSETS};
