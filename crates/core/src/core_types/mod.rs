//! Core types and utilities

pub mod cell_state;
pub mod fuel;
pub mod landcover;
pub mod units;
pub mod weather;

pub use cell_state::CellState;
pub use fuel::{FuelModel, FuelModelParams};
pub use landcover::LandCover;
pub use units::*;
pub use weather::*;
