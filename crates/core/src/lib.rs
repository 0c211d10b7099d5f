//! Wildfire Spread Core Library
//!
//! Predicts which cells of a raster landscape ignite, and when, from terrain,
//! vegetation, temperature and wind inputs.
//!
//! ## Model
//!
//! - **Rate of spread**: Rothermel (1972) surface fire model, driven by slope,
//!   NDVI-derived fuel models and moisture, land-surface temperature and wind
//! - **Spread engine**: discrete-event cellular automaton on an 8-connected grid
//!   with a priority queue of pending ignitions and fallback re-ignition
//! - **Anisotropy**: wind-weighted directional multiplier per neighbour
//! - **Post-processing**: firebreak rings around the active front and run statistics
//!
//! ## Quick start
//!
//! ```
//! use fire_ca_core::{EnvironmentLayers, FireSimulation, LandCover, SimulationConfig, WindConditions};
//! use fire_ca_core::core_types::Celsius;
//!
//! let config = SimulationConfig {
//!     grid_x: 21,
//!     grid_y: 21,
//!     cell_size: 20.0,
//!     sim_minutes: 15.0,
//!     wind: WindConditions::new(5.0, 90.0),
//!     ..SimulationConfig::default()
//! };
//! let layers = EnvironmentLayers::uniform(21, 21, 0.0, 0.3, Celsius::new(30.0), LandCover::Shrub)?;
//!
//! let mut sim = FireSimulation::new(config, layers)?;
//! let summary = sim.run();
//! sim.mark_firebreak(8.0)?;
//! println!("{summary}\n{}", sim.statistics());
//! # Ok::<(), fire_ca_core::SimulationError>(())
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Spread model
pub mod grid;
pub mod physics;
pub mod simulation;
pub mod stats;

// External data seams and the end-to-end run
pub mod pipeline;
pub mod provider;

// Re-export core types
pub use core_types::{CellState, FuelModel, LandCover, WindConditions, WindEnvelope};
pub use error::SimulationError;

// Re-export the engine
pub use grid::{EnvironmentLayers, FireGrid};
pub use physics::calculate_ros;
pub use simulation::{
    FireSimulation, HaltReason, PendingIgnition, RunSummary, SimulationConfig, SpreadTuning,
    StepOutcome,
};
pub use stats::{LastIgnitionPoint, SimulationStats};

// Re-export the pipeline
pub use pipeline::{run_fire_model, FireReport, FireRequest};
pub use provider::{EnvironmentProvider, FixedWind, PatchRequest, StaticEnvironment, WindProvider, WindRequest};
