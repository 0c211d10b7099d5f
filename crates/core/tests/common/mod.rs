//! Shared helpers for integration tests

#![allow(dead_code)]

use fire_ca_core::core_types::units::{Meters, MetersPerSecond};
use fire_ca_core::{FireGrid, FireSimulation, SimulationConfig, WindConditions};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config for an `n × n` grid of 20 m cells with a 10 s timestep
pub fn square_config(n: usize, minutes: f64, wind: WindConditions) -> SimulationConfig {
    SimulationConfig {
        grid_x: n,
        grid_y: n,
        cell_size: 20.0,
        sim_minutes: minutes,
        dt: 10.0,
        wind,
        ..SimulationConfig::default()
    }
}

/// Fully fuelled `n × n` grid with uniform spread rate
pub fn uniform_sim(n: usize, ros: f64, minutes: f64, wind: WindConditions) -> FireSimulation {
    let grid = FireGrid::uniform(n, n, Meters::new(20.0), MetersPerSecond::new(ros)).unwrap();
    FireSimulation::from_grid(square_config(n, minutes, wind), grid).unwrap()
}

/// `n × n` grid where only the listed cells carry fuel
pub fn patchy_sim(n: usize, fuelled: &[(usize, usize)], minutes: f64) -> FireSimulation {
    let mut mask = vec![false; n * n];
    for &(r, c) in fuelled {
        mask[r * n + c] = true;
    }
    let grid = FireGrid::new(n, n, Meters::new(20.0), vec![MetersPerSecond::new(0.05); n * n], mask).unwrap();
    FireSimulation::from_grid(square_config(n, minutes, WindConditions::calm()), grid).unwrap()
}
