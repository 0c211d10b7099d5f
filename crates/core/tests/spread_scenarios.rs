//! End-to-end spread scenarios with hand-computed timings

mod common;

use approx::assert_relative_eq;
use common::{patchy_sim, uniform_sim};
use fire_ca_core::core_types::units::Celsius;
use fire_ca_core::{
    CellState, EnvironmentLayers, FireSimulation, HaltReason, LandCover, SimulationConfig, WindConditions,
};
use std::f64::consts::SQRT_2;

/// Orthogonal travel time with the default gain: 20 m / (0.05 m/s · 1.5)
const TA: f64 = 20.0 / 0.075;

#[test]
fn test_calm_uniform_grid_ignites_ring_on_schedule() {
    let mut sim = uniform_sim(5, 0.05, 10.0, WindConditions::calm());
    let summary = sim.run();
    assert_eq!(summary.halt_reason, HaltReason::HorizonReached);
    assert_eq!(*summary.final_time, 600.0);

    let grid = sim.grid();
    // Single contributing neighbour: delay ×0.98, time −0.02·delay
    let orthogonal = TA * (1.0 - 0.02 * 0.98);
    let diagonal = TA * SQRT_2 * (1.0 - 0.02 * 0.98);

    for (r, c) in [(1, 2), (2, 1), (2, 3), (3, 2)] {
        assert_ne!(grid.state(r, c), CellState::Unburned);
        assert_relative_eq!(*grid.ignition_time(r, c), orthogonal, max_relative = 1e-9);
    }
    for (r, c) in [(1, 1), (1, 3), (3, 1), (3, 3)] {
        assert_ne!(grid.state(r, c), CellState::Unburned);
        assert_relative_eq!(*grid.ignition_time(r, c), diagonal, max_relative = 1e-9);
    }

    // Centre burns for TA·1.5/1.725 = 231.9 s
    assert_eq!(grid.state(2, 2), CellState::Burned);
    assert_relative_eq!(*grid.burn_duration(2, 2), 400.0 / 1.725, max_relative = 1e-9);
}

#[test]
fn test_two_neighbour_bonus_on_outer_ring() {
    let mut sim = uniform_sim(5, 0.05, 10.0, WindConditions::calm());
    sim.run();
    let grid = sim.grid();

    // (0, 2) is reached from (1, 2) plus the diagonals (1, 1) and (1, 3)
    let from = TA * (1.0 - 0.02 * 0.98);
    let delay = TA * 0.97;
    assert_relative_eq!(*grid.ignition_time(0, 2), from + TA - 0.03 * delay, max_relative = 1e-9);
}

#[test]
fn test_short_horizon_leaves_only_the_source() {
    let mut sim = uniform_sim(5, 0.05, 2.0, WindConditions::calm());
    sim.run();
    assert_eq!(sim.grid().count(CellState::Burning), 1);
    assert_eq!(sim.grid().count(CellState::Unburned), 24);

    let pending = sim.pending_ignitions();
    assert_eq!(pending.len(), 8);
    // Pop order: the four orthogonal neighbours first, row-major among equals
    let first: Vec<_> = pending.iter().take(4).map(|e| (e.row, e.col)).collect();
    assert_eq!(first, vec![(1, 2), (2, 1), (2, 3), (3, 2)]);
}

#[test]
fn test_non_flammable_landscape_halts_immediately() {
    let config = SimulationConfig {
        grid_x: 8,
        grid_y: 8,
        ..SimulationConfig::default()
    };
    // Bare ground: below the NDVI fuel threshold everywhere
    let layers = EnvironmentLayers::uniform(8, 8, 0.0, 0.1, Celsius::new(35.0), LandCover::Shrub).unwrap();
    let mut sim = FireSimulation::new(config, layers).unwrap();
    let summary = sim.run();

    assert_eq!(summary.halt_reason, HaltReason::NoViableSource);
    assert_eq!(*summary.final_time, 0.0);
    assert_eq!(summary.sources_seeded, 0);
    let stats = sim.statistics();
    assert_eq!(stats.areas.burning.cells + stats.areas.burned.cells, 0);
    assert!(stats.last_ignition.is_none());
}

#[test]
fn test_fallback_reignites_separate_patch() {
    let mut sim = patchy_sim(7, &[(3, 3), (0, 0), (0, 1)], 20.0);
    let summary = sim.run();

    assert_eq!(summary.sources_seeded, 2);
    assert_eq!(summary.halt_reason, HaltReason::FireExhausted);
    // Patch one burns out at t = 240, re-ignition at 250, patch two out at 750
    assert_eq!(*summary.final_time, 760.0);

    let grid = sim.grid();
    assert_eq!(*grid.ignition_time(0, 0), 250.0);
    assert_relative_eq!(*grid.ignition_time(0, 1), 250.0 + TA * (1.0 - 0.02 * 0.98), max_relative = 1e-9);
    for (r, c) in [(3, 3), (0, 0), (0, 1)] {
        assert_eq!(grid.state(r, c), CellState::Burned);
    }
    assert_eq!(sim.current_source(), Some((0, 0)));
}

#[test]
fn test_wind_pushes_fire_downwind() {
    // Wind toward the east
    let mut sim = uniform_sim(9, 0.05, 15.0, WindConditions::new(5.0, 90.0));
    sim.run();
    let grid = sim.grid();

    let affected = |cols: std::ops::Range<usize>| {
        (0..9)
            .flat_map(|r| cols.clone().map(move |c| (r, c)))
            .filter(|&(r, c)| grid.state(r, c).is_fire_affected())
            .count()
    };
    assert_eq!(affected(0..4), 0, "nothing spreads upwind");
    assert!(affected(5..9) >= 5);
    assert_eq!(grid.state(4, 3), CellState::Unburned);
    assert_ne!(grid.state(4, 5), CellState::Unburned);
}

#[test]
fn test_firebreak_one_cell_ring() {
    let mut sim = uniform_sim(9, 0.05, 2.0, WindConditions::calm());
    sim.run();
    let marked = sim.mark_firebreak(20.0).unwrap();

    assert_eq!(marked.len(), 8);
    let grid = sim.grid();
    for (r, c) in marked {
        assert_eq!(grid.state(r, c), CellState::Firebreak);
        assert_eq!(r.abs_diff(4).max(c.abs_diff(4)), 1);
    }
    assert_eq!(grid.state(4, 4), CellState::Burning);
    assert_eq!(grid.state(2, 4), CellState::Unburned);

    let stats = sim.statistics();
    assert_eq!(stats.areas.firebreak.cells, 8);
    assert_relative_eq!(stats.areas.firebreak.area_m2, 8.0 * 400.0);
}

#[test]
fn test_firebreak_rejects_bad_width() {
    let mut sim = uniform_sim(5, 0.05, 1.0, WindConditions::calm());
    sim.run();
    assert!(sim.mark_firebreak(-1.0).is_err());
    assert!(sim.mark_firebreak(f64::INFINITY).is_err());
    assert_eq!(sim.grid().count(CellState::Firebreak), 0);
}

#[test]
fn test_off_centre_source_found_on_ring() {
    // Centre has no fuel; the nearest fuelled cell is two rings out
    let mut sim = patchy_sim(9, &[(6, 5), (8, 8)], 1.0);
    assert_eq!(sim.current_source(), Some((6, 5)));
    sim.run();
    let start = sim.statistics().start;
    assert_eq!(start.grid_pos, Some((6, 5)));
    assert_eq!(start.ros, Some(0.05));
}
