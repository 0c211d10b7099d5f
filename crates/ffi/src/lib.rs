//! C ABI for the cellular-automaton fire spread engine
//!
//! Handles are opaque `FireCaInstance` pointers created by `fire_ca_new_uniform`
//! or `fire_ca_new_from_layers` and released with `fire_ca_destroy`. Every call
//! returns a `FireCaErrorCode`; the matching message is available from
//! `fire_ca_get_last_error` on the same thread.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{fire_ca_get_last_error, fire_ca_get_last_error_code, FireCaErrorCode};
pub use instance::{fire_ca_destroy, fire_ca_new_from_layers, fire_ca_new_uniform, FireCaConfig, FireCaInstance};
pub use queries::{fire_ca_get_ignition_time, fire_ca_get_states, fire_ca_get_stats, FireCaStats};
pub use simulation::{fire_ca_ignite, fire_ca_mark_firebreak, fire_ca_run, fire_ca_step, FireCaRunSummary, FireCaStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    fn config() -> FireCaConfig {
        FireCaConfig {
            grid_x: 9,
            grid_y: 9,
            cell_size: 20.0,
            sim_minutes: 10.0,
            dt: 10.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
            lat: 18.79,
            lon: 98.98,
            month: 3,
            min_neighbors_to_ignite: 1,
        }
    }

    #[test]
    fn test_uniform_lifecycle() {
        unsafe {
            let mut sim: *mut FireCaInstance = ptr::null_mut();
            assert_eq!(fire_ca_new_uniform(config(), 0.05, &mut sim), FireCaErrorCode::Ok);
            assert!(!sim.is_null());

            let mut status = FireCaStatus::Running;
            assert_eq!(fire_ca_step(sim, &mut status), FireCaErrorCode::Ok);
            assert_eq!(status, FireCaStatus::Running);

            let mut summary = std::mem::zeroed::<FireCaRunSummary>();
            summary.status = FireCaStatus::Running;
            assert_eq!(fire_ca_run(sim, &mut summary), FireCaErrorCode::Ok);
            assert_eq!(summary.status, FireCaStatus::HorizonReached);
            assert_eq!(summary.final_time, 600.0);

            let mut len = 0;
            let mut states: *const u8 = ptr::null();
            assert_eq!(fire_ca_get_states(sim, &mut len, &mut states), FireCaErrorCode::Ok);
            assert_eq!(len, 81);
            assert_eq!(*states.add(4 * 9 + 4), 2);

            let mut t = 0.0;
            assert_eq!(fire_ca_get_ignition_time(sim, 4, 4, &mut t), FireCaErrorCode::Ok);
            assert_eq!(t, 0.0);

            fire_ca_destroy(sim);
        }
    }

    #[test]
    fn test_neighbour_threshold_reaches_engine() {
        unsafe {
            let strict = FireCaConfig {
                min_neighbors_to_ignite: 2,
                ..config()
            };
            let mut sim: *mut FireCaInstance = ptr::null_mut();
            assert_eq!(fire_ca_new_uniform(strict, 0.05, &mut sim), FireCaErrorCode::Ok);

            let mut summary = std::mem::zeroed::<FireCaRunSummary>();
            summary.status = FireCaStatus::Running;
            assert_eq!(fire_ca_run(sim, &mut summary), FireCaErrorCode::Ok);
            assert_eq!(summary.events_pushed, 0);
            fire_ca_destroy(sim);

            let bad_month = FireCaConfig { month: 13, ..config() };
            assert_eq!(
                fire_ca_new_uniform(bad_month, 0.05, &mut sim),
                FireCaErrorCode::InvalidParameter
            );
            assert!(sim.is_null());
        }
    }

    #[test]
    fn test_errors_are_reported() {
        unsafe {
            let mut sim: *mut FireCaInstance = ptr::null_mut();
            let bad = FireCaConfig {
                grid_x: 0,
                ..config()
            };
            assert_eq!(fire_ca_new_uniform(bad, 0.05, &mut sim), FireCaErrorCode::InvalidGrid);
            assert!(sim.is_null());
            assert_eq!(fire_ca_get_last_error_code(), FireCaErrorCode::InvalidGrid);
            let msg = CStr::from_ptr(fire_ca_get_last_error()).to_string_lossy().into_owned();
            assert!(msg.contains("0x9"), "{msg}");

            assert_eq!(fire_ca_new_uniform(config(), 0.05, &mut sim), FireCaErrorCode::Ok);
            assert_eq!(fire_ca_ignite(sim, 20, 0), FireCaErrorCode::OutOfBounds);
            assert_eq!(fire_ca_ignite(sim, 4, 4), FireCaErrorCode::InvalidParameter);
            assert_eq!(fire_ca_ignite(sim, 0, 0), FireCaErrorCode::Ok);
            assert_eq!(fire_ca_get_last_error_code(), FireCaErrorCode::Ok);

            let mut marked = 0;
            assert_eq!(fire_ca_mark_firebreak(sim, 20.0, &mut marked), FireCaErrorCode::Ok);
            let mut stats = std::mem::zeroed::<FireCaStats>();
            assert_eq!(fire_ca_get_stats(sim, &mut stats), FireCaErrorCode::Ok);
            assert_eq!(stats.firebreak_cells, marked);
            assert_eq!(stats.burning_cells, 2);

            assert_eq!(fire_ca_step(ptr::null(), ptr::null_mut()), FireCaErrorCode::NullPointer);
            fire_ca_destroy(sim);
        }
    }
}
