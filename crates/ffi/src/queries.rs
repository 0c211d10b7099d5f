use fire_ca_core::SimulationStats;
use std::ptr;

use crate::error::{DefaultFireCaError, FireCaErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_fire_ca};
use crate::instance::FireCaInstance;

#[repr(C)]
/// FFI-friendly snapshot of the run statistics.
/// Keep this layout stable for C/C++/C# consumers.
pub struct FireCaStats {
    /// Cells in the grid.
    pub total_cells: usize,
    /// Cells carrying fuel.
    pub fuel_cells: usize,
    /// Cells per state: unburned, burning, burned, firebreak.
    pub unburned_cells: usize,
    /// Burning cells.
    pub burning_cells: usize,
    /// Burned cells.
    pub burned_cells: usize,
    /// Firebreak cells.
    pub firebreak_cells: usize,
    /// Burning plus burned area (ha).
    pub burned_area_ha: f64,
    /// Fire-affected share of the grid (%).
    pub burn_percentage_all: f64,
    /// Fire-affected share of fuel cells (%).
    pub burn_percentage_of_fuel: f64,
    /// Mean spread rate over cells with positive ROS (m/s).
    pub ros_mean: f64,
    /// Whether `last_lat` / `last_lon` / `last_completion_time` are set.
    pub has_last_ignition: bool,
    /// Latitude of the last burn completed within the horizon.
    pub last_lat: f64,
    /// Longitude of the last burn completed within the horizon.
    pub last_lon: f64,
    /// Completion time of that burn (s).
    pub last_completion_time: f64,
}

impl From<&SimulationStats> for FireCaStats {
    fn from(stats: &SimulationStats) -> Self {
        let last = stats.last_ignition.as_ref();
        Self {
            total_cells: stats.total_cells,
            fuel_cells: stats.fuel_cells,
            unburned_cells: stats.areas.unburned.cells,
            burning_cells: stats.areas.burning.cells,
            burned_cells: stats.areas.burned.cells,
            firebreak_cells: stats.areas.firebreak.cells,
            burned_area_ha: stats.burned_area_ha,
            burn_percentage_all: stats.burn_percentage_all,
            burn_percentage_of_fuel: stats.burn_percentage_of_fuel,
            ros_mean: stats.ros_stats.mean,
            has_last_ignition: last.is_some(),
            last_lat: last.map_or(f64::NAN, |p| p.lat),
            last_lon: last.map_or(f64::NAN, |p| p.lon),
            last_completion_time: last.map_or(f64::NAN, |p| *p.completion_time),
        }
    }
}

#[no_mangle]
/// Return a borrowed pointer to the current cell states, row-major, one byte per cell
/// (0 = unburned, 1 = burning, 2 = burned, 3 = firebreak).
///
/// The buffer is reused across calls; the pointer is valid until the next call to
/// this function on the same instance. **DO NOT FREE THIS POINTER**.
///
/// Thread-safe: acquires the snapshot Mutex and the simulation read lock.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by a `fire_ca_new_*` constructor, or null.
/// - `out_len` and `out_array` must be valid, non-null, writable pointers.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// const uint8_t* states = nullptr;
/// if (fire_ca_get_states(sim, &len, &states) == FireCaErrorCode::Ok) {
///     for (uintptr_t i = 0; i < len; i++) { /* states[i] */ }
/// }
/// ```
pub unsafe extern "C" fn fire_ca_get_states(
    ptr: *const FireCaInstance,
    out_len: *mut usize,
    out_array: *mut *const u8,
) -> FireCaErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultFireCaError::null_pointer("out_len"));
    }

    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultFireCaError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let mut snapshot = instance
            .state_snapshot
            .lock()
            .map_err(|_| DefaultFireCaError::lock_poisoned("Mutex"))?;
        snapshot.clear();

        with_fire_ca(instance, |sim| {
            snapshot.extend(sim.grid().states().iter().map(|s| s.as_u8()));
        })?;

        unsafe {
            *out_len = snapshot.len();
            *out_array = snapshot.as_ptr();
        }
        Ok(())
    });

    // Set to null on error (per documentation contract)
    if result != FireCaErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}

#[no_mangle]
/// Read the recorded ignition time of one cell (s, `INFINITY` if never scheduled).
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by a `fire_ca_new_*` constructor, or null.
/// - `out_time` must be a valid, non-null, writable pointer.
pub unsafe extern "C" fn fire_ca_get_ignition_time(
    ptr: *const FireCaInstance,
    row: usize,
    col: usize,
    out_time: *mut f64,
) -> FireCaErrorCode {
    if out_time.is_null() {
        return track_error(&DefaultFireCaError::null_pointer("out_time"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let time = with_fire_ca(instance, |sim| {
            let grid = sim.grid();
            grid.check_bounds(row, col).map(|idx| *grid.ignition_times()[idx])
        })??;
        unsafe {
            *out_time = time;
        }
        Ok(())
    })
}

#[no_mangle]
/// Fill `out_stats` with the current run statistics.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by a `fire_ca_new_*` constructor, or null.
/// - `out_stats` must be a valid, non-null, writable pointer.
pub unsafe extern "C" fn fire_ca_get_stats(ptr: *const FireCaInstance, out_stats: *mut FireCaStats) -> FireCaErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultFireCaError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let stats = with_fire_ca(instance, |sim| FireCaStats::from(&sim.statistics()))?;
        unsafe {
            *out_stats = stats;
        }
        Ok(())
    })
}
