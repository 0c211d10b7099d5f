use fire_ca_core::core_types::units::{Meters, MetersPerSecond};
use fire_ca_core::{EnvironmentLayers, FireGrid, FireSimulation, LandCover, SimulationConfig, WindConditions};
use std::ptr;
use std::sync::{Mutex, RwLock};

use crate::error::{DefaultFireCaError, FireCaErrorCode};
use crate::helpers::{clear_last_error, track_error, track_result};

/// Scalar run parameters shared by every constructor.
///
/// Spread calibration constants keep their library defaults.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FireCaConfig {
    /// Columns.
    pub grid_x: usize,
    /// Rows.
    pub grid_y: usize,
    /// Cell edge length (m).
    pub cell_size: f64,
    /// Simulated horizon (minutes).
    pub sim_minutes: f64,
    /// Timestep (s).
    pub dt: f64,
    /// Wind speed (m/s). Negative values are treated as calm.
    pub wind_speed: f64,
    /// Direction the wind blows toward (degrees, 0 = North, clockwise).
    pub wind_direction: f64,
    /// Grid centre latitude, used for reported coordinates.
    pub lat: f64,
    /// Grid centre longitude, used for reported coordinates.
    pub lon: f64,
    /// Scenario month (1-12).
    pub month: u32,
    /// Burning neighbours a cell needs before it can ignite. 0 behaves as 1.
    pub min_neighbors_to_ignite: u32,
}

impl From<FireCaConfig> for SimulationConfig {
    fn from(c: FireCaConfig) -> Self {
        SimulationConfig {
            lat: c.lat,
            lon: c.lon,
            month: c.month,
            grid_x: c.grid_x,
            grid_y: c.grid_y,
            cell_size: c.cell_size,
            sim_minutes: c.sim_minutes,
            dt: c.dt,
            min_neighbors_to_ignite: c.min_neighbors_to_ignite,
            wind: WindConditions::new(c.wind_speed, c.wind_direction),
            ..SimulationConfig::default()
        }
    }
}

/// Opaque fire spread handle.
///
/// # Thread Safety
/// The simulation sits behind an `RwLock`: queries take the read lock and can run
/// concurrently, stepping and ignition take the write lock.
pub struct FireCaInstance {
    pub(crate) sim: RwLock<FireSimulation>,
    /// Cell state buffer reused by `fire_ca_get_states` to avoid per-call allocation.
    pub(crate) state_snapshot: Mutex<Vec<u8>>,
}

impl FireCaInstance {
    fn boxed(sim: FireSimulation) -> Box<Self> {
        let cells = sim.grid().len();
        Box::new(Self {
            sim: RwLock::new(sim),
            state_snapshot: Mutex::new(Vec::with_capacity(cells)),
        })
    }

    /// Fully fuelled grid with one spread rate everywhere.
    pub(crate) fn uniform(config: FireCaConfig, ros: f64) -> Result<Box<Self>, DefaultFireCaError> {
        if !ros.is_finite() || ros < 0.0 {
            return Err(DefaultFireCaError::invalid_parameter(format!(
                "ros must be finite and non-negative, got {ros}"
            )));
        }
        let grid = FireGrid::uniform(
            config.grid_x,
            config.grid_y,
            Meters::new(config.cell_size),
            MetersPerSecond::new(ros),
        )?;
        let sim = FireSimulation::from_grid(config.into(), grid)?;
        Ok(Self::boxed(sim))
    }

    /// Grid built from slope, NDVI, LST and land-cover rasters (row-major).
    ///
    /// # Safety
    /// Each raster pointer must be null or point to `grid_x * grid_y` readable values.
    pub(crate) unsafe fn from_layers(
        config: FireCaConfig,
        slope_tan: *const f64,
        ndvi: *const f64,
        lst: *const f64,
        landcover: *const u8,
    ) -> Result<Box<Self>, DefaultFireCaError> {
        let len = config
            .grid_x
            .checked_mul(config.grid_y)
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                DefaultFireCaError::from(fire_ca_core::SimulationError::InvalidDimensions {
                    grid_x: config.grid_x,
                    grid_y: config.grid_y,
                })
            })?;

        // SAFETY: caller guarantees `len` readable values behind each non-null pointer.
        let slope_tan = unsafe { copy_raster(slope_tan, len, "slope_tan")? };
        let ndvi = unsafe { copy_raster(ndvi, len, "ndvi")? };
        let lst = unsafe { copy_raster(lst, len, "lst")? };
        let landcover = unsafe { copy_raster(landcover, len, "landcover")? }
            .into_iter()
            .map(|code| {
                LandCover::from_u8(code).ok_or_else(|| {
                    DefaultFireCaError::invalid_parameter(format!("unknown land-cover code {code}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let layers = EnvironmentLayers::new(config.grid_x, config.grid_y, slope_tan, ndvi, lst, landcover)?;
        let sim = FireSimulation::new(config.into(), layers)?;
        Ok(Self::boxed(sim))
    }
}

/// Copy `len` values from a caller-owned raster into Rust-owned memory.
///
/// # Safety
/// `ptr` must be null or valid for `len` reads.
unsafe fn copy_raster<T: Copy>(ptr: *const T, len: usize, name: &str) -> Result<Vec<T>, DefaultFireCaError> {
    if ptr.is_null() {
        return Err(DefaultFireCaError::null_pointer(name));
    }
    // SAFETY: checked non-null above, length guaranteed by the caller.
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec())
}

/// Write a freshly built instance (or null on error) to `out_instance`.
///
/// # Safety
/// `out_instance` must be non-null and writable.
unsafe fn publish(
    result: Result<Box<FireCaInstance>, DefaultFireCaError>,
    out_instance: *mut *mut FireCaInstance,
) -> FireCaErrorCode {
    match track_result(result) {
        Ok(instance) => {
            clear_last_error();
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            FireCaErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Create a fully fuelled simulation with a uniform rate of spread (m/s).
///
/// Returns
/// - `FireCaErrorCode::Ok` (0) with a valid instance in `out_instance`
/// - `FireCaErrorCode::NullPointer` if `out_instance` is null
/// - `FireCaErrorCode::InvalidGrid` for zero dimensions
/// - `FireCaErrorCode::InvalidParameter` for a bad cell size, timestep, horizon, month or ROS
///
/// # Safety
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the returned instance and MUST call `fire_ca_destroy` exactly once.
///
/// Example (C++)
/// ```cpp
/// FireCaConfig config = { 100, 100, 30.0, 60.0, 10.0, 4.0, 90.0, 18.79, 98.98, 3, 1 };
/// FireCaInstance* sim = nullptr;
/// if (fire_ca_new_uniform(config, 0.05, &sim) != FireCaErrorCode::Ok) {
///     fprintf(stderr, "%s\n", fire_ca_get_last_error());
///     return;
/// }
/// fire_ca_run(sim, nullptr);
/// fire_ca_destroy(sim);
/// ```
#[no_mangle]
pub unsafe extern "C" fn fire_ca_new_uniform(
    config: FireCaConfig,
    ros: f64,
    out_instance: *mut *mut FireCaInstance,
) -> FireCaErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireCaError::null_pointer("out_instance"));
    }
    unsafe { publish(FireCaInstance::uniform(config, ros), out_instance) }
}

/// Create a simulation from environmental rasters, each `grid_x * grid_y` values in row-major order.
///
/// Land-cover codes: 0 = forest, 1 = shrub, 2 = savanna, 3 = other.
/// The rasters are copied; the caller may free them after the call.
///
/// Returns
/// - `FireCaErrorCode::Ok` (0) with a valid instance in `out_instance`
/// - `FireCaErrorCode::NullPointer` if any raster or `out_instance` is null
/// - `FireCaErrorCode::InvalidGrid` for zero or overflowing dimensions
/// - `FireCaErrorCode::InvalidParameter` for bad scalars or an unknown land-cover code
///
/// # Safety
/// - Every raster pointer must be valid for `grid_x * grid_y` reads.
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the returned instance and MUST call `fire_ca_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn fire_ca_new_from_layers(
    config: FireCaConfig,
    slope_tan: *const f64,
    ndvi: *const f64,
    lst: *const f64,
    landcover: *const u8,
    out_instance: *mut *mut FireCaInstance,
) -> FireCaErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireCaError::null_pointer("out_instance"));
    }
    let result = unsafe { FireCaInstance::from_layers(config, slope_tan, ndvi, lst, landcover) };
    unsafe { publish(result, out_instance) }
}

/// Destroy an instance created by one of the `fire_ca_new_*` constructors.
///
/// Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `fire_ca_new_uniform` or `fire_ca_new_from_layers`.
/// - The pointer MUST NOT be used again after this call.
#[no_mangle]
pub unsafe extern "C" fn fire_ca_destroy(ptr: *mut FireCaInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `publish` and not yet freed.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
