use fire_ca_core::{HaltReason, RunSummary, StepOutcome};

use crate::error::{DefaultFireCaError, FireCaErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_fire_ca_mut};
use crate::instance::FireCaInstance;

/// Driver status as seen from C.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireCaStatus {
    /// More steps remain.
    Running = 0,
    /// Every timestep up to the horizon was executed.
    HorizonReached = 1,
    /// No cell could ever be ignited.
    NoViableSource = 2,
    /// The fire died out and no untried source remains.
    FireExhausted = 3,
}

impl From<HaltReason> for FireCaStatus {
    fn from(reason: HaltReason) -> Self {
        match reason {
            HaltReason::HorizonReached => FireCaStatus::HorizonReached,
            HaltReason::NoViableSource => FireCaStatus::NoViableSource,
            HaltReason::FireExhausted => FireCaStatus::FireExhausted,
        }
    }
}

impl From<StepOutcome> for FireCaStatus {
    fn from(outcome: StepOutcome) -> Self {
        match outcome {
            StepOutcome::Continue => FireCaStatus::Running,
            StepOutcome::Halted(reason) => reason.into(),
        }
    }
}

/// C layout of the run bookkeeping.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FireCaRunSummary {
    /// Timesteps executed.
    pub steps_executed: usize,
    /// Simulation time of the last executed step (s).
    pub final_time: f64,
    /// Why the driver stopped.
    pub status: FireCaStatus,
    /// Ignition sources seeded (initial plus fallbacks).
    pub sources_seeded: usize,
    /// Ignition events scheduled.
    pub events_pushed: u64,
    /// Events that ignited their cell.
    pub events_committed: u64,
    /// Stale events dropped on pop.
    pub events_discarded: u64,
    /// Wall-clock stepping time (s).
    pub execution_time: f64,
}

impl From<&RunSummary> for FireCaRunSummary {
    fn from(s: &RunSummary) -> Self {
        Self {
            steps_executed: s.steps_executed,
            final_time: *s.final_time,
            status: s.halt_reason.into(),
            sources_seeded: s.sources_seeded,
            events_pushed: s.events_pushed,
            events_committed: s.events_committed,
            events_discarded: s.events_discarded,
            execution_time: s.execution_time.as_secs_f64(),
        }
    }
}

/// Advance one timestep.
///
/// Thread-safe: acquires the `RwLock` write lock.
///
/// `out_status` (optional) receives the driver status after the step.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a `fire_ca_new_*` constructor, or null.
/// - `out_status`, if non-null, must be writable.
#[no_mangle]
pub unsafe extern "C" fn fire_ca_step(ptr: *const FireCaInstance, out_status: *mut FireCaStatus) -> FireCaErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let outcome = with_fire_ca_mut(instance, |sim| sim.step())?;
        if !out_status.is_null() {
            unsafe {
                *out_status = outcome.into();
            }
        }
        Ok(())
    })
}

/// Step until the driver halts.
///
/// `out_summary` (optional) receives the run bookkeeping.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a `fire_ca_new_*` constructor, or null.
/// - `out_summary`, if non-null, must be writable.
#[no_mangle]
pub unsafe extern "C" fn fire_ca_run(
    ptr: *const FireCaInstance,
    out_summary: *mut FireCaRunSummary,
) -> FireCaErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let summary = with_fire_ca_mut(instance, |sim| sim.run())?;
        if !out_summary.is_null() {
            unsafe {
                *out_summary = FireCaRunSummary::from(&summary);
            }
        }
        Ok(())
    })
}

/// Ignite an unburned cell at the current simulation time.
///
/// Returns
/// - `FireCaErrorCode::OutOfBounds` for coordinates outside the grid
/// - `FireCaErrorCode::InvalidParameter` if the cell is not unburned or the horizon was reached
///
/// # Safety
/// `ptr` must be a valid pointer returned by a `fire_ca_new_*` constructor, or null.
#[no_mangle]
pub unsafe extern "C" fn fire_ca_ignite(ptr: *const FireCaInstance, row: usize, col: usize) -> FireCaErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        with_fire_ca_mut(instance, |sim| sim.ignite_at(row, col))??;
        Ok(())
    })
}

/// Mark a firebreak ring of `width_m` metres around the cells still burning.
///
/// `out_marked` receives the number of cells turned into firebreak.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a `fire_ca_new_*` constructor, or null.
/// - `out_marked` must be a valid, non-null pointer.
#[no_mangle]
pub unsafe extern "C" fn fire_ca_mark_firebreak(
    ptr: *const FireCaInstance,
    width_m: f64,
    out_marked: *mut usize,
) -> FireCaErrorCode {
    if out_marked.is_null() {
        return track_error(&DefaultFireCaError::null_pointer("out_marked"));
    }
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let marked = with_fire_ca_mut(instance, |sim| sim.mark_firebreak(width_m))??;
        unsafe {
            *out_marked = marked.len();
        }
        Ok(())
    })
}
