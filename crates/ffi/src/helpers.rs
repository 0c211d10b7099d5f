use crate::error::{with_last_error_mut, DefaultFireCaError, FireCaError, FireCaErrorCode};
use crate::instance::FireCaInstance;
use fire_ca_core::FireSimulation;
use std::ffi::CString;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl FireCaError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FireCaError) -> FireCaErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result and hand back its code.
pub(crate) fn track_result<T, E>(result: Result<T, E>) -> Result<T, FireCaErrorCode>
where
    E: FireCaError,
{
    result.map_err(|e| track_error(&e))
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireCaErrorCode::Ok;
    });
}

/// Run an FFI body, clearing the last error on success and recording it on failure.
pub(crate) fn handle_ffi_result_error<F>(body: F) -> FireCaErrorCode
where
    F: FnOnce() -> Result<(), DefaultFireCaError>,
{
    match body() {
        Ok(()) => {
            clear_last_error();
            FireCaErrorCode::Ok
        }
        Err(e) => track_error(&e),
    }
}

/// Borrow an instance from a raw handle.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by one of the `fire_ca_new_*` constructors.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const FireCaInstance,
) -> Result<&'a FireCaInstance, DefaultFireCaError> {
    // SAFETY: non-null handles come from `Box::into_raw` and live until `fire_ca_destroy`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFireCaError::null_pointer("ptr"))
}

/// Run `f` under the simulation read lock.
pub(crate) fn with_fire_ca<F, R>(instance: &FireCaInstance, f: F) -> Result<R, DefaultFireCaError>
where
    F: FnOnce(&FireSimulation) -> R,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultFireCaError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` under the simulation write lock.
pub(crate) fn with_fire_ca_mut<F, R>(instance: &FireCaInstance, f: F) -> Result<R, DefaultFireCaError>
where
    F: FnOnce(&mut FireSimulation) -> R,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultFireCaError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}
