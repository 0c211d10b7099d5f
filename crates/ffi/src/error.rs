use fire_ca_core::SimulationError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FireCaError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FireCaErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FireCaError` for FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFireCaError {
    code: FireCaErrorCode,
    msg: String,
}

impl DefaultFireCaError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireCaErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"RwLock"`, `"Mutex"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: FireCaErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for invalid parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: FireCaErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl From<SimulationError> for DefaultFireCaError {
    fn from(error: SimulationError) -> Self {
        let code = match error {
            SimulationError::InvalidDimensions { .. } | SimulationError::ShapeMismatch { .. } => {
                FireCaErrorCode::InvalidGrid
            }
            SimulationError::OutOfBounds { .. } => FireCaErrorCode::OutOfBounds,
            SimulationError::InvalidParameter { .. }
            | SimulationError::UnknownLandCover(_)
            | SimulationError::Provider(_) => FireCaErrorCode::InvalidParameter,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl FireCaError for DefaultFireCaError {
    fn code(&self) -> FireCaErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by fire spread functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireCaErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Grid dimensions are zero or a raster does not match them.
    InvalidGrid = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,

    /// Cell coordinates outside the grid.
    OutOfBounds = 5,
}

impl From<DefaultFireCaError> for FireCaErrorCode {
    fn from(error: DefaultFireCaError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, FireCaErrorCode)> = const { RefCell::new((None, FireCaErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireCaErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireCaErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred or the message cannot be converted to a C string.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread has its own independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that sets
/// or clears the error. **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// FireCaInstance* sim = nullptr;
/// FireCaErrorCode err = fire_ca_new_uniform(config, 0.05, &sim);
/// if (err != FireCaErrorCode::Ok) {
///     printf("Fire CA creation failed: %s\n", fire_ca_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_ca_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if none).
#[no_mangle]
pub extern "C" fn fire_ca_get_last_error_code() -> FireCaErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
