//! FFI bindings for CycleSense
//!
//! This module provides C-compatible functions for calling CycleSense from other
//! languages. All functions use C strings (null-terminated) and return allocated
//! memory that must be freed by the caller using `cyclesense_free_string`.
//!
//! Onboarding sessions are exposed through the two-phase pairing and submission
//! calls: the host runs the actual pairing or persistence and reports the
//! outcome back.

use chrono::Utc;
use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use uuid::Uuid;

use crate::error::{PairingError, SubmissionError};
use crate::onboarding::{OnboardingSession, PairedDevice, SubmissionReceipt};
use crate::overview::overview_to_json;
use crate::projector::CycleProjector;
use crate::types::{parse_calendar_date, CycleInput};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// A host-reported failure reason. Any non-null pointer is a failure, even
/// when its bytes are not valid UTF-8.
unsafe fn reported_failure(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn project_to_json(last_period: &str, cycle_length_days: i32, as_of: &str) -> Result<String, crate::Error> {
    let last_period = parse_calendar_date(last_period)?;
    let length = u32::try_from(cycle_length_days).map_err(|_| {
        crate::ProjectionError::InvalidCycleLength(cycle_length_days.to_string())
    })?;
    let input = CycleInput::new(last_period, length)?;
    let projection = CycleProjector::project(&input, parse_calendar_date(as_of)?)?;
    Ok(serde_json::to_string(&projection)?)
}

// ============================================================================
// Stateless API
// ============================================================================

/// Project a cycle and return the projection as JSON.
///
/// # Safety
/// - `last_period` must be a valid null-terminated C string (`YYYY-MM-DD`).
/// - `as_of` may be NULL for today's local date, otherwise a valid C string.
/// - Returns a newly allocated string that must be freed with `cyclesense_free_string`.
/// - Returns NULL on error; call `cyclesense_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_project(
    last_period: *const c_char,
    cycle_length_days: i32,
    as_of: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let last_period = match cstr_to_string(last_period) {
        Some(s) => s,
        None => {
            set_last_error("Invalid last_period string pointer");
            return ptr::null_mut();
        }
    };

    let as_of = if as_of.is_null() {
        chrono::Local::now().date_naive().to_string()
    } else {
        match cstr_to_string(as_of) {
            Some(s) => s,
            None => {
                set_last_error("Invalid as_of string pointer");
                return ptr::null_mut();
            }
        }
    };

    match project_to_json(&last_period, cycle_length_days, &as_of) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Build the health overview for a profile JSON document.
///
/// # Safety
/// - `profile_json` and `as_of` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `cyclesense_free_string`.
/// - Returns NULL on error; call `cyclesense_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_overview(
    profile_json: *const c_char,
    as_of: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let profile_str = match cstr_to_string(profile_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid profile JSON string pointer");
            return ptr::null_mut();
        }
    };

    let as_of_str = match cstr_to_string(as_of) {
        Some(s) => s,
        None => {
            set_last_error("Invalid as_of string pointer");
            return ptr::null_mut();
        }
    };

    match overview_to_json(profile_str, as_of_str) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Onboarding Session API
// ============================================================================

/// Opaque handle to an OnboardingSession
pub struct SessionHandle {
    session: OnboardingSession,
}

/// # Safety
/// `handle` must be NULL or a pointer from `cyclesense_session_new`.
unsafe fn with_session<F>(handle: *mut SessionHandle, f: F) -> i32
where
    F: FnOnce(&mut OnboardingSession) -> Result<(), crate::OnboardingError>,
{
    clear_last_error();

    if handle.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }

    let handle = &mut *handle;
    match f(&mut handle.session) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Start a new onboarding session.
///
/// # Safety
/// - Returns a pointer that must be freed with `cyclesense_session_free`.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_new() -> *mut SessionHandle {
    clear_last_error();
    Box::into_raw(Box::new(SessionHandle {
        session: OnboardingSession::new(),
    }))
}

/// Free an onboarding session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `cyclesense_session_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_free(session: *mut SessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Return the session state as JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `cyclesense_session_new`.
/// - Returns a newly allocated string that must be freed with `cyclesense_free_string`.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_state(session: *const SessionHandle) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &*session;
    match serde_json::to_string(&handle.session.snapshot()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Select the device to pair. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid session pointer; `device_id` a valid C string.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_select_device(
    session: *mut SessionHandle,
    device_id: *const c_char,
) -> i32 {
    let device_id = match cstr_to_string(device_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid device_id string pointer");
            return -1;
        }
    };
    with_session(session, |s| s.select_device(&device_id))
}

/// Store a form answer. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid session pointer; `name` and `value` valid C strings.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_set_field(
    session: *mut SessionHandle,
    name: *const c_char,
    value: *const c_char,
) -> i32 {
    let (name, value) = match (cstr_to_string(name), cstr_to_string(value)) {
        (Some(n), Some(v)) => (n, v),
        _ => {
            set_last_error("Invalid field name or value pointer");
            return -1;
        }
    };
    with_session(session, |s| s.set_field(&name, value))
}

/// Advance one step. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid session pointer.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_next(session: *mut SessionHandle) -> i32 {
    with_session(session, |s| s.next().map(|_| ()))
}

/// Go back one step. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid session pointer.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_previous(session: *mut SessionHandle) -> i32 {
    with_session(session, |s| s.previous().map(|_| ()))
}

/// Mark device pairing as started. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid session pointer.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_begin_connect(session: *mut SessionHandle) -> i32 {
    with_session(session, |s| s.begin_connect().map(|_| ()))
}

/// Report the pairing outcome. `failure_reason` NULL means success; any other
/// pointer is a failure, with invalid UTF-8 replaced in the message.
///
/// # Safety
/// - `session` must be a valid session pointer; `failure_reason` NULL or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_complete_connect(
    session: *mut SessionHandle,
    failure_reason: *const c_char,
) -> i32 {
    let failure = reported_failure(failure_reason);
    with_session(session, |s| {
        let device_id = s.connecting_device().map(|d| d.id).unwrap_or_default().to_string();
        let outcome = match failure {
            Some(reason) => Err(PairingError {
                device: device_id,
                reason,
            }),
            None => Ok(PairedDevice {
                device_id,
                paired_at: Utc::now(),
            }),
        };
        s.complete_connect(outcome).map(|_| ())
    })
}

/// Mark submission as started. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid session pointer.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_begin_submit(session: *mut SessionHandle) -> i32 {
    with_session(session, |s| s.begin_submit().map(|_| ()))
}

/// Report the submission outcome. `failure_reason` NULL means success; any
/// other pointer is a failure, with invalid UTF-8 replaced in the message.
///
/// # Safety
/// - `session` must be a valid session pointer; `failure_reason` NULL or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_complete_submit(
    session: *mut SessionHandle,
    failure_reason: *const c_char,
) -> i32 {
    let failure = reported_failure(failure_reason);
    with_session(session, |s| {
        let outcome = match failure {
            Some(reason) => Err(SubmissionError(reason)),
            None => Ok(SubmissionReceipt {
                submission_id: Uuid::new_v4(),
                submitted_at: Utc::now(),
            }),
        };
        s.complete_submit(outcome).map(|_| ())
    })
}

/// Return the collected profile as JSON.
///
/// # Safety
/// - `session` must be a valid session pointer.
/// - Returns a newly allocated string that must be freed with `cyclesense_free_string`.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_session_profile(session: *const SessionHandle) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &*session;
    match serde_json::to_string(handle.session.profile()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by CycleSense functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a CycleSense function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next CycleSense call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the CycleSense library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn cyclesense_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
