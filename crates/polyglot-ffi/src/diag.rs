//! Diagnostics: per-thread last-error message and live allocation counts.
//!
//! Every rejected call records a message in a thread-local buffer before
//! returning its status, so C callers can fetch the detail with
//! `pg_last_error_message` on the same thread. Successful calls leave the
//! previous message in place.

use std::cell::RefCell;
use std::ffi::c_char;
use std::fmt;

use crate::status::PgStatus;

thread_local! {
    /// Message from the most recent failing call on this thread.
    static LAST_ERROR: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Record a failure for `call` and return its status code.
pub(crate) fn fail(status: PgStatus, call: &'static str, detail: impl fmt::Display) -> i32 {
    let message = format!("{call}: {detail}");
    tracing::warn!(call, status = status as i32, "{message}");
    LAST_ERROR.with(|cell| *cell.borrow_mut() = message);
    status as i32
}

/// Status for a mutex poisoned by an earlier panic.
pub(crate) fn poisoned() -> i32 {
    fail(
        PgStatus::InternalError,
        "lock",
        "mutex poisoned by an earlier panic",
    )
}

/// Copy the most recent error message on this thread into `buf`.
///
/// Writes at most `cap - 1` bytes followed by a NUL. `out_len` (may be null)
/// receives the full message length in bytes, so a caller can detect
/// truncation. A null `buf` or zero `cap` only reports the length. The
/// message is empty if no call on this thread has failed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_last_error_message(
    buf: *mut c_char,
    cap: usize,
    out_len: *mut usize,
) -> i32 {
    ffi_guard!({
        LAST_ERROR.with(|cell| {
            let message = cell.borrow();
            let bytes = message.as_bytes();

            if !out_len.is_null() {
                // SAFETY: out_len is valid per caller contract.
                unsafe { *out_len = bytes.len() };
            }

            if !buf.is_null() && cap > 0 {
                let copy_len = bytes.len().min(cap - 1);
                // SAFETY: buf points to cap valid bytes.
                unsafe {
                    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, copy_len);
                    *buf.add(copy_len) = 0;
                }
            }

            PgStatus::Ok as i32
        })
    })
}

/// Number of library-allocated strings not yet released: raw strings from
/// `pg_reverse_string` (and the compat `reverse_string`) plus live string
/// handles.
///
/// Returns 0 if the bookkeeping is unavailable after a prior panic.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_live_string_count() -> usize {
    crate::string::live_raw_count() + crate::string_handle::live_handle_count()
}
