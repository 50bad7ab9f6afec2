//! PgStatus -> Python exception mapping with recovery hints.

use pyo3::exceptions::{PyOverflowError, PyRuntimeError, PyValueError};
use pyo3::{PyErr, PyResult};

use polyglot_ffi::{pg_last_error_message, PgStatus};

/// Check a status from `call`. Returns `Ok(())` on success, raises a typed
/// Python exception carrying the library's message and a hint on error.
///
/// Must run on the thread that made the call: the message is thread-local.
pub(crate) fn check_status(call: &str, code: i32) -> PyResult<()> {
    if code == PgStatus::Ok as i32 {
        return Ok(());
    }
    Err(status_error(call, code))
}

/// The Python exception for a non-`Ok` status from `call`.
pub(crate) fn status_error(call: &str, code: i32) -> PyErr {
    let (msg, hint) = error_detail(code);
    let detail = last_error_message();
    let full = if detail.is_empty() {
        format!("{call} failed with {code}: {msg}\n  Hint: {hint}")
    } else {
        format!("{call} failed with {code}: {msg} ({detail})\n  Hint: {hint}")
    };
    match PgStatus::from_code(code) {
        Some(PgStatus::Overflow) => PyOverflowError::new_err(full),

        // Caller passed something the boundary cannot accept → ValueError
        Some(
            PgStatus::InvalidArgument
            | PgStatus::InvalidUtf8
            | PgStatus::InteriorNul
            | PgStatus::BufferTooSmall,
        ) => PyValueError::new_err(full),

        _ => PyRuntimeError::new_err(full),
    }
}

fn last_error_message() -> String {
    let mut len = 0usize;
    if pg_last_error_message(std::ptr::null_mut(), 0, &mut len) != 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len + 1];
    if pg_last_error_message(buf.as_mut_ptr().cast(), buf.len(), &mut len) != 0 {
        return String::new();
    }
    buf.truncate(len);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Returns `(message, recovery_hint)` for each status code.
fn error_detail(code: i32) -> (&'static str, &'static str) {
    match PgStatus::from_code(code) {
        Some(PgStatus::Ok) => ("ok", "No action needed."),
        Some(PgStatus::InvalidHandle) => (
            "invalid handle (unknown, stale, or already released)",
            "A string handle was used after release. The Python wrappers \
             release handles themselves; this indicates a bug in the binding.",
        ),
        Some(PgStatus::InvalidArgument) => (
            "invalid argument",
            "Check the overflow policy name (reject, saturate, wrap) and \
             that numeric arguments are in range.",
        ),
        Some(PgStatus::InvalidUtf8) => (
            "string is not valid UTF-8",
            "Pass a str, not bytes decoded with a non-UTF-8 codec.",
        ),
        Some(PgStatus::InteriorNul) => (
            "string contains a NUL character",
            "C strings end at the first NUL. Strip '\\x00' from the input.",
        ),
        Some(PgStatus::Overflow) => (
            "result overflowed",
            "Pass policy=\"saturate\" to clamp or policy=\"wrap\" for \
             modular arithmetic, or use a smaller input (factorial <= 20, \
             fibonacci <= 93).",
        ),
        Some(PgStatus::BufferTooSmall) => (
            "caller-provided buffer too small",
            "The string changed size between the length query and the read. \
             Retry the call.",
        ),
        Some(PgStatus::InternalError) => (
            "internal error",
            "A lock was poisoned by an earlier panic inside the native \
             library. Restart the interpreter.",
        ),
        Some(PgStatus::Panicked) => (
            "panic caught at the boundary",
            "The native library panicked. This is a bug; please report it \
             with the arguments that triggered it.",
        ),
        None => (
            "unknown polyglot error",
            "An unrecognized status was returned from the FFI layer. \
             This may indicate a version mismatch between the Python \
             bindings and the native library.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_known_codes_have_detail() {
        for code in [-1, -2, -3, -4, -5, -6, -7, -128] {
            let (msg, hint) = error_detail(code);
            assert!(!msg.is_empty(), "code {code} has empty msg");
            assert!(!hint.is_empty(), "code {code} has empty hint");
            assert!(!msg.contains("unknown polyglot"), "code {code} fell through");
        }
    }

    #[test]
    fn unknown_code_returns_fallback() {
        let (msg, hint) = error_detail(-999);
        assert!(msg.contains("unknown"));
        assert!(hint.contains("version mismatch"));
    }

    #[test]
    fn ok_is_not_an_error() {
        assert!(check_status("pg_factorial", 0).is_ok());
    }
}
