//! The `_polyglot` functions.
//!
//! Each call releases the GIL via `py.detach()` for the duration of the
//! boundary call. Status checks happen afterwards on the same thread, so
//! the library's thread-local error message is still available.

use std::ffi::{CStr, CString};

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use polyglot_core::{OverflowPolicy, UnknownPolicy};
use polyglot_ffi::{
    pg_add_numbers, pg_factorial, pg_fibonacci, pg_is_prime, pg_live_string_count,
    pg_multiply_doubles, pg_string_handle_len, pg_string_handle_read, pg_string_handle_release,
    pg_string_length, pg_string_reverse_into_handle, pg_sum_array_view, PgIntView,
};

use crate::error::{check_status, status_error};

fn policy_arg(policy: &str) -> PyResult<i32> {
    policy
        .parse::<OverflowPolicy>()
        .map(OverflowPolicy::as_raw)
        .map_err(|e: UnknownPolicy| PyValueError::new_err(e.to_string()))
}

fn c_string(s: &str) -> PyResult<CString> {
    CString::new(s).map_err(|e| {
        PyValueError::new_err(format!(
            "string has a NUL character at offset {}",
            e.nul_position()
        ))
    })
}

/// Add two 32-bit integers (wrapping).
#[pyfunction]
pub(crate) fn add_numbers(a: i32, b: i32) -> i32 {
    pg_add_numbers(a, b)
}

/// Multiply two floats.
#[pyfunction]
pub(crate) fn multiply_doubles(a: f64, b: f64) -> f64 {
    pg_multiply_doubles(a, b)
}

/// `n!` as a 64-bit unsigned integer.
///
/// Raises `OverflowError` for `n > 20` under the default policy.
#[pyfunction]
#[pyo3(signature = (n, policy="reject"))]
pub(crate) fn factorial(py: Python<'_>, n: u32, policy: &str) -> PyResult<u64> {
    let policy = policy_arg(policy)?;
    let (status, out) = py.detach(|| {
        let mut out = 0u64;
        let s = pg_factorial(n, policy, &mut out);
        (s, out)
    });
    check_status("pg_factorial", status)?;
    Ok(out)
}

/// Whether `n` is prime. Negative numbers, 0 and 1 are not.
#[pyfunction]
pub(crate) fn is_prime(py: Python<'_>, n: i32) -> bool {
    py.detach(|| pg_is_prime(n))
}

/// `F(n)`, 0-indexed (`F(0) = 0`).
///
/// Raises `OverflowError` for `n > 93` under the default policy.
#[pyfunction]
#[pyo3(signature = (n, policy="reject"))]
pub(crate) fn fibonacci(py: Python<'_>, n: u32, policy: &str) -> PyResult<u64> {
    let policy = policy_arg(policy)?;
    let (status, out) = py.detach(|| {
        let mut out = 0u64;
        let s = pg_fibonacci(n, policy, &mut out);
        (s, out)
    });
    check_status("pg_fibonacci", status)?;
    Ok(out)
}

/// Length of `s` in UTF-8 bytes.
#[pyfunction]
pub(crate) fn string_length(py: Python<'_>, s: &str) -> PyResult<usize> {
    let input = c_string(s)?;
    let (status, out) = py.detach(|| {
        let mut out = 0usize;
        let s = pg_string_length(input.as_ptr(), &mut out);
        (s, out)
    });
    check_status("pg_string_length", status)?;
    Ok(out)
}

fn read_handle(handle: u64) -> Result<Vec<u8>, (&'static str, i32)> {
    let mut len = 0usize;
    let s = pg_string_handle_len(handle, &mut len);
    if s != 0 {
        return Err(("pg_string_handle_len", s));
    }
    let mut buf = vec![0u8; len + 1];
    let s = pg_string_handle_read(handle, buf.as_mut_ptr().cast(), buf.len(), &mut len);
    if s != 0 {
        return Err(("pg_string_handle_read", s));
    }
    buf.truncate(len);
    Ok(buf)
}

/// Read the string behind `handle`, then release it even if the read failed.
fn take_handle(handle: u64) -> Result<Vec<u8>, (&'static str, i32)> {
    let read = read_handle(handle);
    let released = pg_string_handle_release(handle);
    let bytes = read?;
    if released != 0 {
        return Err(("pg_string_handle_release", released));
    }
    Ok(bytes)
}

/// Reverse through the handle API.
fn reverse_via_handle(input: &CStr) -> Result<Vec<u8>, (&'static str, i32)> {
    let mut handle = 0u64;
    let s = pg_string_reverse_into_handle(input.as_ptr(), &mut handle);
    if s != 0 {
        return Err(("pg_string_reverse_into_handle", s));
    }
    take_handle(handle)
}

/// `s` reversed by code point.
#[pyfunction]
pub(crate) fn reverse_string(py: Python<'_>, s: &str) -> PyResult<String> {
    let input = c_string(s)?;
    let bytes = py
        .detach(|| reverse_via_handle(&input))
        .map_err(|(call, status)| status_error(call, status))?;
    String::from_utf8(bytes)
        .map_err(|e| PyValueError::new_err(format!("reversed string is not UTF-8: {e}")))
}

/// Sum a sequence of 32-bit integers.
///
/// Raises `OverflowError` if the running sum leaves the 32-bit range under
/// the default policy.
#[pyfunction]
#[pyo3(signature = (items, policy="reject"))]
pub(crate) fn sum_array(py: Python<'_>, items: Vec<i32>, policy: &str) -> PyResult<i32> {
    let policy = policy_arg(policy)?;
    let (status, out) = py.detach(|| {
        let mut out = 0i32;
        let s = pg_sum_array_view(PgIntView::from_slice(&items), policy, &mut out);
        (s, out)
    });
    check_status("pg_sum_array_view", status)?;
    Ok(out)
}

/// Library strings not yet released. 0 after every completed call.
#[pyfunction]
pub(crate) fn live_string_count() -> usize {
    pg_live_string_count()
}
