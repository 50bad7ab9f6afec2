//! Plain-`int` exports with the historical unprefixed names.
//!
//! These keep existing C, Go (cgo) and JNI callers linking against the
//! older header unchanged. They cannot report a status, so each one has a
//! fixed fallback:
//!
//! - `factorial`, `fibonacci` and `sum_array` saturate to `INT_MAX` /
//!   `INT_MIN` instead of overflowing.
//! - `factorial(n)` is 1 and `fibonacci(n)` is `n` for every `n <= 1`,
//!   negative inputs included.
//! - `string_length` returns -1 for a null or non-UTF-8 string.
//! - `reverse_string` returns null on failure.
//! - `free_string` shares the registry with `pg_free_string`, so a double
//!   release is logged and ignored.
//! - `sum_array` returns 0 for a null array or a non-positive length.
//!
//! Pointer failures still set the last-error message.

use std::ffi::{c_char, c_double, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

use polyglot_core::OverflowPolicy;

use crate::diag::fail;
use crate::status::PgStatus;
use crate::string::{borrow_str, register, release, reverse_to_cstring};

const SATURATE: OverflowPolicy = OverflowPolicy::Saturate;

fn clamp_u64(v: u64) -> c_int {
    c_int::try_from(v).unwrap_or(c_int::MAX)
}

/// Run `f`, returning `fallback` if it panics.
fn guarded<T>(fallback: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        fail(PgStatus::Panicked, "compat", "panic caught at the C boundary");
        fallback
    })
}

/// Add two integers (wrapping).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn add_numbers(a: c_int, b: c_int) -> c_int {
    polyglot_core::add_numbers(a, b)
}

/// Multiply two doubles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn multiply_doubles(a: c_double, b: c_double) -> c_double {
    polyglot_core::multiply_doubles(a, b)
}

/// `n!`, saturating at `INT_MAX`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn factorial(n: c_int) -> c_int {
    match u32::try_from(n) {
        Ok(n) if n > 1 => polyglot_core::factorial(n, SATURATE).map_or(c_int::MAX, clamp_u64),
        _ => 1,
    }
}

/// 1 if `n` is prime, else 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn is_prime(n: c_int) -> c_int {
    c_int::from(polyglot_core::is_prime(n))
}

/// `F(n)` (0-indexed), saturating at `INT_MAX`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fibonacci(n: c_int) -> c_int {
    match u32::try_from(n) {
        Ok(n) if n > 1 => polyglot_core::fibonacci(n, SATURATE).map_or(c_int::MAX, clamp_u64),
        _ => n,
    }
}

/// Byte length of a borrowed string, or -1 for null / invalid UTF-8.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn string_length(s: *const c_char) -> c_int {
    guarded(-1, || {
        // SAFETY: s is a valid C string per caller contract.
        match unsafe { borrow_str(s, "string_length") } {
            Ok(s) => c_int::try_from(polyglot_core::string_length(s)).unwrap_or(c_int::MAX),
            Err(_) => -1,
        }
    })
}

/// Reverse a borrowed string. The result must be released with
/// [`free_string`]. Returns null on failure.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn reverse_string(s: *const c_char) -> *mut c_char {
    guarded(std::ptr::null_mut(), || {
        // SAFETY: s is a valid C string per caller contract.
        unsafe { reverse_to_cstring(s, "reverse_string") }
            .and_then(register)
            .unwrap_or(std::ptr::null_mut())
    })
}

/// Release a string from [`reverse_string`]. Unknown pointers are ignored.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn free_string(s: *mut c_char) {
    guarded((), || {
        let _ = release(s, "free_string");
    })
}

/// Sum `len` integers, saturating. 0 for null or `len <= 0`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sum_array(arr: *const c_int, len: c_int) -> c_int {
    guarded(0, || {
        let Ok(len) = usize::try_from(len) else {
            return 0;
        };
        if arr.is_null() || len == 0 {
            return 0;
        }
        if !arr.is_aligned() {
            fail(PgStatus::InvalidArgument, "sum_array", "arr is misaligned");
            return 0;
        }
        // SAFETY: arr points to len ints per caller contract; len fits in
        // c_int so the byte size cannot exceed isize::MAX.
        let items = unsafe { std::slice::from_raw_parts(arr, len) };
        polyglot_core::sum_array(items, SATURATE).unwrap_or(0)
    })
}
