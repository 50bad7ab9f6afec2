//! Scalar exports: arithmetic, factorial, primality, Fibonacci.

use crate::diag::fail;
use crate::status::PgStatus;
use crate::types::policy_arg;

/// Add two integers. Wraps on overflow.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_add_numbers(a: i32, b: i32) -> i32 {
    polyglot_core::add_numbers(a, b)
}

/// Multiply two doubles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_multiply_doubles(a: f64, b: f64) -> f64 {
    polyglot_core::multiply_doubles(a, b)
}

/// Whether `n` is prime. 0, 1 and negative numbers are not.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_is_prime(n: i32) -> bool {
    polyglot_core::is_prime(n)
}

/// Compute `n!` into `out` under `policy` (a `PgOverflowPolicy` value).
///
/// Returns `Overflow` for `n > 20` under `Reject`, `InvalidArgument` for a
/// null `out` or unknown policy.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_factorial(n: u32, policy: i32, out: *mut u64) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_factorial";
        if out.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "out is null");
        }
        let policy = match policy_arg(policy, CALL) {
            Ok(p) => p,
            Err(code) => return code,
        };
        match polyglot_core::factorial(n, policy) {
            Ok(v) => {
                // SAFETY: out is valid per caller contract.
                unsafe { *out = v };
                PgStatus::Ok as i32
            }
            Err(e) => fail(PgStatus::from(&e), CALL, e),
        }
    })
}

/// Compute the `n`th Fibonacci number (0-indexed: F(0)=0, F(1)=1) into
/// `out` under `policy`.
///
/// Returns `Overflow` for `n > 93` under `Reject`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_fibonacci(n: u32, policy: i32, out: *mut u64) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_fibonacci";
        if out.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "out is null");
        }
        let policy = match policy_arg(policy, CALL) {
            Ok(p) => p,
            Err(code) => return code,
        };
        match polyglot_core::fibonacci(n, policy) {
            Ok(v) => {
                // SAFETY: out is valid per caller contract.
                unsafe { *out = v };
                PgStatus::Ok as i32
            }
            Err(e) => fail(PgStatus::from(&e), CALL, e),
        }
    })
}
