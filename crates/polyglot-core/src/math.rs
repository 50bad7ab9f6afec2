//! Factorial, primality and Fibonacci.
//!
//! Fibonacci is 0-indexed: `F(0) = 0`, `F(1) = 1`, `F(10) = 55`.

use crate::error::MathError;
use crate::policy::OverflowPolicy;

/// Largest `n` for which `n!` fits in a `u64`.
pub const FACTORIAL_MAX_INPUT: u32 = 20;

/// Largest `n` for which `F(n)` fits in a `u64`.
pub const FIBONACCI_MAX_INPUT: u32 = 93;

/// Compute `n!`.
///
/// `0! = 1`. Inputs above [`FACTORIAL_MAX_INPUT`] are handled by `policy`:
/// rejected, saturated to `u64::MAX`, or reduced modulo 2^64.
pub fn factorial(n: u32, policy: OverflowPolicy) -> Result<u64, MathError> {
    let mut acc: u64 = 1;
    for k in 2..=u64::from(n) {
        acc = policy.mul_u64(acc, k).ok_or(MathError::Overflow {
            op: "factorial",
            input: u64::from(n),
        })?;
        // Fixed points: saturated stays saturated, and a wrapped product
        // that reached 0 (every n >= 66) stays 0.
        if acc == 0 || (acc == u64::MAX && policy == OverflowPolicy::Saturate) {
            break;
        }
    }
    Ok(acc)
}

/// Primality by trial division.
///
/// 0, 1 and all negative numbers are not prime.
pub fn is_prime(n: i32) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    // i64 so that d * d cannot overflow near i32::MAX.
    let n = i64::from(n);
    let mut d: i64 = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Compute the `n`th Fibonacci number, 0-indexed.
///
/// Inputs above [`FIBONACCI_MAX_INPUT`] are handled by `policy`. Wrapped
/// results are computed by fast doubling, so any `u32` input is cheap.
pub fn fibonacci(n: u32, policy: OverflowPolicy) -> Result<u64, MathError> {
    if n > FIBONACCI_MAX_INPUT {
        return match policy {
            OverflowPolicy::Reject => Err(MathError::Overflow {
                op: "fibonacci",
                input: u64::from(n),
            }),
            OverflowPolicy::Saturate => Ok(u64::MAX),
            OverflowPolicy::Wrap => Ok(fibonacci_wrapping(n)),
        };
    }
    if n < 2 {
        return Ok(u64::from(n));
    }
    let (mut prev, mut cur) = (0u64, 1u64);
    for _ in 2..=n {
        // F(93) is the last value that fits, so this cannot overflow.
        let next = prev + cur;
        prev = cur;
        cur = next;
    }
    Ok(cur)
}

/// `F(n) mod 2^64`.
///
/// Walks the bits of `n` from the top, keeping `(F(k), F(k+1))`:
/// `F(2k) = F(k) * (2F(k+1) - F(k))` and `F(2k+1) = F(k)^2 + F(k+1)^2`.
fn fibonacci_wrapping(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for bit in (0..u32::BITS - n.leading_zeros()).rev() {
        let even = a.wrapping_mul(b.wrapping_mul(2).wrapping_sub(a));
        let odd = a.wrapping_mul(a).wrapping_add(b.wrapping_mul(b));
        if (n >> bit) & 1 == 1 {
            (a, b) = (odd, even.wrapping_add(odd));
        } else {
            (a, b) = (even, odd);
        }
    }
    a
}
