//! Test fixtures and reference oracles for Polyglot development.
//!
//! [`fixtures`] holds known-good values for the boundary functions. The
//! oracles below are deliberately naive reimplementations used to
//! cross-check `polyglot-core` in property tests of the crates above it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use polyglot_core::OverflowPolicy;

/// Primality by checking every candidate divisor.
pub fn naive_is_prime(n: i32) -> bool {
    n >= 2 && (2..n).all(|d| n % d != 0)
}

/// `n!` in `u128`, or `None` once it no longer fits in `u64`.
pub fn naive_factorial(n: u32) -> Option<u64> {
    let full: u128 = (1..=u128::from(n)).product();
    u64::try_from(full).ok()
}

/// Sum in `i64`, then apply `policy` to the 32-bit result.
///
/// Saturation is applied per step, so a running sum that saturates and then
/// comes back down differs from clamping the final total.
pub fn naive_sum(items: &[i32], policy: OverflowPolicy) -> Option<i32> {
    match policy {
        OverflowPolicy::Reject => {
            let mut acc: i64 = 0;
            for &x in items {
                acc += i64::from(x);
                i32::try_from(acc).ok()?;
            }
            i32::try_from(acc).ok()
        }
        OverflowPolicy::Saturate => Some(items.iter().fold(0i32, |a, &x| a.saturating_add(x))),
        OverflowPolicy::Wrap => {
            let total: i64 = items.iter().map(|&x| i64::from(x)).sum();
            Some(total as i32)
        }
    }
}

/// Every policy paired with its C ABI discriminant.
pub fn policies() -> impl Iterator<Item = (OverflowPolicy, i32)> {
    OverflowPolicy::ALL.into_iter().map(|p| (p, p.as_raw()))
}
