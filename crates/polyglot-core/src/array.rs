//! Array utilities.

use crate::error::MathError;
use crate::policy::OverflowPolicy;

/// Sum a slice of integers. An empty slice sums to 0.
///
/// Overflow of the running sum is handled by `policy`. Under
/// [`OverflowPolicy::Saturate`] the running sum clamps at each step, so the
/// result depends on element order once a bound is hit.
pub fn sum_array(items: &[i32], policy: OverflowPolicy) -> Result<i32, MathError> {
    items.iter().enumerate().try_fold(0i32, |acc, (i, &x)| {
        policy.add_i32(acc, x).ok_or(MathError::Overflow {
            op: "sum_array",
            input: i as u64,
        })
    })
}
