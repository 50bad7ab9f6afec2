//! Scalar arithmetic with no error conditions.

/// Add two integers, wrapping on overflow like C `int` arithmetic on every
/// supported target.
pub fn add_numbers(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// Multiply two doubles (IEEE-754; infinities and NaN propagate).
pub fn multiply_doubles(a: f64, b: f64) -> f64 {
    a * b
}
