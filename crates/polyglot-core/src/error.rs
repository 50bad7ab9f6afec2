//! Error types for the utility functions.

use std::error::Error;
use std::fmt;

/// Errors from the checked arithmetic in [`crate::math`] and [`crate::array`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MathError {
    /// The result does not fit the return type and the policy was
    /// [`OverflowPolicy::Reject`](crate::OverflowPolicy::Reject).
    Overflow {
        /// Name of the operation that overflowed.
        op: &'static str,
        /// The input that triggered the overflow. For `sum_array` this is
        /// the index of the element at which the running sum overflowed.
        input: u64,
    },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { op, input } => {
                write!(f, "{op}({input}) overflows its result type")
            }
        }
    }
}

impl Error for MathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_operation_and_input() {
        let e = MathError::Overflow {
            op: "factorial",
            input: 21,
        };
        assert_eq!(e.to_string(), "factorial(21) overflows its result type");
    }
}
