//! C-compatible status codes.
//!
//! [`PgStatus`] is a `repr(i32)` enum returned (as `i32`) by every fallible
//! export. `Ok` is 0 and all errors are negative.

use polyglot_core::MathError;

/// C-compatible status code returned by fallible FFI functions.
///
/// Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PgStatus {
    /// Success.
    Ok = 0,
    /// Handle or string pointer is unknown, stale, or already released.
    InvalidHandle = -1,
    /// An argument is null, misaligned, or out of range.
    InvalidArgument = -2,
    /// An input string is not valid UTF-8.
    InvalidUtf8 = -3,
    /// A result string would contain an interior NUL byte.
    InteriorNul = -4,
    /// The result overflowed and the policy was `Reject`.
    Overflow = -5,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -6,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -7,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl PgStatus {
    /// Decode a raw status. Unknown codes map to `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            -1 => Some(Self::InvalidHandle),
            -2 => Some(Self::InvalidArgument),
            -3 => Some(Self::InvalidUtf8),
            -4 => Some(Self::InteriorNul),
            -5 => Some(Self::Overflow),
            -6 => Some(Self::BufferTooSmall),
            -7 => Some(Self::InternalError),
            -128 => Some(Self::Panicked),
            _ => None,
        }
    }

    /// Short human-readable description.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InvalidHandle => "invalid handle (unknown, stale, or already released)",
            Self::InvalidArgument => "invalid argument",
            Self::InvalidUtf8 => "string is not valid UTF-8",
            Self::InteriorNul => "string contains an interior NUL byte",
            Self::Overflow => "result overflowed",
            Self::BufferTooSmall => "caller-provided buffer too small",
            Self::InternalError => "internal error",
            Self::Panicked => "panic caught at the boundary",
        }
    }
}

impl From<&MathError> for PgStatus {
    fn from(e: &MathError) -> Self {
        match e {
            MathError::Overflow { .. } => PgStatus::Overflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(PgStatus::Ok as i32, 0);
        assert_eq!(PgStatus::InvalidHandle as i32, -1);
        assert_eq!(PgStatus::InvalidArgument as i32, -2);
        assert_eq!(PgStatus::InvalidUtf8 as i32, -3);
        assert_eq!(PgStatus::InteriorNul as i32, -4);
        assert_eq!(PgStatus::Overflow as i32, -5);
        assert_eq!(PgStatus::BufferTooSmall as i32, -6);
        assert_eq!(PgStatus::InternalError as i32, -7);
        assert_eq!(PgStatus::Panicked as i32, -128);
    }

    #[test]
    fn from_code_round_trips_known_codes() {
        for code in (-7..=0).chain([-128]) {
            let status = PgStatus::from_code(code).expect("known code");
            assert_eq!(status as i32, code);
        }
        assert_eq!(PgStatus::from_code(-8), None);
        assert_eq!(PgStatus::from_code(1), None);
    }

    #[test]
    fn math_error_to_status() {
        let e = MathError::Overflow {
            op: "factorial",
            input: 21,
        };
        assert_eq!(PgStatus::from(&e), PgStatus::Overflow);
    }
}
