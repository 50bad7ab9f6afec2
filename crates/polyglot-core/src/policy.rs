//! Overflow policy shared by every operation with a bounded result type.

use std::fmt;
use std::str::FromStr;

/// What to do when an integer result exceeds its type.
///
/// The discriminants are the values accepted across the C ABI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Report an error instead of producing a value.
    #[default]
    Reject = 0,
    /// Clamp to the nearest representable bound.
    Saturate = 1,
    /// Two's-complement wraparound.
    Wrap = 2,
}

impl OverflowPolicy {
    /// All policies in discriminant order.
    pub const ALL: [OverflowPolicy; 3] = [Self::Reject, Self::Saturate, Self::Wrap];

    /// Decode a raw ABI value. Returns `None` for anything out of range.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Reject),
            1 => Some(Self::Saturate),
            2 => Some(Self::Wrap),
            _ => None,
        }
    }

    /// The raw ABI value.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Saturate => "saturate",
            Self::Wrap => "wrap",
        }
    }

    /// `a * b` under this policy. `None` means rejected.
    pub fn mul_u64(self, a: u64, b: u64) -> Option<u64> {
        match self {
            Self::Reject => a.checked_mul(b),
            Self::Saturate => Some(a.saturating_mul(b)),
            Self::Wrap => Some(a.wrapping_mul(b)),
        }
    }

    /// `a + b` under this policy. `None` means rejected.
    pub fn add_u64(self, a: u64, b: u64) -> Option<u64> {
        match self {
            Self::Reject => a.checked_add(b),
            Self::Saturate => Some(a.saturating_add(b)),
            Self::Wrap => Some(a.wrapping_add(b)),
        }
    }

    /// `a + b` under this policy. `None` means rejected.
    pub fn add_i32(self, a: i32, b: i32) -> Option<i32> {
        match self {
            Self::Reject => a.checked_add(b),
            Self::Saturate => Some(a.saturating_add(b)),
            Self::Wrap => Some(a.wrapping_add(b)),
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown overflow policy '{}' (expected reject, saturate or wrap)",
            self.0
        )
    }
}

impl std::error::Error for UnknownPolicy {}

impl FromStr for OverflowPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "saturate" => Ok(Self::Saturate),
            "wrap" => Ok(Self::Wrap),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_are_stable() {
        assert_eq!(OverflowPolicy::Reject.as_raw(), 0);
        assert_eq!(OverflowPolicy::Saturate.as_raw(), 1);
        assert_eq!(OverflowPolicy::Wrap.as_raw(), 2);
    }

    #[test]
    fn from_raw_rejects_out_of_range() {
        for p in OverflowPolicy::ALL {
            assert_eq!(OverflowPolicy::from_raw(p.as_raw()), Some(p));
        }
        assert_eq!(OverflowPolicy::from_raw(3), None);
        assert_eq!(OverflowPolicy::from_raw(-1), None);
    }

    #[test]
    fn default_is_reject() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::Reject);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Saturate".parse(), Ok(OverflowPolicy::Saturate));
        assert_eq!("WRAP".parse(), Ok(OverflowPolicy::Wrap));
        assert!("clamp".parse::<OverflowPolicy>().is_err());
    }

    #[test]
    fn mul_u64_per_policy() {
        let big = u64::MAX / 2 + 1;
        assert_eq!(OverflowPolicy::Reject.mul_u64(big, 2), None);
        assert_eq!(OverflowPolicy::Saturate.mul_u64(big, 2), Some(u64::MAX));
        assert_eq!(OverflowPolicy::Wrap.mul_u64(big, 2), Some(0));
        assert_eq!(OverflowPolicy::Reject.mul_u64(6, 7), Some(42));
    }

    #[test]
    fn add_i32_per_policy() {
        assert_eq!(OverflowPolicy::Reject.add_i32(i32::MAX, 1), None);
        assert_eq!(OverflowPolicy::Saturate.add_i32(i32::MAX, 1), Some(i32::MAX));
        assert_eq!(OverflowPolicy::Saturate.add_i32(i32::MIN, -1), Some(i32::MIN));
        assert_eq!(OverflowPolicy::Wrap.add_i32(i32::MAX, 1), Some(i32::MIN));
    }
}
