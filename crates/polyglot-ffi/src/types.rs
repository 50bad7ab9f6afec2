//! C-compatible argument types.

use polyglot_core::OverflowPolicy;

/// Overflow policy as seen from C. Passed across the ABI as a plain `i32`
/// so that an out-of-range value is an error rather than UB.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PgOverflowPolicy {
    /// Return `Overflow` instead of a value.
    Reject = 0,
    /// Clamp to the nearest bound.
    Saturate = 1,
    /// Two's-complement wraparound.
    Wrap = 2,
}

impl From<PgOverflowPolicy> for OverflowPolicy {
    fn from(p: PgOverflowPolicy) -> Self {
        match p {
            PgOverflowPolicy::Reject => OverflowPolicy::Reject,
            PgOverflowPolicy::Saturate => OverflowPolicy::Saturate,
            PgOverflowPolicy::Wrap => OverflowPolicy::Wrap,
        }
    }
}

/// Borrowed view of a contiguous `int32_t` array.
///
/// `data` may be null only when `len` is 0. The library reads the elements
/// during the call and never keeps the pointer.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct PgIntView {
    /// First element.
    pub data: *const i32,
    /// Number of elements (not bytes).
    pub len: usize,
}

impl PgIntView {
    /// View over a Rust slice. The view must not outlive `items`.
    pub fn from_slice(items: &[i32]) -> Self {
        Self {
            data: items.as_ptr(),
            len: items.len(),
        }
    }

    /// The empty view.
    pub const fn empty() -> Self {
        Self {
            data: std::ptr::null(),
            len: 0,
        }
    }
}

/// Decode a raw policy argument, recording the failure for `call` if it is
/// out of range.
pub(crate) fn policy_arg(raw: i32, call: &'static str) -> Result<OverflowPolicy, i32> {
    OverflowPolicy::from_raw(raw).ok_or_else(|| {
        crate::diag::fail(
            crate::status::PgStatus::InvalidArgument,
            call,
            format_args!("unknown overflow policy {raw}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_discriminants_match_core() {
        for (ffi, core) in [
            (PgOverflowPolicy::Reject, OverflowPolicy::Reject),
            (PgOverflowPolicy::Saturate, OverflowPolicy::Saturate),
            (PgOverflowPolicy::Wrap, OverflowPolicy::Wrap),
        ] {
            assert_eq!(ffi as i32, core.as_raw());
            assert_eq!(OverflowPolicy::from(ffi), core);
        }
    }

    #[test]
    fn view_layout_is_pointer_plus_length() {
        assert_eq!(
            std::mem::size_of::<PgIntView>(),
            std::mem::size_of::<*const i32>() + std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn from_slice_carries_length() {
        let items = [1, 2, 3];
        let v = PgIntView::from_slice(&items);
        assert_eq!(v.len, 3);
        assert_eq!(v.data, items.as_ptr());
        assert_eq!(PgIntView::empty().len, 0);
    }
}
