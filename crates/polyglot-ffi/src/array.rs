//! Array exports. Arrays are borrowed for the duration of the call only.

use crate::diag::fail;
use crate::status::PgStatus;
use crate::types::{policy_arg, PgIntView};

/// Turn a pointer + length pair into a slice after checking what can be
/// checked: null with a non-zero length, alignment, and total byte size.
///
/// # Safety
/// If `len > 0`, `data` must point to `len` initialized `i32`s that stay
/// valid and unmodified for `'a`.
#[allow(unsafe_code)]
unsafe fn borrow_items<'a>(
    data: *const i32,
    len: usize,
    call: &'static str,
) -> Result<&'a [i32], i32> {
    if len == 0 {
        return Ok(&[]);
    }
    if data.is_null() {
        return Err(fail(
            PgStatus::InvalidArgument,
            call,
            format_args!("items is null but len is {len}"),
        ));
    }
    if !data.is_aligned() {
        return Err(fail(PgStatus::InvalidArgument, call, "items is misaligned"));
    }
    if len > isize::MAX as usize / std::mem::size_of::<i32>() {
        return Err(fail(
            PgStatus::InvalidArgument,
            call,
            format_args!("len {len} exceeds the addressable size"),
        ));
    }
    // SAFETY: non-null, aligned, size-checked; validity per caller contract.
    Ok(unsafe { std::slice::from_raw_parts(data, len) })
}

#[allow(unsafe_code)]
fn sum_into(items: &[i32], policy: i32, out: *mut i32, call: &'static str) -> i32 {
    let policy = match policy_arg(policy, call) {
        Ok(p) => p,
        Err(code) => return code,
    };
    match polyglot_core::sum_array(items, policy) {
        Ok(sum) => {
            // SAFETY: out was null-checked by the caller and is valid per contract.
            unsafe { *out = sum };
            PgStatus::Ok as i32
        }
        Err(e) => fail(PgStatus::from(&e), call, e),
    }
}

/// Sum `len` integers starting at `items` into `out` under `policy`.
///
/// The array is only read. `items` may be null when `len` is 0, in which
/// case the sum is 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_sum_array(items: *const i32, len: usize, policy: i32, out: *mut i32) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_sum_array";
        if out.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "out is null");
        }
        // SAFETY: items points to len i32s per caller contract.
        let items = match unsafe { borrow_items(items, len, CALL) } {
            Ok(s) => s,
            Err(code) => return code,
        };
        sum_into(items, policy, out, CALL)
    })
}

/// Sum the integers in `view` into `out` under `policy`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_sum_array_view(view: PgIntView, policy: i32, out: *mut i32) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_sum_array_view";
        if out.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "out is null");
        }
        // SAFETY: view describes len valid i32s per caller contract.
        let items = match unsafe { borrow_items(view.data, view.len, CALL) } {
            Ok(s) => s,
            Err(code) => return code,
        };
        sum_into(items, policy, out, CALL)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PgOverflowPolicy;
    use proptest::prelude::*;

    const REJECT: i32 = PgOverflowPolicy::Reject as i32;

    #[test]
    fn sums_five_items() {
        let items = [1, 2, 3, 4, 5];
        let mut out = 0;
        assert_eq!(pg_sum_array(items.as_ptr(), items.len(), REJECT, &mut out), 0);
        assert_eq!(out, 15);
    }

    #[test]
    fn empty_array_accepts_null() {
        let mut out = -1;
        assert_eq!(pg_sum_array(std::ptr::null(), 0, REJECT, &mut out), 0);
        assert_eq!(out, 0);
        out = -1;
        assert_eq!(pg_sum_array_view(PgIntView::empty(), REJECT, &mut out), 0);
        assert_eq!(out, 0);
    }

    #[test]
    fn null_with_length_is_rejected() {
        let mut out = 0;
        assert_eq!(
            pg_sum_array(std::ptr::null(), 3, REJECT, &mut out),
            PgStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn misaligned_pointer_is_rejected() {
        let items = [1i32, 2, 3];
        let misaligned = (items.as_ptr() as *const u8).wrapping_add(1) as *const i32;
        let mut out = 0;
        assert_eq!(
            pg_sum_array(misaligned, 2, REJECT, &mut out),
            PgStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn oversized_length_is_rejected() {
        let items = [1i32];
        let mut out = 0;
        assert_eq!(
            pg_sum_array(items.as_ptr(), usize::MAX, REJECT, &mut out),
            PgStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn overflow_follows_policy() {
        let items = [i32::MAX, 1];
        let mut out = 0;
        assert_eq!(
            pg_sum_array(items.as_ptr(), 2, REJECT, &mut out),
            PgStatus::Overflow as i32
        );
        let wrap = PgOverflowPolicy::Wrap as i32;
        assert_eq!(pg_sum_array(items.as_ptr(), 2, wrap, &mut out), 0);
        assert_eq!(out, i32::MIN);
    }

    #[test]
    fn input_is_not_mutated() {
        let items = vec![4, 5, 6];
        let before = items.clone();
        let mut out = 0;
        pg_sum_array_view(PgIntView::from_slice(&items), REJECT, &mut out);
        assert_eq!(items, before);
        assert_eq!(out, 15);
    }

    proptest! {
        #[test]
        fn view_and_pair_agree(items in proptest::collection::vec(-1000i32..1000, 0..128)) {
            let mut a = 0;
            let mut b = 0;
            prop_assert_eq!(pg_sum_array(items.as_ptr(), items.len(), REJECT, &mut a), 0);
            prop_assert_eq!(pg_sum_array_view(PgIntView::from_slice(&items), REJECT, &mut b), 0);
            prop_assert_eq!(a, b);
            prop_assert_eq!(a, items.iter().sum::<i32>());
        }

        #[test]
        fn every_policy_matches_oracle(items in proptest::collection::vec(any::<i32>(), 0..32)) {
            for (policy, raw) in polyglot_test_utils::policies() {
                let mut out = 0;
                let code = pg_sum_array(items.as_ptr(), items.len(), raw, &mut out);
                match polyglot_test_utils::naive_sum(&items, policy) {
                    Some(want) => {
                        prop_assert_eq!(code, 0);
                        prop_assert_eq!(out, want);
                    }
                    None => prop_assert_eq!(code, PgStatus::Overflow as i32),
                }
            }
        }
    }
}
