//! Handle-based string API.
//!
//! Instead of a raw pointer the caller receives a `u64` handle from a
//! slot+generation table. Reading copies the bytes into a caller buffer;
//! releasing invalidates the handle. Any use of a released handle,
//! including a second release, returns `InvalidHandle`.

use std::ffi::{c_char, CString};
use std::sync::Mutex;

use crate::diag::fail;
use crate::handle::HandleTable;
use crate::status::PgStatus;
use crate::string::reverse_to_cstring;

static STRINGS: Mutex<HandleTable<CString>> = Mutex::new(HandleTable::new());

pub(crate) fn live_handle_count() -> usize {
    STRINGS.lock().map(|t| t.len()).unwrap_or(0)
}

/// Reverse a borrowed string and return the result behind a handle in `out`.
///
/// Release the handle with [`pg_string_handle_release`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_string_reverse_into_handle(s: *const c_char, out: *mut u64) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_string_reverse_into_handle";
        if out.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "out is null");
        }
        // SAFETY: s is a valid C string per caller contract.
        let reversed = match unsafe { reverse_to_cstring(s, CALL) } {
            Ok(r) => r,
            Err(code) => return code,
        };
        let handle = ffi_lock!(STRINGS).insert(reversed);
        tracing::debug!(handle, "string handle issued");
        // SAFETY: out is valid per caller contract.
        unsafe { *out = handle };
        PgStatus::Ok as i32
    })
}

/// Byte length (terminator excluded) of the string behind `handle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_string_handle_len(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_string_handle_len";
        if out.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "out is null");
        }
        let table = ffi_lock!(STRINGS);
        let Some(s) = table.get(handle) else {
            return fail(PgStatus::InvalidHandle, CALL, format_args!("handle {handle:#x}"));
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = s.as_bytes().len() };
        PgStatus::Ok as i32
    })
}

/// Copy the string behind `handle`, NUL-terminated, into `buf`.
///
/// `buf` must hold at least `len + 1` bytes; otherwise nothing is written
/// to it and `BufferTooSmall` is returned. `out_len` (may be null) always
/// receives the string length, so `cap = 0` works as a size query. A null
/// `buf` with a large enough `cap` is `InvalidArgument`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_string_handle_read(
    handle: u64,
    buf: *mut c_char,
    cap: usize,
    out_len: *mut usize,
) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_string_handle_read";
        let table = ffi_lock!(STRINGS);
        let Some(s) = table.get(handle) else {
            return fail(PgStatus::InvalidHandle, CALL, format_args!("handle {handle:#x}"));
        };
        let bytes = s.as_bytes_with_nul();

        if !out_len.is_null() {
            // SAFETY: out_len is valid per caller contract.
            unsafe { *out_len = bytes.len() - 1 };
        }
        if cap < bytes.len() {
            return fail(
                PgStatus::BufferTooSmall,
                CALL,
                format_args!("need {} bytes, got {cap}", bytes.len()),
            );
        }
        if buf.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "buf is null");
        }
        // SAFETY: buf points to cap >= bytes.len() valid bytes.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, bytes.len());
        }
        PgStatus::Ok as i32
    })
}

/// Release the string behind `handle`.
///
/// Returns `InvalidHandle` if the handle is unknown or already released.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_string_handle_release(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(STRINGS).remove(handle) {
            Some(_) => {
                tracing::debug!(handle, "string handle released");
                PgStatus::Ok as i32
            }
            None => fail(
                PgStatus::InvalidHandle,
                "pg_string_handle_release",
                format_args!("handle {handle:#x} is unknown or already released"),
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_test_utils::fixtures::{GREETING, GREETING_REVERSED};

    fn reverse(s: &str) -> u64 {
        let input = CString::new(s).unwrap();
        let mut h = 0u64;
        assert_eq!(pg_string_reverse_into_handle(input.as_ptr(), &mut h), 0);
        h
    }

    fn read(h: u64) -> String {
        let mut len = 0usize;
        assert_eq!(
            pg_string_handle_read(h, std::ptr::null_mut(), 0, &mut len),
            PgStatus::BufferTooSmall as i32
        );
        let mut buf = vec![0 as c_char; len + 1];
        assert_eq!(
            pg_string_handle_read(h, buf.as_mut_ptr(), buf.len(), &mut len),
            0
        );
        assert_eq!(buf[len], 0);
        String::from_utf8(buf[..len].iter().map(|&b| b as u8).collect()).unwrap()
    }

    #[test]
    fn reverse_read_release() {
        let h = reverse(GREETING);
        let mut len = 0usize;
        assert_eq!(pg_string_handle_len(h, &mut len), 0);
        assert_eq!(len, 13);
        assert_eq!(read(h), GREETING_REVERSED);
        assert_eq!(pg_string_handle_release(h), 0);
    }

    #[test]
    fn released_handle_is_dead() {
        let h = reverse("abc");
        assert_eq!(pg_string_handle_release(h), 0);
        let mut len = 0usize;
        assert_eq!(
            pg_string_handle_len(h, &mut len),
            PgStatus::InvalidHandle as i32
        );
        assert_eq!(
            pg_string_handle_release(h),
            PgStatus::InvalidHandle as i32
        );
    }

    #[test]
    fn short_buffer_is_untouched() {
        let h = reverse("abcdef");
        let mut buf = [0x55 as c_char; 6];
        let mut len = 0usize;
        assert_eq!(
            pg_string_handle_read(h, buf.as_mut_ptr(), buf.len(), &mut len),
            PgStatus::BufferTooSmall as i32
        );
        assert_eq!(len, 6);
        assert!(buf.iter().all(|&b| b == 0x55 as c_char));
        assert_eq!(pg_string_handle_release(h), 0);
    }

    #[test]
    fn empty_string_round_trip() {
        let h = reverse("");
        assert_eq!(read(h), "");
        assert_eq!(pg_string_handle_release(h), 0);
    }

    #[test]
    fn null_buffer_with_room_is_invalid_argument() {
        let h = reverse("abcd");
        let mut len = 0usize;
        assert_eq!(
            pg_string_handle_read(h, std::ptr::null_mut(), 64, &mut len),
            PgStatus::InvalidArgument as i32
        );
        assert_eq!(len, 4);
        assert_eq!(read(h), "dcba");
        assert_eq!(pg_string_handle_release(h), 0);
    }

    #[test]
    fn never_issued_handle_is_invalid() {
        assert_eq!(
            pg_string_handle_release(u64::MAX),
            PgStatus::InvalidHandle as i32
        );
        let mut len = 0usize;
        assert_eq!(
            pg_string_handle_len(0, &mut len),
            PgStatus::InvalidHandle as i32
        );
    }

    #[test]
    fn null_arguments_are_rejected() {
        let input = CString::new("x").unwrap();
        assert_eq!(
            pg_string_reverse_into_handle(input.as_ptr(), std::ptr::null_mut()),
            PgStatus::InvalidArgument as i32
        );
        let mut h = 0u64;
        assert_eq!(
            pg_string_reverse_into_handle(std::ptr::null(), &mut h),
            PgStatus::InvalidArgument as i32
        );
    }
}
