//! Raw string exports: borrowed length, owned reversal, matching release.
//!
//! Every pointer handed out by [`pg_reverse_string`] is recorded in a
//! registry (address → byte length) until [`pg_free_string`] takes it back.
//! A release of an address that is not in the registry is refused, which
//! turns double-free and foreign-free into an `InvalidHandle` status.

use std::ffi::{c_char, CStr, CString};
use std::sync::{Mutex, OnceLock};

use indexmap::IndexMap;

use crate::diag::{fail, poisoned};
use crate::status::PgStatus;

static LIVE_STRINGS: OnceLock<Mutex<IndexMap<usize, usize>>> = OnceLock::new();

fn live_strings() -> &'static Mutex<IndexMap<usize, usize>> {
    LIVE_STRINGS.get_or_init(|| Mutex::new(IndexMap::new()))
}

pub(crate) fn live_raw_count() -> usize {
    live_strings().lock().map(|m| m.len()).unwrap_or(0)
}

/// Borrow a NUL-terminated UTF-8 string for the duration of a call.
///
/// # Safety
/// `s` must be null or point to a NUL-terminated buffer that stays valid
/// and unmodified for `'a`.
#[allow(unsafe_code)]
pub(crate) unsafe fn borrow_str<'a>(
    s: *const c_char,
    call: &'static str,
) -> Result<&'a str, i32> {
    if s.is_null() {
        return Err(fail(PgStatus::InvalidArgument, call, "string is null"));
    }
    // SAFETY: s is non-null and NUL-terminated per caller contract.
    let cstr = unsafe { CStr::from_ptr(s) };
    cstr.to_str().map_err(|e| fail(PgStatus::InvalidUtf8, call, e))
}

/// Hand `owned` to the caller as a raw pointer, recording it as live.
pub(crate) fn register(owned: CString) -> Result<*mut c_char, i32> {
    let len = owned.as_bytes().len();
    let mut live = live_strings().lock().map_err(|_| poisoned())?;
    let ptr = owned.into_raw();
    live.insert(ptr as usize, len);
    tracing::debug!(addr = ptr as usize, len, live = live.len(), "string handed out");
    Ok(ptr)
}

/// Take back a pointer produced by [`register`] and free it.
///
/// Null is a no-op. An address that is not live is refused and left alone.
#[allow(unsafe_code)]
pub(crate) fn release(ptr: *mut c_char, call: &'static str) -> Result<(), i32> {
    if ptr.is_null() {
        return Ok(());
    }
    let known = live_strings()
        .lock()
        .map_err(|_| poisoned())?
        .shift_remove(&(ptr as usize))
        .is_some();
    if !known {
        return Err(fail(
            PgStatus::InvalidHandle,
            call,
            format_args!("{ptr:p} is not a live string (already released or foreign)"),
        ));
    }
    // SAFETY: the registry proves ptr came from CString::into_raw in
    // `register` and has not been released since.
    drop(unsafe { CString::from_raw(ptr) });
    tracing::debug!(addr = ptr as usize, "string released");
    Ok(())
}

/// Byte length of a borrowed NUL-terminated UTF-8 string (terminator
/// excluded), written to `out`.
///
/// The library does not retain or free `s`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_string_length(s: *const c_char, out: *mut usize) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_string_length";
        if out.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "out is null");
        }
        // SAFETY: s is a valid C string per caller contract.
        let s = match unsafe { borrow_str(s, CALL) } {
            Ok(s) => s,
            Err(code) => return code,
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = polyglot_core::string_length(s) };
        PgStatus::Ok as i32
    })
}

/// Reverse a borrowed string into a newly allocated one written to `out`.
///
/// The caller owns `*out` and must release it exactly once with
/// [`pg_free_string`]. On failure `*out` is not written.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_reverse_string(s: *const c_char, out: *mut *mut c_char) -> i32 {
    ffi_guard!({
        const CALL: &str = "pg_reverse_string";
        if out.is_null() {
            return fail(PgStatus::InvalidArgument, CALL, "out is null");
        }
        // SAFETY: s is a valid C string per caller contract.
        let reversed = match unsafe { reverse_to_cstring(s, CALL) } {
            Ok(r) => r,
            Err(code) => return code,
        };
        let ptr = match register(reversed) {
            Ok(p) => p,
            Err(code) => return code,
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = ptr };
        PgStatus::Ok as i32
    })
}

/// Release a string returned by [`pg_reverse_string`].
///
/// Null is accepted and ignored. Any other pointer that is not currently
/// live returns `InvalidHandle` without freeing anything.
///
/// Liveness is tracked by address. Once a string is released the allocator
/// may hand the same address to a later string, and a stale pointer then
/// looks live again. Callers that cannot rule this out should use the
/// handle API (`pg_string_reverse_into_handle`) instead.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pg_free_string(s: *mut c_char) -> i32 {
    ffi_guard!({
        match release(s, "pg_free_string") {
            Ok(()) => PgStatus::Ok as i32,
            Err(code) => code,
        }
    })
}

/// Shared body of the reversing exports.
///
/// # Safety
/// Same contract as [`borrow_str`].
#[allow(unsafe_code)]
pub(crate) unsafe fn reverse_to_cstring(
    s: *const c_char,
    call: &'static str,
) -> Result<CString, i32> {
    // SAFETY: forwarded from this function's contract.
    let input = unsafe { borrow_str(s, call) }?;
    CString::new(polyglot_core::reverse_string(input))
        .map_err(|e| fail(PgStatus::InteriorNul, call, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_test_utils::fixtures::{GREETING, GREETING_REVERSED};

    fn serial() -> std::sync::MutexGuard<'static, ()> {
        crate::RAW_STRING_TESTS
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[allow(unsafe_code)]
    fn read(ptr: *const c_char) -> String {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    #[test]
    fn length_of_greeting() {
        let s = c(GREETING);
        let mut len = 0usize;
        assert_eq!(pg_string_length(s.as_ptr(), &mut len), 0);
        assert_eq!(len, 13);
    }

    #[test]
    fn length_rejects_null_and_bad_utf8() {
        let mut len = 0usize;
        assert_eq!(
            pg_string_length(std::ptr::null(), &mut len),
            PgStatus::InvalidArgument as i32
        );
        let bad = CString::new(vec![0xffu8, 0xfe]).unwrap();
        assert_eq!(
            pg_string_length(bad.as_ptr(), &mut len),
            PgStatus::InvalidUtf8 as i32
        );
        let s = c("x");
        assert_eq!(
            pg_string_length(s.as_ptr(), std::ptr::null_mut()),
            PgStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn reverse_then_release_once() {
        let _serial = serial();
        let s = c(GREETING);
        let mut out: *mut c_char = std::ptr::null_mut();
        assert_eq!(pg_reverse_string(s.as_ptr(), &mut out), 0);
        assert!(!out.is_null());
        assert_eq!(read(out), GREETING_REVERSED);
        assert_eq!(pg_free_string(out), 0);
    }

    #[test]
    fn double_release_is_refused() {
        let _serial = serial();
        let s = c("hello");
        let mut out: *mut c_char = std::ptr::null_mut();
        assert_eq!(pg_reverse_string(s.as_ptr(), &mut out), 0);
        assert_eq!(pg_free_string(out), 0);
        assert_eq!(pg_free_string(out), PgStatus::InvalidHandle as i32);
    }

    #[test]
    fn foreign_pointer_is_refused() {
        let _serial = serial();
        let caller_owned = c("mine");
        let ptr = caller_owned.as_ptr() as *mut c_char;
        assert_eq!(pg_free_string(ptr), PgStatus::InvalidHandle as i32);
        // Still intact: the library did not free it.
        assert_eq!(read(ptr), "mine");
    }

    #[test]
    fn null_release_is_noop() {
        assert_eq!(pg_free_string(std::ptr::null_mut()), 0);
    }

    #[test]
    fn reversing_twice_restores_input() {
        let _serial = serial();
        let s = c(GREETING);
        let mut once: *mut c_char = std::ptr::null_mut();
        let mut twice: *mut c_char = std::ptr::null_mut();
        assert_eq!(pg_reverse_string(s.as_ptr(), &mut once), 0);
        assert_eq!(pg_reverse_string(once, &mut twice), 0);
        assert_eq!(read(twice), GREETING);
        assert_eq!(pg_free_string(once), 0);
        assert_eq!(pg_free_string(twice), 0);
    }

    #[test]
    fn reverse_rejects_null_input_without_writing_out() {
        let sentinel = std::ptr::dangling_mut::<c_char>();
        let mut out = sentinel;
        assert_eq!(
            pg_reverse_string(std::ptr::null(), &mut out),
            PgStatus::InvalidArgument as i32
        );
        assert_eq!(out, sentinel);
    }

    #[test]
    fn registered_pointer_is_tracked_until_released() {
        let _serial = serial();
        let ptr = register(c("abc")).unwrap();
        assert!(live_strings().lock().unwrap().contains_key(&(ptr as usize)));
        release(ptr, "test").unwrap();
        assert!(!live_strings().lock().unwrap().contains_key(&(ptr as usize)));
    }
}
