//! Safe adapters over the C ABI.
//!
//! Each wrapper converts Rust arguments to their C form, makes exactly one
//! boundary call, and turns a non-zero status into a [`BoundaryError`]
//! carrying the library's last-error message. Library-owned strings come
//! back wrapped in [`NativeString`] or [`StringHandle`], whose `Drop`
//! releases them, so every exit path releases exactly once.

use std::error::Error;
use std::ffi::{c_char, CStr, CString};
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

use polyglot_core::OverflowPolicy;
use polyglot_ffi as ffi;
use polyglot_ffi::{PgIntView, PgStatus};

// ── BoundaryError ──────────────────────────────────────────────────

/// Failure of a boundary call, or of the host's own conversions around it.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryError {
    /// The library returned a non-`Ok` status.
    Status {
        /// Exported function that failed.
        call: &'static str,
        /// Decoded status. Codes the host does not know decode as
        /// [`PgStatus::InternalError`].
        status: PgStatus,
        /// The library's last-error message for this thread.
        message: String,
    },
    /// A host string could not be passed because it contains a NUL byte.
    InteriorNul {
        /// Exported function the string was meant for.
        call: &'static str,
        /// Byte offset of the first NUL.
        position: usize,
    },
    /// A string returned by the library is not valid UTF-8.
    InvalidUtf8 {
        /// Exported function that produced the string.
        call: &'static str,
    },
    /// Library-allocated strings were still live after the run.
    Leak {
        /// Number of strings above the starting count.
        live: usize,
    },
}

impl BoundaryError {
    /// The library status behind this error, if it came from one.
    pub fn status(&self) -> Option<PgStatus> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status {
                call,
                status,
                message,
            } => {
                write!(f, "{call} failed: {} ({})", status.describe(), *status as i32)?;
                if !message.is_empty() {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            Self::InteriorNul { call, position } => {
                write!(f, "{call}: argument has a NUL byte at offset {position}")
            }
            Self::InvalidUtf8 { call } => write!(f, "{call}: returned string is not valid UTF-8"),
            Self::Leak { live } => write!(f, "{live} library string(s) still live after the run"),
        }
    }
}

impl Error for BoundaryError {}

fn check(call: &'static str, code: i32) -> Result<(), BoundaryError> {
    if code == PgStatus::Ok as i32 {
        return Ok(());
    }
    let status = PgStatus::from_code(code).unwrap_or(PgStatus::InternalError);
    Err(BoundaryError::Status {
        call,
        status,
        message: last_error_message(),
    })
}

fn to_c(call: &'static str, s: &str) -> Result<CString, BoundaryError> {
    CString::new(s).map_err(|e| BoundaryError::InteriorNul {
        call,
        position: e.nul_position(),
    })
}

/// The library's most recent error message on this thread.
pub fn last_error_message() -> String {
    let mut len = 0usize;
    if ffi::pg_last_error_message(std::ptr::null_mut(), 0, &mut len) != PgStatus::Ok as i32 {
        return String::new();
    }
    let mut buf = vec![0u8; len + 1];
    if ffi::pg_last_error_message(buf.as_mut_ptr().cast(), buf.len(), &mut len)
        != PgStatus::Ok as i32
    {
        return String::new();
    }
    buf.truncate(len);
    String::from_utf8_lossy(&buf).into_owned()
}

// ── Owned results ──────────────────────────────────────────────────

/// A string allocated by `pg_reverse_string`.
///
/// Released with `pg_free_string` when dropped. Not `Clone`: there is one
/// owner per allocation.
#[derive(Debug)]
pub struct NativeString {
    ptr: NonNull<c_char>,
}

impl NativeString {
    /// Borrow the contents.
    #[allow(unsafe_code)]
    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: ptr came from pg_reverse_string, is NUL-terminated, and
        // stays allocated until self is released.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }

    /// Borrow the contents as UTF-8.
    pub fn to_str(&self) -> Result<&str, BoundaryError> {
        self.as_c_str()
            .to_str()
            .map_err(|_| BoundaryError::InvalidUtf8 {
                call: "pg_reverse_string",
            })
    }

    /// Copy the contents out and release the native string.
    pub fn into_string(self) -> Result<String, BoundaryError> {
        let owned = self.to_str().map(str::to_owned);
        self.release()?;
        owned
    }

    /// Release now, reporting the status instead of logging it.
    pub fn release(self) -> Result<(), BoundaryError> {
        let this = ManuallyDrop::new(self);
        check("pg_free_string", ffi::pg_free_string(this.ptr.as_ptr()))
    }
}

impl Drop for NativeString {
    fn drop(&mut self) {
        if let Err(e) = check("pg_free_string", ffi::pg_free_string(self.ptr.as_ptr())) {
            tracing::warn!(error = %e, "releasing native string failed");
        }
    }
}

/// A string held by the library behind a `u64` handle.
///
/// Released with `pg_string_handle_release` when dropped.
#[derive(Debug)]
pub struct StringHandle {
    raw: u64,
}

impl StringHandle {
    /// The raw handle value.
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Byte length of the string, terminator excluded.
    pub fn len(&self) -> Result<usize, BoundaryError> {
        let mut len = 0usize;
        check(
            "pg_string_handle_len",
            ffi::pg_string_handle_len(self.raw, &mut len),
        )?;
        Ok(len)
    }

    /// Whether the string is empty.
    pub fn is_empty(&self) -> Result<bool, BoundaryError> {
        self.len().map(|n| n == 0)
    }

    /// Copy the string out through a buffer sized from [`len`](Self::len).
    pub fn read(&self) -> Result<String, BoundaryError> {
        const CALL: &str = "pg_string_handle_read";
        let mut buf = vec![0u8; self.len()? + 1];
        let mut len = 0usize;
        check(
            CALL,
            ffi::pg_string_handle_read(self.raw, buf.as_mut_ptr().cast(), buf.len(), &mut len),
        )?;
        buf.truncate(len);
        String::from_utf8(buf).map_err(|_| BoundaryError::InvalidUtf8 { call: CALL })
    }

    /// Release now, reporting the status instead of logging it.
    pub fn release(self) -> Result<(), BoundaryError> {
        let this = ManuallyDrop::new(self);
        check(
            "pg_string_handle_release",
            ffi::pg_string_handle_release(this.raw),
        )
    }
}

impl Drop for StringHandle {
    fn drop(&mut self) {
        if let Err(e) = check(
            "pg_string_handle_release",
            ffi::pg_string_handle_release(self.raw),
        ) {
            tracing::warn!(error = %e, "releasing string handle failed");
        }
    }
}

/// Borrowed `i32` array in C form.
///
/// Only constructible from a slice, so pointer and length always describe
/// one live allocation for `'a`.
#[derive(Clone, Copy, Debug)]
pub struct IntView<'a> {
    raw: PgIntView,
    _items: PhantomData<&'a [i32]>,
}

impl<'a> IntView<'a> {
    /// View over `items`.
    pub fn new(items: &'a [i32]) -> Self {
        Self {
            raw: PgIntView::from_slice(items),
            _items: PhantomData,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.raw.len
    }

    /// Whether the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }

    /// The C struct passed to `pg_sum_array_view`.
    pub fn as_raw(&self) -> PgIntView {
        self.raw
    }
}

impl<'a> From<&'a [i32]> for IntView<'a> {
    fn from(items: &'a [i32]) -> Self {
        Self::new(items)
    }
}

// ── Calls ──────────────────────────────────────────────────────────

/// `pg_add_numbers`.
pub fn add_numbers(a: i32, b: i32) -> i32 {
    ffi::pg_add_numbers(a, b)
}

/// `pg_multiply_doubles`.
pub fn multiply_doubles(a: f64, b: f64) -> f64 {
    ffi::pg_multiply_doubles(a, b)
}

/// `pg_factorial`.
pub fn factorial(n: u32, policy: OverflowPolicy) -> Result<u64, BoundaryError> {
    let mut out = 0u64;
    check("pg_factorial", ffi::pg_factorial(n, policy.as_raw(), &mut out))?;
    Ok(out)
}

/// `pg_is_prime`.
pub fn is_prime(n: i32) -> bool {
    ffi::pg_is_prime(n)
}

/// `pg_fibonacci`.
pub fn fibonacci(n: u32, policy: OverflowPolicy) -> Result<u64, BoundaryError> {
    let mut out = 0u64;
    check("pg_fibonacci", ffi::pg_fibonacci(n, policy.as_raw(), &mut out))?;
    Ok(out)
}

/// `pg_string_length`: UTF-8 byte length.
pub fn string_length(s: &str) -> Result<usize, BoundaryError> {
    const CALL: &str = "pg_string_length";
    let c = to_c(CALL, s)?;
    let mut out = 0usize;
    check(CALL, ffi::pg_string_length(c.as_ptr(), &mut out))?;
    Ok(out)
}

/// `pg_reverse_string`, returning the owned result.
pub fn reverse_string(s: &str) -> Result<NativeString, BoundaryError> {
    const CALL: &str = "pg_reverse_string";
    let c = to_c(CALL, s)?;
    let mut out: *mut c_char = std::ptr::null_mut();
    check(CALL, ffi::pg_reverse_string(c.as_ptr(), &mut out))?;
    let ptr = NonNull::new(out).ok_or_else(|| BoundaryError::Status {
        call: CALL,
        status: PgStatus::InternalError,
        message: "reported Ok but returned null".to_string(),
    })?;
    Ok(NativeString { ptr })
}

/// `pg_string_reverse_into_handle`.
pub fn reverse_into_handle(s: &str) -> Result<StringHandle, BoundaryError> {
    const CALL: &str = "pg_string_reverse_into_handle";
    let c = to_c(CALL, s)?;
    let mut raw = 0u64;
    check(CALL, ffi::pg_string_reverse_into_handle(c.as_ptr(), &mut raw))?;
    Ok(StringHandle { raw })
}

/// `pg_sum_array` with the slice's pointer and length.
pub fn sum_array(items: &[i32], policy: OverflowPolicy) -> Result<i32, BoundaryError> {
    let mut out = 0i32;
    check(
        "pg_sum_array",
        ffi::pg_sum_array(items.as_ptr(), items.len(), policy.as_raw(), &mut out),
    )?;
    Ok(out)
}

/// `pg_sum_array_view`.
pub fn sum_view(view: IntView<'_>, policy: OverflowPolicy) -> Result<i32, BoundaryError> {
    let mut out = 0i32;
    check(
        "pg_sum_array_view",
        ffi::pg_sum_array_view(view.as_raw(), policy.as_raw(), &mut out),
    )?;
    Ok(out)
}

/// `pg_live_string_count`.
pub fn live_string_count() -> usize {
    ffi::pg_live_string_count()
}
