//! C ABI for the Polyglot utility functions.
//!
//! Every exported function either cannot fail (pure scalar functions) or
//! returns an `i32` [`PgStatus`] and writes its result through an out
//! pointer. Panics never unwind across the boundary; they are caught and
//! reported as [`PgStatus::Panicked`].
//!
//! Strings handed back to the caller are tracked until released, so a
//! double release or a foreign pointer is rejected instead of freeing
//! memory this library does not own.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a panic into [`PgStatus::Panicked`].
///
/// The body evaluates to an `i32` status; `return` inside it returns from
/// the exported function.
macro_rules! ffi_guard {
    ($body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(code) => code,
            Err(_) => $crate::diag::fail(
                $crate::status::PgStatus::Panicked,
                "ffi_guard",
                "panic caught at the C boundary",
            ),
        }
    };
}

/// Lock a mutex inside an `ffi_guard!` body, returning
/// [`PgStatus::InternalError`] if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::diag::poisoned(),
        }
    };
}

pub mod array;
pub mod compat;
pub mod diag;
mod handle;
pub mod scalar;
pub mod status;
pub mod string;
pub mod string_handle;
pub mod types;

pub use array::{pg_sum_array, pg_sum_array_view};
pub use diag::{pg_last_error_message, pg_live_string_count};
pub use scalar::{
    pg_add_numbers, pg_factorial, pg_fibonacci, pg_is_prime, pg_multiply_doubles,
};
pub use status::PgStatus;
pub use string::{pg_free_string, pg_reverse_string, pg_string_length};
pub use string_handle::{
    pg_string_handle_len, pg_string_handle_read, pg_string_handle_release,
    pg_string_reverse_into_handle,
};
pub use types::{PgIntView, PgOverflowPolicy};

/// Serializes tests that hand out and release raw strings, so a released
/// address cannot be reused by a concurrent test between two assertions.
#[cfg(test)]
pub(crate) static RAW_STRING_TESTS: std::sync::Mutex<()> = std::sync::Mutex::new(());
