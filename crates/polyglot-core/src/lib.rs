//! Core utility functions for the Polyglot boundary demo.
//!
//! Everything here is plain safe Rust operating on native types. The C ABI
//! in `polyglot-ffi` marshals raw pointers and status codes into these
//! functions; the host and language bindings only ever see them through
//! that boundary.
//!
//! Arithmetic that can exceed its result type takes an [`OverflowPolicy`]
//! and reports [`MathError::Overflow`] when the policy is
//! [`OverflowPolicy::Reject`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arith;
pub mod array;
pub mod error;
pub mod math;
pub mod policy;
pub mod text;

pub use arith::{add_numbers, multiply_doubles};
pub use array::sum_array;
pub use error::MathError;
pub use math::{factorial, fibonacci, is_prime, FACTORIAL_MAX_INPUT, FIBONACCI_MAX_INPUT};
pub use policy::{OverflowPolicy, UnknownPolicy};
pub use text::{reverse_string, string_length};
