//! Python bindings for the Polyglot boundary functions.
//!
//! The native extension is named `_polyglot`. Every function goes through
//! the `polyglot-ffi` C ABI rather than calling `polyglot-core` directly,
//! so Python exercises the same contract as C, Go and JNI callers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![allow(unsafe_code)]

use polyglot_core::OverflowPolicy;
use pyo3::prelude::*;

mod error;
mod functions;

/// The native `_polyglot` extension module.
#[pymodule]
fn _polyglot(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(functions::add_numbers, m)?)?;
    m.add_function(wrap_pyfunction!(functions::multiply_doubles, m)?)?;
    m.add_function(wrap_pyfunction!(functions::factorial, m)?)?;
    m.add_function(wrap_pyfunction!(functions::is_prime, m)?)?;
    m.add_function(wrap_pyfunction!(functions::fibonacci, m)?)?;
    m.add_function(wrap_pyfunction!(functions::string_length, m)?)?;
    m.add_function(wrap_pyfunction!(functions::reverse_string, m)?)?;
    m.add_function(wrap_pyfunction!(functions::sum_array, m)?)?;
    m.add_function(wrap_pyfunction!(functions::live_string_count, m)?)?;

    let policies: Vec<&str> = OverflowPolicy::ALL.iter().map(|p| p.name()).collect();
    m.add("POLICIES", policies)?;
    Ok(())
}
