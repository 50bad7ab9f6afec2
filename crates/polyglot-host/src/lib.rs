//! Host side of the Polyglot boundary.
//!
//! [`boundary`] wraps each C ABI call in a `Result` and gives every
//! library-owned allocation an owner that releases it exactly once.
//! [`driver`] runs the fixed call sequence and checks that nothing leaked.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod boundary;
pub mod config;
pub mod driver;
pub mod logging;

pub use boundary::{BoundaryError, IntView, NativeString, StringHandle};
pub use config::{ConfigError, HostConfig};
pub use driver::{run, CallRecord, RunReport};
pub use logging::{init_logging, LogConfig, LogFormat};
