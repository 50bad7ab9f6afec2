//! The fixed demonstration sequence.
//!
//! [`run`] makes every boundary call once, in order, and stops at the first
//! error. Owned strings are released before the next call. After the last
//! call the live-string count must be back where it started.

use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::boundary::{self, BoundaryError, IntView};
use crate::config::HostConfig;

const SAMPLE: [i32; 5] = [1, 2, 3, 4, 5];

/// One completed boundary call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// Function name as the host sees it.
    pub call: &'static str,
    /// Rendered arguments.
    pub args: String,
    /// Rendered result.
    pub result: String,
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) = {}", self.call, self.args, self.result)
    }
}

/// Outcome of a successful [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Calls in the order they were made.
    pub records: SmallVec<[CallRecord; 12]>,
    /// `pg_live_string_count` before the first call.
    pub live_before: usize,
    /// `pg_live_string_count` after the last call.
    pub live_after: usize,
}

impl RunReport {
    /// The record for `call`, if it was made.
    pub fn get(&self, call: &str) -> Option<&CallRecord> {
        self.records.iter().find(|r| r.call == call)
    }
}

struct Recorder {
    records: SmallVec<[CallRecord; 12]>,
}

impl Recorder {
    fn push(&mut self, call: &'static str, args: impl fmt::Display, result: impl fmt::Display) {
        let record = CallRecord {
            call,
            args: args.to_string(),
            result: result.to_string(),
        };
        debug!(call, args = %record.args, result = %record.result, "boundary call");
        self.records.push(record);
    }
}

/// Run the sequence described by `config`.
pub fn run(config: &HostConfig) -> Result<RunReport, BoundaryError> {
    let live_before = boundary::live_string_count();
    let policy = config.policy;
    let text = config.text.as_str();
    let mut rec = Recorder {
        records: SmallVec::new(),
    };
    info!(%policy, live_before, "starting boundary run");

    rec.push("add_numbers", "5, 3", boundary::add_numbers(5, 3));
    rec.push(
        "multiply_doubles",
        "2.5, 4.0",
        format_args!("{:.2}", boundary::multiply_doubles(2.5, 4.0)),
    );

    let n = config.factorial_n;
    rec.push("factorial", n, boundary::factorial(n, policy)?);
    rec.push("is_prime", 17, boundary::is_prime(17));
    rec.push("is_prime", 16, boundary::is_prime(16));
    let n = config.fibonacci_n;
    rec.push("fibonacci", n, boundary::fibonacci(n, policy)?);

    rec.push(
        "string_length",
        format_args!("{text:?}"),
        boundary::string_length(text)?,
    );
    let reversed = boundary::reverse_string(text)?.into_string()?;
    rec.push("reverse_string", format_args!("{text:?}"), format_args!("{reversed:?}"));
    let handle = boundary::reverse_into_handle(text)?;
    let via_handle = handle.read()?;
    handle.release()?;
    rec.push(
        "reverse_string_handle",
        format_args!("{text:?}"),
        format_args!("{via_handle:?}"),
    );

    rec.push(
        "sum_array",
        format_args!("{SAMPLE:?}"),
        boundary::sum_array(&SAMPLE, policy)?,
    );
    rec.push(
        "sum_array_view",
        "[]",
        boundary::sum_view(IntView::new(&[]), policy)?,
    );

    let live_after = boundary::live_string_count();
    if live_after > live_before {
        return Err(BoundaryError::Leak {
            live: live_after - live_before,
        });
    }
    info!(calls = rec.records.len(), live_after, "boundary run complete");

    Ok(RunReport {
        records: rec.records,
        live_before,
        live_after,
    })
}
