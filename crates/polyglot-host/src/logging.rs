//! Logging setup for the host binary.
//!
//! Events go to stderr so stdout carries only the call results. The filter
//! comes from `POLYGLOT_LOG` when set, otherwise from the configured level.

use std::fmt;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{
    fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
    Layer,
};

/// Environment variable holding filter directives, e.g. `polyglot_ffi=debug`.
pub const LOG_ENV: &str = "POLYGLOT_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Lowercase name as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected pretty, compact or json, got {s:?}")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level used when `POLYGLOT_LOG` is unset or unparsable.
    pub level: Level,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
        }
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = build_filter(config);
    let registry = tracing_subscriber::registry();

    match config.format {
        LogFormat::Pretty => registry
            .with(
                tfmt::layer()
                    .with_writer(std::io::stderr)
                    .pretty()
                    .with_filter(filter),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tfmt::layer()
                    .with_writer(std::io::stderr)
                    .compact()
                    .with_filter(filter),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tfmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_filter(filter),
            )
            .try_init(),
    }
}
