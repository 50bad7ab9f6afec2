//! Command-line configuration for the host binary.

use std::error::Error;
use std::fmt;

use polyglot_core::OverflowPolicy;
use tracing::Level;

use crate::logging::{LogConfig, LogFormat};

/// Program name used in usage text.
pub const PROGRAM: &str = "polyglot-host";

const VALUE_OPTIONS: [&str; 6] = [
    "--policy",
    "--text",
    "--factorial",
    "--fibonacci",
    "--log-level",
    "--log-format",
];

/// Whether `arg` would parse as an option rather than a value.
fn looks_like_option(arg: &str) -> bool {
    let name = arg.split_once('=').map_or(arg, |(name, _)| name);
    matches!(name, "-h" | "--help") || VALUE_OPTIONS.contains(&name)
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors from [`HostConfig::from_args`] and [`HostConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `-h` / `--help` was given.
    HelpRequested,
    /// An option was last on the command line, or followed by another option.
    MissingValue {
        /// The option.
        flag: String,
    },
    /// An option value failed to parse.
    InvalidValue {
        /// The option.
        flag: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// An argument that is not a known option.
    UnknownOption(String),
    /// `--text` contains a NUL byte and cannot cross the C boundary.
    InteriorNul {
        /// Byte offset of the first NUL.
        position: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HelpRequested => write!(f, "help requested"),
            Self::MissingValue { flag } => write!(f, "{flag} needs a value"),
            Self::InvalidValue {
                flag,
                value,
                reason,
            } => write!(f, "invalid value {value:?} for {flag}: {reason}"),
            Self::UnknownOption(opt) => write!(f, "unknown option: {opt}"),
            Self::InteriorNul { position } => {
                write!(f, "--text has a NUL byte at offset {position}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── HostConfig ─────────────────────────────────────────────────────

/// Everything the host run can be told from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Policy for `factorial`, `fibonacci` and the array sums.
    pub policy: OverflowPolicy,
    /// Input for the string calls.
    pub text: String,
    /// Argument to `factorial`.
    pub factorial_n: u32,
    /// Argument to `fibonacci`.
    pub fibonacci_n: u32,
    /// Logging setup.
    pub log: LogConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            policy: OverflowPolicy::default(),
            text: "Hello, World!".to_string(),
            factorial_n: 5,
            fibonacci_n: 10,
            log: LogConfig::default(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

impl HostConfig {
    /// Parse arguments, program name excluded.
    ///
    /// Options not given keep their [`Default`] values. Both `--flag value`
    /// and `--flag=value` are accepted; only the second form can carry a
    /// value that looks like an option.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
                _ => (arg, None),
            };
            if matches!(flag.as_str(), "-h" | "--help") {
                return Err(ConfigError::HelpRequested);
            }
            if !VALUE_OPTIONS.contains(&flag.as_str()) {
                return Err(ConfigError::UnknownOption(flag));
            }
            // A separate value that is itself an option means the value was
            // left out. `--text=--policy` still passes it literally.
            let value = match inline {
                Some(v) => v,
                None => match args.next() {
                    Some(v) if !looks_like_option(&v) => v,
                    _ => return Err(ConfigError::MissingValue { flag }),
                },
            };

            match flag.as_str() {
                "--policy" => config.policy = parse_value(&flag, &value)?,
                "--text" => config.text = value,
                "--factorial" => config.factorial_n = parse_value(&flag, &value)?,
                "--fibonacci" => config.fibonacci_n = parse_value(&flag, &value)?,
                "--log-level" => config.log.level = parse_value::<Level>(&flag, &value)?,
                _ => config.log.format = parse_value::<LogFormat>(&flag, &value)?,
            }
        }

        Ok(config)
    }

    /// Check what parsing cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(position) = self.text.bytes().position(|b| b == 0) {
            return Err(ConfigError::InteriorNul { position });
        }
        Ok(())
    }

    /// Usage text.
    pub fn usage() -> String {
        format!(
            "Calls every Polyglot boundary function once and prints the results.\n\n\
            USAGE:\n    {PROGRAM} [OPTIONS]\n\n\
            OPTIONS:\n    \
            --policy <reject|saturate|wrap>   Overflow policy [default: reject]\n    \
            --text <s>                        Input for the string calls [default: \"Hello, World!\"]\n    \
            --factorial <n>                   Argument to factorial [default: 5]\n    \
            --fibonacci <n>                   Argument to fibonacci [default: 10]\n    \
            --log-level <level>               trace|debug|info|warn|error [default: info]\n    \
            --log-format <fmt>                pretty|compact|json [default: compact]\n    \
            -h, --help                        Print help information\n\n\
            ENVIRONMENT:\n    \
            POLYGLOT_LOG    Filter directives; overrides --log-level"
        )
    }
}
