//! Logging setup for complaintdesk.
//!
//! Everything logs through `tracing`. The binary installs a single fmt
//! subscriber writing to stderr, so table and JSON output on stdout stays
//! clean for piping.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and above. Degraded storage paths show up here.
    #[default]
    Normal,
    /// Info and debug: loads, writes, submissions, notice expiries.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Map the `-q` / `-v` command line flags onto a verbosity.
    ///
    /// `quiet` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Convert verbosity to a tracing level.
    #[must_use]
    pub fn to_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Initialize the logging system.
///
/// Call once at startup. `RUST_LOG` takes precedence over `verbosity`.
/// Calling it again is harmless; later calls are ignored.
///
/// # Examples
///
/// ```no_run
/// use complaintdesk::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = format!("complaintdesk={}", verbosity.to_level());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

/// Logging for unit tests: warnings and errors, captured by the test harness.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
