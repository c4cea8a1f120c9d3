//! The process-wide logger used by the logging macros.
//!
//! It writes to stdout, starts at [`DEFAULT_LEVEL`] and, with the
//! `serialized` feature, guards each line with a lock. Since OS threads may
//! run at any time, the scheduler is always considered running.

use lazy_static::lazy_static;

use crate::level::{Severity, DEFAULT_LEVEL};
use crate::loggable::Arg;
use crate::vt_logger::{Logger, LoggerBuilder};

lazy_static! {
    /// Created on first use and never torn down.
    static ref LOGGER: Logger = build_global();
}

fn build_global() -> Logger {
    let builder = LoggerBuilder::new().threshold(DEFAULT_LEVEL);
    #[cfg(feature = "serialized")]
    let builder = builder.serialized(crate::serial::Preemptive);
    builder.build()
}

/// Returns the global logger.
#[inline]
pub fn logger() -> &'static Logger {
    &LOGGER
}

/// Sets the global runtime threshold.
///
/// # Examples
///
/// ```
/// # use vt100_logger::{log_debug, set_level, level, Severity};
/// set_level(Severity::Debug);
/// assert_eq!(level(), Severity::Debug);
/// log_debug!("now visible: %u", 7u32);
/// ```
pub fn set_level(level: Severity) {
    LOGGER.set_threshold(level);
}

/// Current global runtime threshold.
pub fn level() -> Severity {
    LOGGER.threshold()
}

/// Logs through the global logger without the macros.
pub fn log_write(level: Severity, format: &str, args: &[Arg<'_>]) {
    LOGGER.write(level, format, args);
}

/// Creates the global serialization lock before concurrent callers start.
pub fn init_thread_safety() {
    LOGGER.init_serialization();
}
