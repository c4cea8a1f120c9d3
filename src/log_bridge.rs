use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::global::logger;
use crate::level::Severity;
use crate::vt_logger::Logger;

/// Lets code written against the `log` facade print through a [`Logger`].
///
/// `Error` records are shown as `Warn`. The message text comes from the
/// record's `format_args!`, so it uses Rust formatting rather than printf
/// specifiers.
impl<const CAP: usize> log::Log for Logger<CAP> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.is_enabled(Severity::from_log_level(metadata.level()))
    }

    fn log(&self, record: &Record) {
        self.write_args(Severity::from_log_level(record.level()), *record.args());
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

/// Installs the global logger as the `log` crate's logger.
///
/// The facade's own max level is opened fully so that the runtime threshold
/// (see [`set_level`](crate::set_level)) stays the only filter.
pub fn init_log_bridge() -> Result<(), SetLoggerError> {
    log::set_logger(logger()).map(|()| log::set_max_level(LevelFilter::Trace))
}
