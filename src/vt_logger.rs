use std::env;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::appender::{Appender, MessageBuffer, MESSAGE_CAPACITY};
use crate::dispatch::FormatInfo;
use crate::format::{format_message, format_routed};
use crate::level::{ParseSeverityError, Severity, Threshold, COLOR_RESET, DEFAULT_LEVEL};
use crate::loggable::Arg;
use crate::serial::{SchedulerState, SerialLock};

/// Environment variable read by [`LoggerBuilder::from_env`].
pub const LEVEL_ENV_VAR: &str = "VT100_LOG_LEVEL";

/// Reads the threshold from `VT100_LOG_LEVEL`. `Ok(None)` if it is unset.
pub fn level_from_env() -> Result<Option<Severity>, ParseSeverityError> {
    match env::var(LEVEL_ENV_VAR) {
        Ok(value) => value.parse().map(Some),
        Err(_) => Ok(None),
    }
}

/// One rendered log line, ready for a sink.
///
/// On the wire a line is `color + prefix + message + reset + "\n"`.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    pub level: Severity,
    pub message: &'a [u8],
}

impl<'a> Line<'a> {
    #[inline]
    pub fn new(level: Severity, message: &'a [u8]) -> Self {
        Self { level, message }
    }

    /// The pieces of the line in output order.
    #[inline]
    pub fn parts(&self) -> [&'a [u8]; 5] {
        [
            self.level.color().as_bytes(),
            self.level.prefix().as_bytes(),
            self.message,
            COLOR_RESET.as_bytes(),
            b"\n",
        ]
    }

    /// Writes the whole line to `w`.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        for part in self.parts() {
            w.write_all(part)?;
        }
        Ok(())
    }
}

/// Destination for rendered log lines.
///
/// Implementations decide where a line ends up: a terminal, a UART, a file or
/// a test buffer. The logger calls [`write_line`](LineSink::write_line) once
/// per emitted message, already filtered and formatted, and never retries.
///
/// # Usage
///
/// ```
/// # use vt100_logger::{Line, LineSink};
/// # use std::io;
/// # use parking_lot::Mutex;
/// // Keeps only the message text
/// struct MessagesOnly(Mutex<Vec<String>>);
///
/// impl LineSink for MessagesOnly {
///     fn write_line(&self, line: &Line<'_>) -> io::Result<()> {
///         let text = String::from_utf8_lossy(line.message).into_owned();
///         self.0.lock().push(text);
///         Ok(())
///     }
/// }
/// ```
pub trait LineSink: Send + Sync {
    /// Writes one line. An error is counted by the logger and otherwise
    /// ignored; it never reaches the code that logged the message.
    fn write_line(&self, line: &Line<'_>) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: LineSink + ?Sized> LineSink for Arc<T> {
    fn write_line(&self, line: &Line<'_>) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Writes lines to the process's standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&self, line: &Line<'_>) -> io::Result<()> {
        let mut out = io::stdout().lock();
        line.write_to(&mut out)?;
        out.flush()
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Writes lines to any [`io::Write`] behind a mutex.
///
/// ```
/// # use vt100_logger::{Logger, LoggerBuilder, Severity, WriterSink};
/// # use vt100_logger::loggable::Arg;
/// # use std::sync::Arc;
/// let sink = Arc::new(WriterSink::new(Vec::new()));
/// let logger: Logger = LoggerBuilder::new().sink(sink.clone()).build();
///
/// logger.write(Severity::Warn, "temp=%d", &[Arg::Int(87)]);
///
/// let text = sink.with_inner(|buf| String::from_utf8(buf.clone()).unwrap());
/// assert_eq!(text, "\x1b[33m[WARN ] temp=87\x1b[0m\n");
/// ```
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Runs `f` with exclusive access to the wrapped writer.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut *self.writer.lock())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> LineSink for WriterSink<W> {
    fn write_line(&self, line: &Line<'_>) -> io::Result<()> {
        line.write_to(&mut *self.writer.lock())
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

/// Colorized, leveled printf-style logger.
///
/// Each call is filtered against a runtime threshold, formatted into a stack
/// buffer of `CAP` bytes (terminator included, so messages are cut at
/// `CAP - 1` bytes) and handed to the [`LineSink`] as one line.
///
/// # Thread Safety
///
/// A `Logger` is `Sync` and may be shared between threads. Formatting uses
/// only call-local memory. In serialized mode the sink write is additionally
/// guarded by a [`SerialLock`], so lines from concurrent callers never
/// interleave even if the sink writes a line in several pieces.
///
/// # Type Parameters
///
/// * `CAP` - Capacity of the message buffer in bytes, default 256
///
/// # Examples
///
/// ```
/// # use vt100_logger::{Logger, LoggerBuilder, Severity, StdoutSink};
/// # use vt100_logger::loggable::Arg;
/// let logger: Logger = LoggerBuilder::new()
///     .threshold(Severity::Debug)
///     .sink(StdoutSink)
///     .build();
///
/// logger.write(Severity::Info, "mask=%b id=%p", &[Arg::Uint(42), Arg::Ptr(0xAB)]);
/// logger.write(Severity::Trace, "filtered out", &[]);
/// ```
pub struct Logger<const CAP: usize = MESSAGE_CAPACITY> {
    threshold: Threshold,
    sink: Box<dyn LineSink>,
    serial: Option<SerialLock>,
    dropped: AtomicUsize,
}

impl<const CAP: usize> Logger<CAP> {
    /// Creates an unserialized logger at the default threshold.
    pub fn new(sink: impl LineSink + 'static) -> Self {
        LoggerBuilder::new().sink(sink).build()
    }

    /// Overwrites the runtime threshold. Always succeeds.
    #[inline]
    pub fn set_threshold(&self, level: Severity) {
        self.threshold.set(level);
    }

    #[inline]
    pub fn threshold(&self) -> Severity {
        self.threshold.get()
    }

    /// True if a message at `level` would be written.
    #[inline(always)]
    pub fn is_enabled(&self, level: Severity) -> bool {
        self.threshold.allows(level)
    }

    pub fn is_serialized(&self) -> bool {
        self.serial.is_some()
    }

    /// Creates the serialization lock ahead of time. Idempotent, and a no-op
    /// for unserialized loggers.
    ///
    /// Writes create the lock on demand; calling this before concurrent
    /// callers start only moves that work out of the first log call.
    pub fn init_serialization(&self) {
        if let Some(serial) = &self.serial {
            serial.init();
        }
    }

    /// Number of lines the sink failed to write.
    pub fn dropped_writes(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Logs `format` rendered with `args`.
    ///
    /// Does nothing below the threshold. The renderer is chosen by scanning
    /// `format` for `%b`; the logging macros do that scan at compile time and
    /// call [`write_with_info`](Self::write_with_info) instead.
    pub fn write(&self, level: Severity, format: &str, args: &[Arg<'_>]) {
        if !self.is_enabled(level) {
            return;
        }
        self.format_and_emit(level, |out| format_message(out, format, args));
    }

    /// Logs with a format string whose route was computed in advance.
    pub fn write_with_info(&self, level: Severity, info: &FormatInfo, args: &[Arg<'_>]) {
        if !self.is_enabled(level) {
            return;
        }
        self.format_and_emit(level, |out| {
            format_routed(out, info.route, info.format_string, args)
        });
    }

    /// Logs a message built with `format_args!`.
    pub fn write_args(&self, level: Severity, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        self.format_and_emit(level, |out| {
            // Appender never reports an error; truncation is silent.
            let _ = fmt::Write::write_fmt(out, args);
        });
    }

    pub fn flush(&self) {
        if self.sink.flush().is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn format_and_emit(&self, level: Severity, fill: impl FnOnce(&mut Appender<'_>)) {
        let mut msg = MessageBuffer::<CAP>::new();
        msg.fill_with(fill);
        self.emit(&Line::new(level, msg.as_bytes()));
    }

    fn emit(&self, line: &Line<'_>) {
        let _guard = self.serial.as_ref().map(|serial| {
            serial.init();
            serial.acquire()
        });

        if self.sink.write_line(line).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Configuration for a [`Logger`].
///
/// ```
/// # use vt100_logger::{Logger, LoggerBuilder, Severity};
/// # use vt100_logger::serial::Preemptive;
/// let logger: Logger<128> = LoggerBuilder::new()
///     .threshold(Severity::Warn)
///     .serialized(Preemptive)
///     .build();
/// assert!(logger.is_serialized());
/// assert_eq!(logger.threshold(), Severity::Warn);
/// ```
pub struct LoggerBuilder {
    threshold: Severity,
    sink: Option<Box<dyn LineSink>>,
    serial: Option<SerialLock>,
}

impl LoggerBuilder {
    /// Default threshold, stdout sink, unserialized.
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_LEVEL,
            sink: None,
            serial: None,
        }
    }

    /// Like [`new`](Self::new), with the threshold taken from the
    /// `VT100_LOG_LEVEL` environment variable when it is set.
    pub fn from_env() -> Result<Self, ParseSeverityError> {
        let builder = Self::new();
        Ok(match level_from_env()? {
            Some(level) => builder.threshold(level),
            None => builder,
        })
    }

    pub fn threshold(mut self, level: Severity) -> Self {
        self.threshold = level;
        self
    }

    pub fn sink(mut self, sink: impl LineSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Serializes sink writes whenever `scheduler` reports that it runs.
    pub fn serialized(mut self, scheduler: impl SchedulerState + 'static) -> Self {
        self.serial = Some(SerialLock::new(scheduler));
        self
    }

    pub fn build<const CAP: usize>(self) -> Logger<CAP> {
        Logger {
            threshold: Threshold::new(self.threshold),
            sink: self.sink.unwrap_or_else(|| Box::new(StdoutSink)),
            serial: self.serial,
            dropped: AtomicUsize::new(0),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs a printf-style message at the given severity through the global
/// logger.
///
/// The severity is one of `Trace`, `Debug`, `Info`, `Warn`. Arguments are
/// converted with [`Loggable`](crate::Loggable), so only supported types
/// compile. The renderer for the format string is picked at compile time,
/// and the whole call disappears when the severity is excluded by a
/// `max_level_*` feature. Arguments are not evaluated when the runtime
/// threshold filters the message out.
///
/// # Examples
///
/// ```
/// # use vt100_logger::vt_log;
/// vt_log!(Warn, "temp=%d", 87);
/// vt_log!(Info, "mask=%b name=%s", 42u32, "pump");
/// vt_log!(Debug, "no arguments");
/// ```
#[macro_export]
macro_rules! vt_log {
    ($level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        if $crate::Severity::$level.compiled_in() {
            let logger = $crate::global::logger();
            if logger.is_enabled($crate::Severity::$level) {
                const INFO: $crate::dispatch::FormatInfo = $crate::const_format!($fmt);
                logger.write_with_info(
                    $crate::Severity::$level,
                    &INFO,
                    &[$($crate::Loggable::to_arg(&$arg)),*],
                );
            }
        }
    }};
}

/// Logs at `Trace` through the global logger. See [`vt_log!`].
#[macro_export]
macro_rules! log_trace {
    ($($t:tt)*) => { $crate::vt_log!(Trace, $($t)*) };
}

/// Logs at `Debug` through the global logger. See [`vt_log!`].
#[macro_export]
macro_rules! log_debug {
    ($($t:tt)*) => { $crate::vt_log!(Debug, $($t)*) };
}

/// Logs at `Info` through the global logger. See [`vt_log!`].
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => { $crate::vt_log!(Info, $($t)*) };
}

/// Logs at `Warn` through the global logger. See [`vt_log!`].
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => { $crate::vt_log!(Warn, $($t)*) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::Preemptive;

    fn memory_logger<const CAP: usize>(level: Severity) -> (Logger<CAP>, Arc<WriterSink<Vec<u8>>>) {
        let sink = Arc::new(WriterSink::new(Vec::new()));
        let logger = LoggerBuilder::new().threshold(level).sink(sink.clone()).build();
        (logger, sink)
    }

    fn contents(sink: &WriterSink<Vec<u8>>) -> String {
        sink.with_inner(|buf| String::from_utf8_lossy(buf).into_owned())
    }

    struct BrokenSink;

    impl LineSink for BrokenSink {
        fn write_line(&self, _line: &Line<'_>) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_line_layout() {
        let mut out = Vec::new();
        Line::new(Severity::Info, b"hello").write_to(&mut out).unwrap();
        assert_eq!(out, b"\x1b[32m[INFO ] hello\x1b[0m\n");
    }

    #[test]
    fn test_filter_below_threshold() {
        let (logger, sink) = memory_logger::<256>(Severity::Info);
        logger.write(Severity::Debug, "hidden %d", &[Arg::Int(1)]);
        logger.write(Severity::Trace, "hidden", &[]);
        assert_eq!(contents(&sink), "");

        logger.write(Severity::Info, "shown", &[]);
        assert_eq!(contents(&sink), "\x1b[32m[INFO ] shown\x1b[0m\n");
    }

    #[test]
    fn test_set_threshold() {
        let (logger, sink) = memory_logger::<256>(Severity::Warn);
        logger.write(Severity::Debug, "one", &[]);
        logger.set_threshold(Severity::Trace);
        assert_eq!(logger.threshold(), Severity::Trace);
        logger.write(Severity::Debug, "two", &[]);
        assert_eq!(contents(&sink), "\x1b[34m[DEBUG] two\x1b[0m\n");
    }

    #[test]
    fn test_small_capacity_truncates() {
        let (logger, sink) = memory_logger::<8>(Severity::Trace);
        logger.write(Severity::Trace, "0123456789", &[]);
        assert_eq!(contents(&sink), "\x1b[90m[TRACE] 0123456\x1b[0m\n");
    }

    #[test]
    fn test_write_args() {
        let (logger, sink) = memory_logger::<256>(Severity::Info);
        logger.write_args(Severity::Warn, format_args!("{} + {} = {}", 1, 2, 3));
        assert_eq!(contents(&sink), "\x1b[33m[WARN ] 1 + 2 = 3\x1b[0m\n");
    }

    #[test]
    fn test_sink_errors_are_counted() {
        let logger: Logger = Logger::new(BrokenSink);
        logger.write(Severity::Warn, "lost", &[]);
        logger.write(Severity::Warn, "lost again", &[]);
        logger.write(Severity::Trace, "filtered", &[]);
        assert_eq!(logger.dropped_writes(), 2);
    }

    #[test]
    fn test_serialized_lock_created_lazily() {
        let logger: Logger = LoggerBuilder::new()
            .sink(WriterSink::new(io::sink()))
            .serialized(Preemptive)
            .build();
        assert!(logger.is_serialized());
        logger.init_serialization();
        logger.write(Severity::Warn, "after init", &[]);
        assert_eq!(logger.dropped_writes(), 0);
    }

    #[test]
    fn test_builder_defaults() {
        let logger: Logger = LoggerBuilder::new().build();
        assert_eq!(logger.threshold(), DEFAULT_LEVEL);
        assert!(!logger.is_serialized());
    }
}
