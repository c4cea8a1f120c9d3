//! # VT100 Logger
//!
//! A small leveled logger for constrained targets that renders printf-style
//! format strings into colorized terminal lines:
//!
//! * **No allocation**: every message is formatted into a fixed stack buffer
//!   and cut (never overflowed) when it does not fit
//! * **Binary output**: `%b` prints an integer in base 2, next to the usual
//!   `%d %i %u %x %X %c %s %p %%`
//! * **Typed arguments**: arguments are checked against [`Loggable`] at the
//!   call site instead of being trusted as raw varargs
//! * **Optional serialization**: sink writes can be guarded by a lazily
//!   created lock so concurrent callers never interleave lines
//!
//! ## Main Components
//!
//! * `appender`: bounded byte appends, the only code that writes message bytes
//! * `numeric`: decimal, hexadecimal and binary converters
//! * `format`: the format interpreter and the faster standard renderer
//! * `dispatch`: picks a renderer by looking for `%b`, at compile time in macros
//! * `vt_logger`: `Logger`, threshold filtering, colors, sinks and macros
//! * `serial`: the serialization lock and scheduler probes
//! * `global` / `log_bridge`: the process-wide logger and the `log` facade
//!
//! ## Quick Start
//!
//! ```
//! use vt100_logger::{log_info, log_warn, set_level, Severity};
//!
//! set_level(Severity::Info);
//!
//! log_warn!("temp=%d", 87);          // "[WARN ] temp=87" in yellow
//! log_info!("mask=%b", 42u32);       // "[INFO ] mask=101010" in green
//! log_info!("id=%p", 0xAB as *const u8);
//! ```
//!
//! ## Build-time level limit
//!
//! The `max_level_off`, `max_level_warn`, `max_level_info` and
//! `max_level_debug` features remove macro call sites below that level from
//! the binary. Without them every level is compiled in and only the runtime
//! threshold (initially `Info`) applies. Trace and debug call sites therefore
//! stay in the binary by default; enable `max_level_info` to drop them at
//! build time.

pub mod appender;
pub mod dispatch;
pub mod format;
pub mod global;
pub mod level;
pub mod log_bridge;
pub mod loggable;
pub mod numeric;
pub mod serial;
pub mod vt_logger;

pub use dispatch::FormatInfo;
pub use global::{init_thread_safety, level, log_write, logger, set_level};
pub use level::{ParseSeverityError, Severity, DEFAULT_LEVEL, STATIC_MAX_LEVEL};
pub use log_bridge::init_log_bridge;
pub use loggable::{Arg, Loggable};
pub use vt_logger::{Line, LineSink, Logger, LoggerBuilder, StdoutSink, WriterSink};
