use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity, from most to least verbose.
///
/// The numeric values are part of the interface: filtering is a plain
/// comparison, and a message is emitted when its severity is greater than or
/// equal to the runtime threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
}

/// VT100 sequence that restores the terminal's default attributes.
pub const COLOR_RESET: &str = "\x1b[0m";

/// Threshold a freshly created logger starts with.
pub const DEFAULT_LEVEL: Severity = Severity::Info;

/// Most verbose severity compiled into the logging macros.
///
/// Selected with the `max_level_*` Cargo features. Call sites below this
/// level are removed by the compiler. `None` means every call site is
/// removed (`max_level_off`).
pub const STATIC_MAX_LEVEL: Option<Severity> = if cfg!(feature = "max_level_off") {
    None
} else if cfg!(feature = "max_level_warn") {
    Some(Severity::Warn)
} else if cfg!(feature = "max_level_info") {
    Some(Severity::Info)
} else if cfg!(feature = "max_level_debug") {
    Some(Severity::Debug)
} else {
    Some(Severity::Trace)
};

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
    ];

    /// Foreground color used for lines of this severity.
    #[inline]
    pub const fn color(self) -> &'static str {
        match self {
            Severity::Trace => "\x1b[90m",
            Severity::Debug => "\x1b[34m",
            Severity::Info => "\x1b[32m",
            Severity::Warn => "\x1b[33m",
        }
    }

    /// Line prefix, padded so messages line up in a column.
    #[inline]
    pub const fn prefix(self) -> &'static str {
        match self {
            Severity::Trace => "[TRACE] ",
            Severity::Debug => "[DEBUG] ",
            Severity::Info => "[INFO ] ",
            Severity::Warn => "[WARN ] ",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
        }
    }

    #[inline]
    pub const fn from_u8(raw: u8) -> Option<Severity> {
        match raw {
            0 => Some(Severity::Trace),
            1 => Some(Severity::Debug),
            2 => Some(Severity::Info),
            3 => Some(Severity::Warn),
            _ => None,
        }
    }

    /// Whether call sites at this severity survive [`STATIC_MAX_LEVEL`].
    #[inline(always)]
    pub const fn compiled_in(self) -> bool {
        match STATIC_MAX_LEVEL {
            Some(max) => self as u8 >= max as u8,
            None => false,
        }
    }

    /// Maps a `log` crate level onto the four severities. `Error` has no
    /// counterpart and is folded into `Warn`.
    pub const fn from_log_level(level: log::Level) -> Severity {
        match level {
            log::Level::Error | log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug => Severity::Debug,
            log::Level::Trace => Severity::Trace,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a string does not name a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError {
    input: String,
}

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid log level {:?} (expected trace, debug, info, warn or 0-3)",
            self.input
        )
    }
}

impl Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.to_ascii_lowercase().as_str() {
            "trace" | "0" => Some(Severity::Trace),
            "debug" | "1" => Some(Severity::Debug),
            "info" | "2" => Some(Severity::Info),
            "warn" | "warning" | "3" => Some(Severity::Warn),
            _ => None,
        };
        parsed.ok_or_else(|| ParseSeverityError {
            input: trimmed.to_string(),
        })
    }
}

/// The runtime severity threshold.
///
/// Reads and writes are relaxed atomic operations: a log call racing with
/// [`set`](Threshold::set) may see either value, which is acceptable because
/// filtering is advisory.
#[derive(Debug)]
pub struct Threshold(AtomicU8);

impl Threshold {
    pub const fn new(level: Severity) -> Self {
        Self(AtomicU8::new(level as u8))
    }

    #[inline]
    pub fn set(&self, level: Severity) {
        self.0.store(level as u8, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> Severity {
        // Only `set` stores, and it only stores valid discriminants.
        Severity::from_u8(self.0.load(Ordering::Relaxed)).unwrap_or(DEFAULT_LEVEL)
    }

    /// True if a message at `level` passes the filter.
    #[inline(always)]
    pub fn allows(&self, level: Severity) -> bool {
        level as u8 >= self.0.load(Ordering::Relaxed)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}
