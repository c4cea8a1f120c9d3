/// Which renderer a format string is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No `%b`: bulk literal copies plus `core::fmt`.
    Standard,
    /// Contains `%b`: the byte-level interpreter.
    Extended,
}

/// Format string information, computed once per call site.
#[derive(Debug, Clone, Copy)]
pub struct FormatInfo {
    pub format_string: &'static str,
    pub route: Route,
}

impl FormatInfo {
    pub const fn new(format_string: &'static str) -> Self {
        Self {
            format_string,
            route: route_of(format_string),
        }
    }
}

/// Returns true if `s` contains the two bytes `%b` anywhere.
///
/// This is a plain scan: in `"%%b"` the second `%` followed by `b` counts.
/// Routing such a string to the interpreter is harmless because both
/// renderers agree on every input.
pub const fn has_binary_specifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'%' && bytes[i + 1] == b'b' {
            return true;
        }
        i += 1;
    }
    false
}

#[inline]
pub const fn route_of(s: &str) -> Route {
    if has_binary_specifier(s) {
        Route::Extended
    } else {
        Route::Standard
    }
}

/// Builds a [`FormatInfo`] for a format string literal at compile time.
#[macro_export]
macro_rules! const_format {
    ($fmt:expr) => {{
        const INFO: $crate::dispatch::FormatInfo = $crate::dispatch::FormatInfo::new($fmt);
        INFO
    }};
}
