//! The printf-style mini-language.
//!
//! Supported conversions: `%% %c %s %d %i %u %x %X %p %b`. Any other code is
//! copied through as `%` followed by the code byte. Field width, precision,
//! length modifiers and floating point are not supported; they fall into the
//! unknown-code path.
//!
//! Two renderers live here and produce the same bytes for the same input:
//!
//! * [`format_extended`] is a byte-at-a-time state machine that renders
//!   numbers with the converters in [`crate::numeric`]. It is the only path
//!   that is required to understand `%b`.
//! * [`format_standard`] copies literal runs in bulk and renders numbers with
//!   `core::fmt`. It is the faster path taken when the format string has no
//!   `%b` (see [`crate::dispatch`]).

use std::fmt::Write;
use std::slice;

use crate::appender::{Appender, NULL_STR};
use crate::dispatch::{route_of, Route};
use crate::loggable::Arg;
use crate::numeric::{append_binary, append_hex, append_int, append_uint};

/// A recognized conversion code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Percent,
    Char,
    Str,
    Signed,
    Unsigned,
    Hex { upper: bool },
    Pointer,
    Binary,
}

impl Conversion {
    /// Maps the byte following a `%` to its conversion, if it is one.
    pub const fn from_code(code: u8) -> Option<Conversion> {
        match code {
            b'%' => Some(Conversion::Percent),
            b'c' => Some(Conversion::Char),
            b's' => Some(Conversion::Str),
            b'd' | b'i' => Some(Conversion::Signed),
            b'u' => Some(Conversion::Unsigned),
            b'x' => Some(Conversion::Hex { upper: false }),
            b'X' => Some(Conversion::Hex { upper: true }),
            b'p' => Some(Conversion::Pointer),
            b'b' => Some(Conversion::Binary),
            _ => None,
        }
    }

    #[inline]
    fn takes_argument(self) -> bool {
        !matches!(self, Conversion::Percent)
    }
}

/// A conversion paired with an argument of a compatible kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value<'a> {
    Percent,
    Char(char),
    Byte(u8),
    Str(Option<&'a str>),
    Signed(i32),
    Unsigned(u32),
    Hex(u32, bool),
    Pointer(usize),
    Binary(u32),
}

/// Consumes the next argument (if the conversion needs one) and checks it
/// against the conversion. `None` means the specifier is emitted verbatim.
fn resolve<'a>(conv: Conversion, args: &mut slice::Iter<'_, Arg<'a>>) -> Option<Value<'a>> {
    if !conv.takes_argument() {
        return Some(Value::Percent);
    }
    let arg = *args.next()?;
    match conv {
        Conversion::Percent => Some(Value::Percent),
        Conversion::Char => match arg {
            Arg::Char(c) => Some(Value::Char(c)),
            other => other.as_bits().map(|bits| Value::Byte(bits as u8)),
        },
        Conversion::Str => arg.as_str().map(Value::Str),
        Conversion::Signed => arg.as_bits().map(|bits| Value::Signed(bits as i32)),
        Conversion::Unsigned => arg.as_bits().map(Value::Unsigned),
        Conversion::Hex { upper } => arg.as_bits().map(|bits| Value::Hex(bits, upper)),
        Conversion::Pointer => arg.as_address().map(Value::Pointer),
        Conversion::Binary => arg.as_bits().map(Value::Binary),
    }
}

#[inline]
fn passthrough(out: &mut Appender<'_>, code: u8) {
    out.push(b'%');
    out.push(code);
}

/// Handles the byte after a `%` for both renderers.
#[inline]
fn convert<'a>(
    out: &mut Appender<'_>,
    code: u8,
    args: &mut slice::Iter<'_, Arg<'a>>,
    render: fn(&mut Appender<'_>, Value<'a>),
) {
    match Conversion::from_code(code) {
        Some(conv) => match resolve(conv, args) {
            Some(value) => render(out, value),
            None => passthrough(out, code),
        },
        None => passthrough(out, code),
    }
}

fn render_with_converters(out: &mut Appender<'_>, value: Value<'_>) {
    match value {
        Value::Percent => out.push(b'%'),
        Value::Char(c) => {
            let mut utf8 = [0u8; 4];
            for &unit in c.encode_utf8(&mut utf8).as_bytes() {
                out.push(unit);
            }
        }
        Value::Byte(b) => out.push(b),
        Value::Str(s) => out.push_str(s),
        Value::Signed(v) => append_int(out, v),
        Value::Unsigned(v) => append_uint(out, v),
        Value::Hex(v, upper) => append_hex(out, v as u64, upper),
        Value::Pointer(p) => {
            out.push_str(Some("0x"));
            append_hex(out, p as u64, false);
        }
        Value::Binary(v) => append_binary(out, v),
    }
}

fn render_with_core_fmt(out: &mut Appender<'_>, value: Value<'_>) {
    // Appender::write_str never fails, so the fmt::Results below are always Ok.
    let _ = match value {
        Value::Percent => {
            out.push(b'%');
            Ok(())
        }
        Value::Char(c) => out.write_char(c),
        Value::Byte(b) => {
            out.push(b);
            Ok(())
        }
        Value::Str(s) => {
            out.push_bytes(s.unwrap_or(NULL_STR).as_bytes());
            Ok(())
        }
        Value::Signed(v) => write!(out, "{}", v),
        Value::Unsigned(v) => write!(out, "{}", v),
        Value::Hex(v, false) => write!(out, "{:x}", v),
        Value::Hex(v, true) => write!(out, "{:X}", v),
        Value::Pointer(p) => write!(out, "0x{:x}", p),
        Value::Binary(v) => write!(out, "{:b}", v),
    };
}

#[derive(Clone, Copy)]
enum State {
    Literal,
    Specifier,
}

/// Formats `format` with `args` using the byte-level interpreter.
///
/// Every byte goes through [`Appender::push`], so output is truncated at the
/// appender's capacity. A `%` at the very end of the format is emitted as a
/// literal `%`. Arguments left over after the last specifier are ignored.
///
/// # Examples
///
/// ```
/// # use vt100_logger::appender::MessageBuffer;
/// # use vt100_logger::format::format_extended;
/// # use vt100_logger::loggable::Arg;
/// let mut msg = MessageBuffer::<32>::new();
/// msg.fill_with(|out| format_extended(out, "mask=%b", &[Arg::Uint(42)]));
/// assert_eq!(msg.as_str(), "mask=101010");
/// ```
pub fn format_extended(out: &mut Appender<'_>, format: &str, args: &[Arg<'_>]) {
    let mut args = args.iter();
    let mut state = State::Literal;

    for &unit in format.as_bytes() {
        match state {
            State::Literal => {
                if unit == b'%' {
                    state = State::Specifier;
                } else {
                    out.push(unit);
                }
            }
            State::Specifier => {
                convert(out, unit, &mut args, render_with_converters);
                state = State::Literal;
            }
        }
    }

    if let State::Specifier = state {
        out.push(b'%');
    }
}

/// Formats `format` with `args`, copying literal text in bulk and rendering
/// conversions with `core::fmt`.
///
/// Produces exactly the bytes [`format_extended`] produces for the same
/// input, `%b` included.
pub fn format_standard(out: &mut Appender<'_>, format: &str, args: &[Arg<'_>]) {
    let bytes = format.as_bytes();
    let mut args = args.iter();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];
        let Some(off) = rest.iter().position(|&b| b == b'%') else {
            out.push_bytes(rest);
            break;
        };
        out.push_bytes(&rest[..off]);

        let at = i + off;
        match bytes.get(at + 1) {
            Some(&code) => {
                convert(out, code, &mut args, render_with_core_fmt);
                i = at + 2;
            }
            None => {
                out.push(b'%');
                break;
            }
        }
    }
}

/// Formats with the renderer selected by `route`.
#[inline]
pub fn format_routed(out: &mut Appender<'_>, route: Route, format: &str, args: &[Arg<'_>]) {
    match route {
        Route::Standard => format_standard(out, format, args),
        Route::Extended => format_extended(out, format, args),
    }
}

/// Formats `format` with `args`, picking the renderer at runtime.
pub fn format_message(out: &mut Appender<'_>, format: &str, args: &[Arg<'_>]) {
    format_routed(out, route_of(format), format, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appender::MessageBuffer;

    fn both(format: &str, args: &[Arg<'_>]) -> (String, String) {
        let mut a = MessageBuffer::<128>::new();
        a.fill_with(|out| format_extended(out, format, args));
        let mut b = MessageBuffer::<128>::new();
        b.fill_with(|out| format_standard(out, format, args));
        (a.as_str().to_string(), b.as_str().to_string())
    }

    fn check(format: &str, args: &[Arg<'_>], expected: &str) {
        let (extended, standard) = both(format, args);
        assert_eq!(extended, expected, "extended path for {:?}", format);
        assert_eq!(standard, expected, "standard path for {:?}", format);
    }

    #[test]
    fn test_literal_text() {
        check("plain text", &[], "plain text");
        check("", &[], "");
    }

    #[test]
    fn test_each_conversion() {
        check("%d", &[Arg::Int(-42)], "-42");
        check("%i", &[Arg::Int(7)], "7");
        check("%u", &[Arg::Uint(4_000_000_000)], "4000000000");
        check("%x", &[Arg::Uint(0xBEEF)], "beef");
        check("%X", &[Arg::Uint(0xBEEF)], "BEEF");
        check("%c", &[Arg::Char('Z')], "Z");
        check("%s", &[Arg::Str(Some("hi"))], "hi");
        check("%s", &[Arg::Str(None)], "(null)");
        check("%p", &[Arg::Ptr(0xAB)], "0xab");
        check("%b", &[Arg::Uint(5)], "101");
        check("100%%", &[], "100%");
    }

    #[test]
    fn test_unknown_code_passthrough() {
        check("%q", &[], "%q");
        check("%5d", &[Arg::Int(1)], "%5d");
        check("%f", &[Arg::Int(1)], "%f");
    }

    #[test]
    fn test_trailing_percent() {
        check("50%", &[], "50%");
    }

    #[test]
    fn test_missing_and_mismatched_args() {
        check("a=%d b=%d", &[Arg::Int(1)], "a=1 b=%d");
        check("%d", &[Arg::Str(Some("x"))], "%d");
        check("%s", &[Arg::Int(3)], "%s");
        // The mismatched argument is consumed.
        check("%d %d", &[Arg::Str(Some("x")), Arg::Int(9)], "%d 9");
    }

    #[test]
    fn test_integer_reinterpretation() {
        check("%u", &[Arg::Int(-1)], "4294967295");
        check("%d", &[Arg::Uint(u32::MAX)], "-1");
        check("%c", &[Arg::Uint(65)], "A");
        check("%x", &[Arg::Char('A')], "41");
    }

    #[test]
    fn test_surplus_args_ignored() {
        check("only %d", &[Arg::Int(1), Arg::Int(2)], "only 1");
    }

    #[test]
    fn test_multibyte_char() {
        check("[%c]", &[Arg::Char('é')], "[é]");
    }

    #[test]
    fn test_format_message_dispatch() {
        let mut msg = MessageBuffer::<64>::new();
        msg.fill_with(|out| {
            format_message(out, "temp=%d flags=%b", &[Arg::Int(87), Arg::Uint(6)])
        });
        assert_eq!(msg.as_str(), "temp=87 flags=110");
    }

    #[test]
    fn test_truncation_matches() {
        let long = "x".repeat(300);
        let mut a = MessageBuffer::<256>::new();
        a.fill_with(|out| format_extended(out, &long, &[]));
        let mut b = MessageBuffer::<256>::new();
        b.fill_with(|out| format_standard(out, &long, &[]));
        assert_eq!(a.len(), 255);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes_with_nul().last(), Some(&0));
    }
}
