//! Integer-to-text converters used by the format interpreter.
//!
//! Digits are produced least significant first into a small stack scratch
//! array and then replayed most significant first through the [`Appender`],
//! so truncation rules are applied uniformly. Nothing here allocates.

use crate::appender::Appender;

/// Scratch space for one converted number. Large enough for a 64-bit value
/// in hexadecimal and a 32-bit value in decimal.
const SCRATCH_LEN: usize = 16;

const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";
const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Number of bits rendered by [`append_binary`].
pub const BINARY_WIDTH: u32 = u32::BITS;

#[inline]
fn replay(out: &mut Appender<'_>, scratch: &[u8; SCRATCH_LEN], mut t: usize) {
    while t > 0 {
        t -= 1;
        out.push(scratch[t]);
    }
}

/// Appends `v` in unsigned decimal.
pub fn append_uint(out: &mut Appender<'_>, mut v: u32) {
    let mut scratch = [0u8; SCRATCH_LEN];
    let mut t = 0;

    if v == 0 {
        scratch[t] = b'0';
        t += 1;
    } else {
        while v > 0 && t < SCRATCH_LEN {
            scratch[t] = b'0' + (v % 10) as u8;
            t += 1;
            v /= 10;
        }
    }

    replay(out, &scratch, t);
}

/// Appends `v` in signed decimal.
///
/// Negative values get a leading `-` followed by the magnitude. The
/// magnitude is taken with a wrapping negation, so `i32::MIN` is not given
/// any special treatment; it is a known boundary of this converter.
pub fn append_int(out: &mut Appender<'_>, v: i32) {
    if v < 0 {
        out.push(b'-');
        append_uint(out, v.wrapping_neg() as u32);
    } else {
        append_uint(out, v as u32);
    }
}

/// Appends `v` in hexadecimal without any prefix, using upper or lower case
/// digits.
pub fn append_hex(out: &mut Appender<'_>, mut v: u64, upper: bool) {
    let digits = if upper { HEX_UPPER } else { HEX_LOWER };
    let mut scratch = [0u8; SCRATCH_LEN];
    let mut t = 0;

    if v == 0 {
        scratch[t] = b'0';
        t += 1;
    } else {
        while v > 0 && t < SCRATCH_LEN {
            scratch[t] = digits[(v & 0xF) as usize];
            t += 1;
            v >>= 4;
        }
    }

    replay(out, &scratch, t);
}

/// Appends `value` in base 2 with leading zeros suppressed.
///
/// Bits are walked from bit 31 down to bit 0. Nothing is emitted until the
/// first set bit; after that every bit is emitted. Zero renders as `"0"`.
pub fn append_binary(out: &mut Appender<'_>, value: u32) {
    let mut started = false;

    for i in (0..BINARY_WIDTH).rev() {
        if (value >> i) & 1 == 1 {
            started = true;
            out.push(b'1');
        } else if started {
            out.push(b'0');
        }
    }

    if !started {
        out.push(b'0');
    }
}
