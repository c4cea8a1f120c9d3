//! Bounded, truncating writes into a fixed-capacity byte buffer.
//!
//! Every byte that ends up in a formatted log message passes through
//! [`Appender::push`]. A write happens only while there is room for the byte
//! *and* the trailing NUL terminator, so the buffer can never overflow.
//! Running out of room is not an error: excess output is silently dropped.

use std::fmt;

/// Placeholder emitted for a missing (`None`) string argument.
pub const NULL_STR: &str = "(null)";

/// Default capacity of a formatted message, terminator included.
pub const MESSAGE_CAPACITY: usize = 256;

/// A write cursor over a borrowed byte buffer.
///
/// The capacity is the length of the borrowed slice. The cursor only moves
/// forward and always satisfies `idx + 1 <= capacity` (for non-empty
/// buffers), keeping the last slot free for the terminator.
///
/// # Examples
///
/// ```
/// # use vt100_logger::appender::Appender;
/// let mut buf = [0u8; 4];
/// let mut out = Appender::new(&mut buf);
/// out.push_str(Some("hello"));
/// let len = out.finish();
/// assert_eq!(len, 3);
/// assert_eq!(&buf, b"hel\0");
/// ```
pub struct Appender<'a> {
    buf: &'a mut [u8],
    idx: usize,
}

impl<'a> Appender<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, idx: 0 }
    }

    /// Appends one byte if there is room for it and the terminator.
    #[inline(always)]
    pub fn push(&mut self, unit: u8) {
        if self.idx + 1 < self.buf.len() {
            self.buf[self.idx] = unit;
            self.idx += 1;
        }
    }

    /// Appends a byte run. Same truncation rule as [`push`](Self::push),
    /// applied to the whole slice in one copy.
    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let room = self.remaining();
        let n = bytes.len().min(room);
        self.buf[self.idx..self.idx + n].copy_from_slice(&bytes[..n]);
        self.idx += n;
    }

    /// Appends a string, substituting [`NULL_STR`] for `None`.
    pub fn push_str(&mut self, s: Option<&str>) {
        for &unit in s.unwrap_or(NULL_STR).as_bytes() {
            self.push(unit);
        }
    }

    /// Number of bytes that can still be appended before truncation starts.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.idx + 1)
    }

    /// Current write index (length of the content written so far).
    #[inline]
    pub fn len(&self) -> usize {
        self.idx
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Writes the NUL terminator and returns the content length.
    ///
    /// The terminator goes at the cursor, or at the last slot if the cursor
    /// somehow sits past it. A zero-capacity buffer is left untouched.
    pub fn finish(self) -> usize {
        let size = self.buf.len();
        if size > 0 {
            let at = if self.idx < size { self.idx } else { size - 1 };
            self.buf[at] = 0;
            at
        } else {
            0
        }
    }
}

impl fmt::Write for Appender<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        // Truncation is not a formatting error.
        Ok(())
    }
}

/// A stack-allocated message buffer of `CAP` bytes.
///
/// This is the per-call scratch space of the log writer. It is created on the
/// stack, filled by one format operation and dropped after the sink write.
pub struct MessageBuffer<const CAP: usize = MESSAGE_CAPACITY> {
    buf: [u8; CAP],
    len: usize,
}

impl<const CAP: usize> MessageBuffer<CAP> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            buf: [0u8; CAP],
            len: 0,
        }
    }

    /// Runs `fill` against a fresh appender over the whole buffer and
    /// records the resulting length. Any previous content is replaced.
    pub fn fill_with(&mut self, fill: impl FnOnce(&mut Appender<'_>)) -> usize {
        let mut out = Appender::new(&mut self.buf);
        fill(&mut out);
        self.len = out.finish();
        self.len
    }

    /// The formatted message, without the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The formatted message including its terminator (if `CAP > 0`).
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..(self.len + 1).min(CAP)]
    }

    /// The message as text. Truncation can split a multi-byte character, in
    /// which case the valid prefix is returned.
    pub fn as_str(&self) -> &str {
        match std::str::from_utf8(self.as_bytes()) {
            Ok(s) => s,
            Err(e) => {
                // valid_up_to() marks a char boundary
                std::str::from_utf8(&self.as_bytes()[..e.valid_up_to()]).unwrap_or("")
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const CAP: usize> Default for MessageBuffer<CAP> {
    fn default() -> Self {
        Self::new()
    }
}
