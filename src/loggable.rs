/// A single typed argument consumed by a format specifier.
///
/// This replaces an untyped variadic argument list: every value carries its
/// kind, so the formatter can check it against the specifier instead of
/// reinterpreting raw memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// A character, for `%c`.
    Char(char),
    /// A string, for `%s`. `None` renders as `(null)`.
    Str(Option<&'a str>),
    /// A signed 32-bit integer, for `%d` / `%i`.
    Int(i32),
    /// An unsigned 32-bit integer, for `%u`, `%x`, `%X` and `%b`.
    Uint(u32),
    /// An address, for `%p`.
    Ptr(usize),
}

impl<'a> Arg<'a> {
    /// The 32-bit pattern of an integer-like argument.
    ///
    /// Integers of either signedness, characters and addresses all have one;
    /// strings do not. Wider values keep their low 32 bits.
    #[inline]
    pub fn as_bits(&self) -> Option<u32> {
        match *self {
            Arg::Int(v) => Some(v as u32),
            Arg::Uint(v) => Some(v),
            Arg::Char(c) => Some(c as u32),
            Arg::Ptr(p) => Some(p as u32),
            Arg::Str(_) => None,
        }
    }

    /// The argument as a platform-width address for `%p`.
    #[inline]
    pub fn as_address(&self) -> Option<usize> {
        match *self {
            Arg::Ptr(p) => Some(p),
            Arg::Int(v) => Some(v as u32 as usize),
            Arg::Uint(v) => Some(v as usize),
            Arg::Char(_) | Arg::Str(_) => None,
        }
    }

    /// The argument as a string for `%s`.
    #[inline]
    pub fn as_str(&self) -> Option<Option<&'a str>> {
        match *self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A trait for values that can be passed to the logging macros.
///
/// The macros call [`to_arg`](Loggable::to_arg) on every argument, so a type
/// that has no implementation is rejected at compile time.
pub trait Loggable {
    fn to_arg(&self) -> Arg<'_>;
}

macro_rules! loggable_as {
    ($variant:ident($target:ty): $($t:ty),*) => {
        $(
            impl Loggable for $t {
                #[inline]
                fn to_arg(&self) -> Arg<'_> {
                    Arg::$variant(*self as $target)
                }
            }
        )*
    };
}

// Wider integers keep their low 32 bits.
loggable_as!(Int(i32): i8, i16, i32, i64, isize);
loggable_as!(Uint(u32): u8, u16, u32, u64, usize);

impl Loggable for char {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Char(*self)
    }
}

impl Loggable for bool {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Uint(*self as u32)
    }
}

impl Loggable for str {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(Some(self))
    }
}

impl Loggable for String {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(Some(self.as_str()))
    }
}

impl Loggable for Option<&str> {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(*self)
    }
}

impl<T: ?Sized> Loggable for *const T {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Ptr(self.cast::<()>() as usize)
    }
}

impl<T: ?Sized> Loggable for *mut T {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Ptr(self.cast::<()>() as usize)
    }
}

impl<T: Loggable + ?Sized> Loggable for &T {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        (**self).to_arg()
    }
}

impl<'a> Loggable for Arg<'a> {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_args() {
        assert_eq!((-5i8).to_arg(), Arg::Int(-5));
        assert_eq!(42i32.to_arg(), Arg::Int(42));
        assert_eq!(200u8.to_arg(), Arg::Uint(200));
        assert_eq!(true.to_arg(), Arg::Uint(1));
    }

    #[test]
    fn test_wide_integers_keep_low_bits() {
        assert_eq!(7usize.to_arg(), Arg::Uint(7));
        assert_eq!(0x1_0000_002Au64.to_arg(), Arg::Uint(0x2A));
        assert_eq!((-3isize).to_arg(), Arg::Int(-3));
        assert_eq!((-1i64).to_arg(), Arg::Int(-1));
    }

    #[test]
    fn test_string_args() {
        let owned = String::from("owned");
        assert_eq!("lit".to_arg(), Arg::Str(Some("lit")));
        assert_eq!(owned.to_arg(), Arg::Str(Some("owned")));
        assert_eq!(None::<&str>.to_arg(), Arg::Str(None));
    }

    #[test]
    fn test_pointer_arg() {
        let p = 0xAB as *const u8;
        assert_eq!(p.to_arg(), Arg::Ptr(0xAB));
        assert_eq!(p.to_arg().as_address(), Some(0xAB));
    }

    #[test]
    fn test_bit_views() {
        assert_eq!(Arg::Int(-1).as_bits(), Some(u32::MAX));
        assert_eq!(Arg::Char('A').as_bits(), Some(65));
        assert_eq!(Arg::Str(Some("x")).as_bits(), None);
        assert_eq!(Arg::Uint(3).as_str(), None);
        assert_eq!(Arg::Str(None).as_str(), Some(None));
    }
}
