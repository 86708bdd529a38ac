//! Byte tables used when scanning and re-encoding URI components.
//!
//! Bytes outside the ASCII range are never allowed by a table.

/// A set of ASCII bytes, stored as a 128-bit mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table(u64, u64);

impl Table {
    /// Creates a table that only allows the given bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not ASCII or equals `b'%'`.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut mask = 0u128;
        while let [cur, rem @ ..] = bytes {
            assert!(
                !matches!(cur, b'%' | 128..),
                "cannot allow non-ASCII byte or %"
            );
            mask |= 1 << *cur;
            bytes = rem;
        }
        Self(mask as u64, (mask >> 64) as u64)
    }

    /// Returns a table allowing the bytes allowed by `self` or by `other`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    /// Returns a table allowing the bytes allowed by `self` but not by `other`.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self(self.0 & !other.0, self.1 & !other.1)
    }

    /// Checks whether the given byte is allowed.
    #[inline]
    #[must_use]
    pub const fn allows(self, x: u8) -> bool {
        match x {
            0..=63 => self.0 & (1 << x) != 0,
            64..=127 => self.1 & (1 << (x - 64)) != 0,
            _ => false,
        }
    }

    /// Checks whether every byte of `s` is allowed.
    #[must_use]
    pub const fn validate(self, s: &[u8]) -> bool {
        let mut i = 0;
        while i < s.len() {
            if !self.allows(s[i]) {
                return false;
            }
            i += 1;
        }
        true
    }
}

const ALPHA: Table = Table::new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub const DIGIT: Table = Table::new(b"0123456789");

/// Bytes after the first letter of a scheme: `ALPHA / DIGIT / "+" / "-" / "."`.
pub const SCHEME: Table = ALPHA.or(DIGIT).or(Table::new(b"+-."));

/// `pchar` of RFC 3986 without `pct-encoded`:
/// `ALPHA / DIGIT / "-" / "." / "_" / "~" / "!" / "$" / "&" / "'" / "(" / ")"
/// / "*" / "+" / "," / ";" / "=" / ":" / "@"`.
pub const PCHAR: Table = ALPHA
    .or(DIGIT)
    .or(Table::new(b"-._~"))
    .or(Table::new(b"!$&'()*+,;="))
    .or(Table::new(b":@"));

/// Bytes left unencoded when a decoded path is turned back into a raw one.
///
/// `PCHAR / "/"`, except `";"`, which would start a matrix parameter.
pub const PATH_SAFE: Table = PCHAR.or(Table::new(b"/")).sub(Table::new(b";"));
