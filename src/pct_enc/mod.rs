//! Percent-encoding utilities.

pub mod table;

pub use table::Table;

use std::{iter::FusedIterator, str};

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

pub(crate) const fn is_hexdig(x: u8) -> bool {
    OCTET_TABLE_LO[x as usize] != 0xff
}

pub(crate) const fn is_hexdig_pair(hi: u8, lo: u8) -> bool {
    is_hexdig(hi) && is_hexdig(lo)
}

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

/// An iterator used to decode a percent-encoded string slice.
///
/// Unlike a decoder for pre-validated input, `Decode` checks every escape
/// as it goes and yields `Err` with the index of an offending `%`,
/// after which the iterator is exhausted.
///
/// # Examples
///
/// ```
/// use request_uri::pct_enc::{Decode, DecodedChunk};
///
/// let mut chunks = Decode::new("a%2Fb");
/// assert_eq!(chunks.next(), Some(Ok(DecodedChunk::Unencoded("a"))));
/// assert_eq!(chunks.next(), Some(Ok(DecodedChunk::PctDecoded(b'/'))));
/// assert_eq!(chunks.next(), Some(Ok(DecodedChunk::Unencoded("b"))));
/// assert_eq!(chunks.next(), None);
///
/// let mut chunks = Decode::new("%2");
/// assert_eq!(chunks.next(), Some(Err(0)));
/// assert_eq!(chunks.next(), None);
/// ```
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
    pos: usize,
}

/// An item returned by the [`Decode`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedChunk<'a> {
    /// An unencoded subslice.
    Unencoded(&'a str),
    /// A percent-encoded octet, decoded (for example, `"%20"` decoded as `0x20`).
    PctDecoded(u8),
}

impl<'a> Decode<'a> {
    /// Creates a decoder over the given string slice.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn next_if_unencoded(&mut self) -> Option<&'a str> {
        let i = self
            .source
            .bytes()
            .position(|x| x == b'%')
            .unwrap_or(self.source.len());

        if i == 0 {
            None
        } else {
            let s;
            (s, self.source) = self.source.split_at(i);
            self.pos += i;
            Some(s)
        }
    }
}

impl<'a> Iterator for Decode<'a> {
    type Item = Result<DecodedChunk<'a>, usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.source.is_empty() {
            return None;
        }
        if let Some(s) = self.next_if_unencoded() {
            return Some(Ok(DecodedChunk::Unencoded(s)));
        }
        match *self.source.as_bytes() {
            [b'%', hi, lo, ..] if is_hexdig_pair(hi, lo) => {
                self.source = &self.source[3..];
                self.pos += 3;
                Some(Ok(DecodedChunk::PctDecoded(decode_octet(hi, lo))))
            }
            _ => {
                self.source = "";
                Some(Err(self.pos))
            }
        }
    }
}

impl FusedIterator for Decode<'_> {}

pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Percent-encodes every byte of `s` not allowed by `table` and appends the result to `buf`.
///
/// # Examples
///
/// ```
/// use request_uri::pct_enc::{encode_to, table::PATH_SAFE};
///
/// let mut buf = String::new();
/// encode_to(&mut buf, "/some encoded/100%;x", PATH_SAFE);
/// assert_eq!(buf, "/some%20encoded/100%25%3Bx");
/// ```
pub fn encode_to(buf: &mut String, s: &str, table: Table) {
    let mut rem = s;
    while !rem.is_empty() {
        let i = rem
            .bytes()
            .position(|x| !table.allows(x))
            .unwrap_or(rem.len());
        buf.push_str(&rem[..i]);

        let j = rem[i..]
            .bytes()
            .position(|x| table.allows(x))
            .map_or(rem.len(), |j| i + j);
        for &x in &rem.as_bytes()[i..j] {
            buf.push_str(encode_byte(x));
        }
        rem = &rem[j..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_truncated_escapes() {
        let chunks: Vec<_> = Decode::new("ab%4").collect();
        assert_eq!(chunks, [Ok(DecodedChunk::Unencoded("ab")), Err(2)]);

        let chunks: Vec<_> = Decode::new("%zz").collect();
        assert_eq!(chunks, [Err(0)]);

        let chunks: Vec<_> = Decode::new("%41%").collect();
        assert_eq!(chunks, [Ok(DecodedChunk::PctDecoded(b'A')), Err(3)]);
    }

    #[test]
    fn encode_non_ascii() {
        let mut buf = String::new();
        encode_to(&mut buf, "/\u{3b1}\u{3b2}", table::PATH_SAFE);
        assert_eq!(buf, "/%CE%B1%CE%B2");
    }

    #[test]
    fn hexdig() {
        assert!(is_hexdig_pair(b'2', b'f'));
        assert!(is_hexdig_pair(b'A', b'0'));
        assert!(!is_hexdig_pair(b'2', b'/'));
        assert!(!is_hexdig(b'g'));
    }
}
