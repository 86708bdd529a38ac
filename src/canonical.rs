//! Canonicalization of raw paths.
//!
//! A raw path is split on literal `'/'`. In every segment the matrix
//! parameter (from the first `';'`) is dropped and the remaining content
//! is percent-decoded. Segments that are *literally* `"."` or `".."` are then
//! resolved against the segments before them.
//!
//! A segment that only turns into `"."` or `".."` after decoding, or after
//! dropping its parameter, is never resolved. It is kept as path data and
//! reported through [`Ambiguity`], because a filter looking at the raw bytes
//! would not have seen a dot-segment there.

use crate::{
    error::{ParseError, ParseErrorKind},
    pct_enc::{Decode, DecodedChunk},
};
use std::{borrow::Cow, ops};

/// A set of reasons why a path is ambiguous.
///
/// An empty set means the decoded path is exactly what a scan of the raw
/// bytes would suggest.
///
/// # Examples
///
/// ```
/// use request_uri::{canonical, Ambiguity};
///
/// let path = canonical::canonicalize("/a/..;x/%2fb")?;
/// assert_eq!(path.as_str(), "/a/..//b");
/// assert_eq!(
///     path.ambiguity(),
///     Ambiguity::DOT_SEGMENT | Ambiguity::PATH_PARAMETER | Ambiguity::PATH_SEPARATOR
/// );
/// # Ok::<_, request_uri::ParseError>(())
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ambiguity(u8);

impl Ambiguity {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// A segment becomes `"."` or `".."` through percent-decoding (`%2e`)
    /// or through a matrix parameter (`..;x`).
    pub const DOT_SEGMENT: Self = Self(1);

    /// A percent-decoded `'/'` or `'\'` (`%2f`, `%5c`) within a segment.
    pub const PATH_SEPARATOR: Self = Self(1 << 1);

    /// A matrix parameter attached to a segment that decodes to `"."` or `".."`,
    /// or a percent-decoded `';'` (`%3b`) within a segment.
    pub const PATH_PARAMETER: Self = Self(1 << 2);

    /// A percent-decoded `'%'` (`%25`), which a second decoding pass would
    /// interpret again.
    pub const PATH_ENCODING: Self = Self(1 << 3);

    /// Every kind of ambiguity.
    pub const ALL: Self = Self(0b1111);

    pub(crate) const NAMES: [(Self, &'static str); 4] = [
        (Self::DOT_SEGMENT, "DOT_SEGMENT"),
        (Self::PATH_SEPARATOR, "PATH_SEPARATOR"),
        (Self::PATH_PARAMETER, "PATH_PARAMETER"),
        (Self::PATH_ENCODING, "PATH_ENCODING"),
    ];

    /// Returns the set of kinds in `self` or in `other`.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the set of kinds in both `self` and `other`.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns the set of kinds in `self` but not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Checks whether every kind in `other` is also in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Checks whether `self` and `other` share any kind.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Checks whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns an iterator over the single kinds contained in the set.
    pub fn iter(self) -> impl Iterator<Item = Ambiguity> {
        Self::NAMES
            .into_iter()
            .map(|(kind, _)| kind)
            .filter(move |&kind| self.contains(kind))
    }
}

impl ops::BitOr for Ambiguity {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl ops::BitOrAssign for Ambiguity {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl ops::BitAnd for Ambiguity {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

/// The canonical form of a raw path, along with its matrix parameter and ambiguity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalPath {
    decoded: String,
    param: Option<String>,
    ambiguity: Ambiguity,
}

impl CanonicalPath {
    /// Returns the decoded path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.decoded
    }

    /// Consumes this `CanonicalPath` and yields the decoded path.
    #[must_use]
    pub fn into_string(self) -> String {
        self.decoded
    }

    /// Returns the matrix parameter of the final raw segment.
    ///
    /// See [`param`] for details.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Returns the kinds of ambiguity found in the raw path.
    #[must_use]
    pub fn ambiguity(&self) -> Ambiguity {
        self.ambiguity
    }

    /// Checks whether any ambiguity was found in the raw path.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguity.is_empty()
    }
}

/// Canonicalizes a raw path.
///
/// The leading `'/'` is kept if the raw path has one. A trailing `'/'` is
/// kept if the last raw segment is empty or is itself a `"."` or `".."`.
///
/// # Errors
///
/// Returns `Err` on a `'%'` not followed by two hexadecimal digits within the
/// content of a segment, on decoded bytes that are not valid UTF-8, and on a
/// `".."` with no segment left to remove, whether the path is absolute or not.
/// The error index is relative to `path`.
///
/// # Examples
///
/// ```
/// use request_uri::canonical::canonicalize;
///
/// assert_eq!(canonicalize("/path/../info")?.as_str(), "/info");
/// assert_eq!(canonicalize("./path/info/.")?.as_str(), "path/info/");
///
/// let path = canonicalize("/f%30%30;p0/bar;p1;p2")?;
/// assert_eq!(path.as_str(), "/f00/bar");
/// assert_eq!(path.param(), Some("p2"));
///
/// assert!(canonicalize("/../path/info").is_err());
/// assert!(canonicalize("/path/%2/F/info").is_err());
/// # Ok::<_, request_uri::ParseError>(())
/// ```
pub fn canonicalize(path: &str) -> Result<CanonicalPath, ParseError> {
    let (absolute, body) = match path.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, path),
    };

    let mut resolved = Resolved {
        buf: String::with_capacity(path.len()),
        starts: Vec::new(),
    };
    let mut ambiguity = Ambiguity::EMPTY;

    let mut seg_start = usize::from(absolute);
    let mut segments = body.split('/').peekable();

    while let Some(seg) = segments.next() {
        let last = segments.peek().is_none();
        let (content, has_param) = match seg.find(';') {
            Some(i) => (&seg[..i], true),
            None => (seg, false),
        };

        match (content, has_param) {
            (".", false) => {
                if last {
                    resolved.push("");
                }
            }
            ("..", false) => {
                if !resolved.pop() {
                    trace!("'..' at index {seg_start} has nothing to remove in {path:?}");
                    return Err(ParseError::new(
                        seg_start,
                        ParseErrorKind::IllegalParentTraversal,
                    ));
                }
                if last {
                    resolved.push("");
                }
            }
            _ => {
                let decoded = decode_segment(content, seg_start, &mut ambiguity)?;
                if matches!(&*decoded, "." | "..") {
                    ambiguity |= Ambiguity::DOT_SEGMENT;
                    if has_param {
                        ambiguity |= Ambiguity::PATH_PARAMETER;
                    }
                }
                resolved.push(&decoded);
            }
        }

        // INVARIANT: Every segment but the last is followed by '/'.
        seg_start += seg.len() + 1;
    }

    let mut decoded = resolved.buf;
    if absolute {
        decoded.insert(0, '/');
    }
    Ok(CanonicalPath {
        decoded,
        param: param(path).map(str::to_owned),
        ambiguity,
    })
}

/// Decoded segments joined by `'/'`, with the start offset of each.
struct Resolved {
    buf: String,
    starts: Vec<usize>,
}

impl Resolved {
    fn push(&mut self, seg: &str) {
        if !self.starts.is_empty() {
            self.buf.push('/');
        }
        self.starts.push(self.buf.len());
        self.buf.push_str(seg);
    }

    fn pop(&mut self) -> bool {
        match self.starts.pop() {
            Some(start) => {
                // Also removes the separator before the segment, if any.
                self.buf.truncate(start.saturating_sub(1));
                true
            }
            None => false,
        }
    }
}

fn decode_segment<'a>(
    content: &'a str,
    offset: usize,
    ambiguity: &mut Ambiguity,
) -> Result<Cow<'a, str>, ParseError> {
    if !content.contains('%') {
        return Ok(Cow::Borrowed(content));
    }

    let mut bytes = Vec::with_capacity(content.len());
    for chunk in Decode::new(content) {
        match chunk {
            Ok(DecodedChunk::Unencoded(s)) => bytes.extend_from_slice(s.as_bytes()),
            Ok(DecodedChunk::PctDecoded(x)) => {
                match x {
                    b'/' | b'\\' => *ambiguity |= Ambiguity::PATH_SEPARATOR,
                    b'%' => *ambiguity |= Ambiguity::PATH_ENCODING,
                    b';' => *ambiguity |= Ambiguity::PATH_PARAMETER,
                    _ => {}
                }
                bytes.push(x);
            }
            Err(i) => {
                return Err(ParseError::new(
                    offset + i,
                    ParseErrorKind::MalformedPercentEscape,
                ))
            }
        }
    }

    String::from_utf8(bytes)
        .map(Cow::Owned)
        .map_err(|_| ParseError::new(offset, ParseErrorKind::InvalidUtf8))
}

/// Returns the index of the `';'` starting the matrix parameter of the final segment.
pub(crate) fn find_param(path: &[u8]) -> Option<usize> {
    let seg_start = path.iter().rposition(|&x| x == b'/').map_or(0, |i| i + 1);
    path[seg_start..]
        .iter()
        .rposition(|&x| x == b';')
        .map(|i| seg_start + i)
}

/// Returns the matrix parameter of the final segment of a raw path.
///
/// The parameter is the text after the *last* `';'` of the final segment.
/// Parameters of other segments are not considered.
///
/// # Examples
///
/// ```
/// use request_uri::canonical::param;
///
/// assert_eq!(param("/foo;abc=123/bar;jsessionid=12345"), Some("jsessionid=12345"));
/// assert_eq!(param("/foo/bar;p1;p2"), Some("p2"));
/// assert_eq!(param("/foo;abc=123/bar"), None);
/// ```
#[must_use]
pub fn param(path: &str) -> Option<&str> {
    find_param(path.as_bytes()).map(|i| &path[i + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(path: &str) -> String {
        canonicalize(path).unwrap().into_string()
    }

    #[test]
    fn resolve() {
        assert_eq!(decoded(""), "");
        assert_eq!(decoded("/"), "/");
        assert_eq!(decoded("."), "");
        assert_eq!(decoded("/."), "/");
        assert_eq!(decoded("/path/.."), "/");
        assert_eq!(decoded("/a/b/../../c"), "/c");
        assert_eq!(decoded("/a//b"), "/a//b");
        assert_eq!(decoded("//a"), "//a");
        assert_eq!(decoded("/a//.."), "/a/");
        assert_eq!(decoded("/a/./../b"), "/b");
        assert_eq!(decoded("/path/info/./"), "/path/info/");
        assert_eq!(decoded("path/../info"), "info");
    }

    #[test]
    fn separator_is_not_resolved_across() {
        // The decoded separator belongs to a single segment.
        assert_eq!(decoded("/a%2Fb/../c"), "/c");
    }

    #[test]
    fn traversal_error_index() {
        let e = canonicalize("/a/../../b").unwrap_err();
        assert_eq!(e, ParseError::new(6, ParseErrorKind::IllegalParentTraversal));

        let e = canonicalize("..").unwrap_err();
        assert_eq!(e, ParseError::new(0, ParseErrorKind::IllegalParentTraversal));
    }

    #[test]
    fn escape_error_index() {
        let e = canonicalize("/path/%XX/info").unwrap_err();
        assert_eq!(e, ParseError::new(6, ParseErrorKind::MalformedPercentEscape));
    }

    #[test]
    fn invalid_utf8() {
        let e = canonicalize("/ok/%C0%AF").unwrap_err();
        assert_eq!(e, ParseError::new(4, ParseErrorKind::InvalidUtf8));
    }

    #[test]
    fn encoding_ambiguity() {
        let path = canonicalize("/a%2541").unwrap();
        assert_eq!(path.as_str(), "/a%41");
        assert_eq!(path.ambiguity(), Ambiguity::PATH_ENCODING);

        let path = canonicalize("/a%5cb").unwrap();
        assert_eq!(path.as_str(), "/a\\b");
        assert_eq!(path.ambiguity(), Ambiguity::PATH_SEPARATOR);
    }

    #[test]
    fn interior_params_are_not_decoded() {
        assert_eq!(decoded("/a;%zz/b"), "/a/b");
    }

    #[test]
    fn ambiguity_set() {
        let all = Ambiguity::ALL;
        assert_eq!(all.iter().count(), 4);
        assert!(all.contains(Ambiguity::DOT_SEGMENT | Ambiguity::PATH_ENCODING));
        assert!(Ambiguity::EMPTY.is_empty());
        assert!(!Ambiguity::DOT_SEGMENT.intersects(Ambiguity::PATH_SEPARATOR));
        assert_eq!(
            all.difference(Ambiguity::PATH_SEPARATOR),
            Ambiguity::DOT_SEGMENT | Ambiguity::PATH_PARAMETER | Ambiguity::PATH_ENCODING
        );
    }

    #[test]
    fn find_param_in_final_segment() {
        assert_eq!(find_param(b"/a;x/b"), None);
        assert_eq!(find_param(b"/a;x/b;y"), Some(6));
        assert_eq!(find_param(b";"), Some(0));
        assert_eq!(param("/a/b;"), Some(""));
    }
}
