use crate::canonical::Ambiguity;
use std::{error::Error, fmt};

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// An IPv6 literal without its closing `]`.
    ///
    /// The error index points to the opening `[`.
    UnterminatedIpv6Literal,
    /// An empty scheme, as in `":foo"`.
    ///
    /// The error index points to the colon.
    InvalidScheme,
    /// Input starting with `*` that is not exactly `"*"`.
    ///
    /// The error index points to the first character after the asterisk.
    InvalidAsteriskForm,
    /// A `%` not followed by two hexadecimal digits within a path segment.
    ///
    /// The error index points to the `%` within the raw path.
    MalformedPercentEscape,
    /// A `..` segment with no preceding segment to remove.
    ///
    /// The error index points to the start of the segment within the raw path.
    IllegalParentTraversal,
    /// A port that is empty, non-numeric or out of range.
    ///
    /// The error index points to the first byte after the host.
    InvalidPort,
    /// Percent-decoded bytes that do not form valid UTF-8.
    ///
    /// The error index points to the start of the segment within the raw path.
    InvalidUtf8,
}

/// An error occurred when parsing a URI or canonicalizing its path.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) const fn new(index: usize, kind: ParseErrorKind) -> Self {
        Self { index, kind }
    }

    /// Returns the index at which the error occurred.
    ///
    /// For errors reported by [`HttpUri::decoded_path`](crate::HttpUri::decoded_path)
    /// the index is relative to the raw path.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ParseErrorKind::UnterminatedIpv6Literal => "no closing ']' for IPv6 literal",
            ParseErrorKind::InvalidScheme => "empty scheme",
            ParseErrorKind::InvalidAsteriskForm => "only '*' is allowed as asterisk-form",
            ParseErrorKind::MalformedPercentEscape => "malformed percent-encoded octet",
            ParseErrorKind::IllegalParentTraversal => "'..' segment escapes the path root",
            ParseErrorKind::InvalidPort => "invalid port",
            ParseErrorKind::InvalidUtf8 => "percent-decoded segment is not valid UTF-8",
        };
        write!(f, "{msg} at index {}", self.index)
    }
}

impl Error for ParseError {}

/// An error occurred when freezing a [`Builder`](crate::Builder).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum BuildError {
    /// The scheme does not match `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
    InvalidScheme,
    /// The host is neither a bracketed IPv6 literal nor free of `':'`,
    /// `'@'`, `'['`, `']'`, `'/'`, `'?'` and `'#'`.
    InvalidHost,
    /// A component contains a delimiter that would end it early:
    /// `'/'`, `'?'`, `'#'`, `'['` or `']'` in the user-info, `'?'` or `'#'`
    /// in the path, or `'#'` in the query.
    UnexpectedDelimiter,
    /// User-info is present, but host is not.
    UserWithoutHost,
    /// Host is present, but the path is not empty and does not start with `'/'`.
    NonemptyRootlessPath,
    /// Host is not present, but the path starts with `"//"`.
    PathStartsWithDoubleSlash,
    /// Neither scheme nor host is present, but the first path segment contains `':'`.
    FirstPathSegmentContainsColon,
    /// Neither scheme nor host is present, and the path starts with `'*'`
    /// but the URI would not be exactly `"*"`.
    InvalidAsteriskForm,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidScheme => {
                "scheme should start with a letter followed by letters, digits, '+', '-' or '.'"
            }
            Self::InvalidHost => "host should be an IPv6 literal or contain no delimiter",
            Self::UnexpectedDelimiter => "component contains a delimiter that would end it early",
            Self::UserWithoutHost => "user-info cannot be set without a host",
            Self::NonemptyRootlessPath => {
                "when host is present, path should either be empty or start with '/'"
            }
            Self::PathStartsWithDoubleSlash => {
                "when host is not present, path should not start with \"//\""
            }
            Self::FirstPathSegmentContainsColon => {
                "when neither scheme nor host is present, first path segment should not contain ':'"
            }
            Self::InvalidAsteriskForm => {
                "when neither scheme nor host is present, a path starting with '*' should be the whole URI"
            }
        };
        f.write_str(msg)
    }
}

impl Error for BuildError {}

/// An error returned by [`UriCompliance::check`](crate::UriCompliance::check).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ComplianceError {
    /// The path is ambiguous in ways the policy does not allow.
    ///
    /// Contains only the disallowed kinds.
    Ambiguous(Ambiguity),
    /// The path could not be canonicalized.
    Undecodable(ParseError),
}

impl fmt::Display for ComplianceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambiguous(kinds) => write!(f, "ambiguous path: {kinds}"),
            Self::Undecodable(e) => write!(f, "undecodable path: {e}"),
        }
    }
}

impl Error for ComplianceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ambiguous(_) => None,
            Self::Undecodable(e) => Some(e),
        }
    }
}

impl From<ParseError> for ComplianceError {
    fn from(e: ParseError) -> Self {
        Self::Undecodable(e)
    }
}
