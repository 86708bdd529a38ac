use crate::{
    build::Builder,
    canonical::{self, Ambiguity, CanonicalPath},
    component::{Authority, Scheme},
    error::ParseError,
    parse::{self, Mode},
};
use borrow_or_share::{BorrowOrShare, Bos};
use std::{
    borrow::Borrow, cmp::Ordering, hash, num::NonZeroUsize, str::FromStr, sync::OnceLock,
};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Byte offsets of the components within a URI string.
///
/// Should be identical to parser output with the string as input, except
/// that a builder keeps a zero port which is not written to the string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Meta {
    // The index of the trailing colon.
    pub(crate) scheme_end: Option<NonZeroUsize>,
    pub(crate) auth_meta: Option<AuthMeta>,
    // `None` when the path is empty.
    pub(crate) path_bounds: Option<(usize, usize)>,
    // The index of the ';' starting the parameter of the final segment.
    pub(crate) param_start: Option<usize>,
    // Excludes the leading '?'.
    pub(crate) query_bounds: Option<(usize, usize)>,
    // Excludes the leading '#'.
    pub(crate) fragment_start: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AuthMeta {
    // One byte past the "//".
    pub(crate) start: usize,
    // The index of the '@'.
    pub(crate) user_end: Option<usize>,
    pub(crate) host_bounds: (usize, usize),
    pub(crate) port: Option<u16>,
    pub(crate) end: usize,
}

/// Input accepted by [`HttpUri::parse`] and [`HttpUri::parse_request_target`].
///
/// Implemented for `&str` and `String`.
pub trait Parse {
    /// The storage of the parsed URI.
    type Val;
    /// The error type returned on failure.
    type Err;

    /// Parses `self` in the given mode.
    fn parse(self, mode: Mode) -> Result<HttpUri<Self::Val>, Self::Err>;
}

impl<'a> Parse for &'a str {
    type Val = &'a str;
    type Err = ParseError;

    fn parse(self, mode: Mode) -> Result<HttpUri<Self::Val>, Self::Err> {
        parse::parse(self, mode).map(|meta| HttpUri::new(self, meta))
    }
}

impl Parse for String {
    type Val = Self;
    type Err = (ParseError, Self);

    fn parse(self, mode: Mode) -> Result<HttpUri<Self::Val>, Self::Err> {
        match parse::parse(&self, mode) {
            Ok(meta) => Ok(HttpUri::new(self, meta)),
            Err(e) => Err((e, self)),
        }
    }
}

/// A URI as seen by an HTTP server: an absolute URI, a relative reference,
/// or a request-target.
///
/// See the [crate-level documentation](crate#terminology) for an explanation
/// of the terms used here.
///
/// # Variants
///
/// Two variants of `HttpUri` are available: `HttpUri<&str>` (borrowed) and
/// `HttpUri<String>` (owned).
///
/// `HttpUri<&'a str>` outputs references with lifetime `'a` where possible
/// (thanks to [`borrow-or-share`](borrow_or_share)):
///
/// ```
/// use request_uri::HttpUri;
///
/// // Keep a reference to the path after dropping the `HttpUri`.
/// let path = HttpUri::parse("/foo/bar;v=1?q")?.path();
/// assert_eq!(path, Some("/foo/bar;v=1"));
/// # Ok::<_, request_uri::ParseError>(())
/// ```
///
/// # Decoded path
///
/// The canonical decoded path is computed on first request by
/// [`decoded_path`](Self::decoded_path), [`canonical_path`](Self::canonical_path)
/// or [`ambiguity`](Self::ambiguity), and cached afterwards. A path with a
/// malformed escape therefore parses fine, and only fails when decoded.
///
/// # Comparison
///
/// `HttpUri`s are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Canonicalization is **not** performed prior to comparison.
///
/// # Examples
///
/// ```
/// use request_uri::HttpUri;
///
/// let s = "http://user@example.com:8042/over/there;v=2?name=ferret#nose";
/// let uri = HttpUri::parse(s)?;
///
/// assert_eq!(uri.scheme().unwrap().as_str(), "http");
///
/// let auth = uri.authority().unwrap();
/// assert_eq!(auth.as_str(), "user@example.com:8042");
/// assert_eq!(auth.user(), Some("user"));
/// assert_eq!(auth.host(), "example.com");
/// assert_eq!(auth.port(), Some(8042));
/// assert_eq!(auth.to_string(), "example.com:8042");
///
/// assert_eq!(uri.path(), Some("/over/there;v=2"));
/// assert_eq!(uri.param(), Some("v=2"));
/// assert_eq!(uri.path_and_query(), Some("/over/there;v=2?name=ferret"));
/// assert_eq!(uri.query(), Some("name=ferret"));
/// assert_eq!(uri.fragment(), Some("nose"));
/// # Ok::<_, request_uri::ParseError>(())
/// ```
pub struct HttpUri<T> {
    pub(crate) val: T,
    pub(crate) meta: Meta,
    canonical: OnceLock<Result<CanonicalPath, ParseError>>,
}

impl<T> HttpUri<T> {
    pub(crate) fn new(val: T, meta: Meta) -> Self {
        Self {
            val,
            meta,
            canonical: OnceLock::new(),
        }
    }

    /// Parses a URI from a string into an `HttpUri`.
    ///
    /// The return type is
    ///
    /// - `Result<HttpUri<&str>, ParseError>` for `I = &str`;
    /// - `Result<HttpUri<String>, (ParseError, String)>` for `I = String`.
    ///
    /// A leading `"//"` opens an authority. The path is *not* decoded here:
    /// malformed escapes and illegal `".."` segments are reported by
    /// [`decoded_path`](Self::decoded_path).
    ///
    /// # Errors
    ///
    /// Returns `Err` on an empty scheme, an IPv6 literal without its closing
    /// `']'`, an invalid port, or input starting with `'*'` that is not exactly `"*"`.
    pub fn parse<I>(input: I) -> Result<Self, I::Err>
    where
        I: Parse<Val = T>,
    {
        input.parse(Mode::Uri)
    }

    /// Parses the request-target of an HTTP request line.
    ///
    /// For the `CONNECT` method (case-sensitive) the target is read in
    /// authority-form, as in `"example.com:443"`. Otherwise a target starting
    /// with `'/'` is read in origin-form, so that `"//foo/bar"` is a path
    /// rather than an authority, and any other target as by [`parse`](Self::parse).
    ///
    /// # Errors
    ///
    /// Returns `Err` on the same inputs as [`parse`](Self::parse).
    ///
    /// # Examples
    ///
    /// ```
    /// use request_uri::HttpUri;
    ///
    /// let uri = HttpUri::parse_request_target("GET", "//foo/bar")?;
    /// assert_eq!(uri.host(), None);
    /// assert_eq!(uri.path(), Some("//foo/bar"));
    ///
    /// let uri = HttpUri::parse_request_target("GET", "http://foo/bar")?;
    /// assert_eq!(uri.host(), Some("foo"));
    ///
    /// let uri = HttpUri::parse_request_target("CONNECT", "example.com:443")?;
    /// assert_eq!(uri.host(), Some("example.com"));
    /// assert_eq!(uri.port(), Some(443));
    /// assert_eq!(uri.path(), None);
    /// # Ok::<_, request_uri::ParseError>(())
    /// ```
    pub fn parse_request_target<I>(method: &str, target: I) -> Result<Self, I::Err>
    where
        I: Parse<Val = T>,
    {
        let mode = if method == "CONNECT" {
            Mode::AuthorityForm
        } else {
            Mode::RequestTarget
        };
        target.parse(mode)
    }
}

impl HttpUri<String> {
    /// Creates a new empty builder.
    ///
    /// See [`Builder`] for examples.
    #[inline]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Borrows this `HttpUri<String>` as `HttpUri<&str>`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn borrow(&self) -> HttpUri<&str> {
        HttpUri {
            val: &self.val,
            meta: self.meta,
            canonical: self.canonical.clone(),
        }
    }

    /// Consumes this `HttpUri<String>` and yields the underlying [`String`].
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.val
    }
}

impl HttpUri<&str> {
    /// Creates a new `HttpUri<String>` by cloning the contents of this `HttpUri<&str>`.
    #[must_use]
    pub fn to_owned(&self) -> HttpUri<String> {
        HttpUri {
            val: self.val.to_owned(),
            meta: self.meta,
            canonical: self.canonical.clone(),
        }
    }
}

impl<'i, 'o, T: BorrowOrShare<'i, 'o, str>> HttpUri<T> {
    /// Returns the URI as a string slice.
    #[must_use]
    pub fn as_str(&'i self) -> &'o str {
        self.val.borrow_or_share()
    }

    fn slice(&'i self, (start, end): (usize, usize)) -> &'o str {
        &self.as_str()[start..end]
    }

    /// Returns the optional scheme component.
    ///
    /// Note that the scheme component is *case-insensitive*.
    /// See the documentation of [`Scheme`] for more details on comparison.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_uri::{component::Scheme, HttpUri};
    ///
    /// const SCHEME_HTTP: &Scheme = Scheme::new_or_panic("http");
    ///
    /// let uri = HttpUri::parse("HTTP://example.com/")?;
    /// assert_eq!(uri.scheme(), Some(SCHEME_HTTP));
    ///
    /// let uri = HttpUri::parse("/path/to/file")?;
    /// assert_eq!(uri.scheme(), None);
    /// # Ok::<_, request_uri::ParseError>(())
    /// ```
    #[must_use]
    pub fn scheme(&'i self) -> Option<&'o Scheme> {
        self.meta
            .scheme_end
            .map(|i| Scheme::new_validated(&self.as_str()[..i.get()]))
    }

    /// Returns the optional authority component.
    #[must_use]
    pub fn authority(&'i self) -> Option<Authority<'o>> {
        self.meta
            .auth_meta
            .map(|meta| Authority::new(self.as_str(), meta))
    }

    /// Returns the optional user-info subcomponent, as is.
    #[must_use]
    pub fn user(&'i self) -> Option<&'o str> {
        self.authority().and_then(|auth| auth.user())
    }

    /// Returns the host subcomponent if an authority is present.
    ///
    /// An IPv6 literal is returned with its brackets.
    #[must_use]
    pub fn host(&'i self) -> Option<&'o str> {
        self.authority().map(|auth| auth.host())
    }

    /// Returns the raw path, or `None` if the path is empty.
    ///
    /// The matrix parameter of the final segment is included.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_uri::HttpUri;
    ///
    /// assert_eq!(HttpUri::parse("http://example.com/")?.path(), Some("/"));
    /// assert_eq!(HttpUri::parse("http://example.com")?.path(), None);
    /// assert_eq!(HttpUri::parse("*")?.path(), Some("*"));
    /// # Ok::<_, request_uri::ParseError>(())
    /// ```
    #[must_use]
    pub fn path(&'i self) -> Option<&'o str> {
        self.meta.path_bounds.map(|b| self.slice(b))
    }

    /// Returns the raw path followed by `'?'` and the query if present,
    /// or `None` if both are absent.
    #[must_use]
    pub fn path_and_query(&'i self) -> Option<&'o str> {
        let (path, query) = (self.meta.path_bounds, self.meta.query_bounds);
        // Includes the '?' when the path is empty.
        let start = path.map(|b| b.0).or(query.map(|b| b.0 - 1))?;
        let end = query.or(path)?.1;
        Some(self.slice((start, end)))
    }

    /// Returns the matrix parameter of the final path segment.
    ///
    /// The parameter is the text after the *last* `';'` of the final segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_uri::HttpUri;
    ///
    /// let uri = HttpUri::parse("/f%30%30;p0/bar;p1;p2")?;
    /// assert_eq!(uri.param(), Some("p2"));
    ///
    /// let uri = HttpUri::parse("/foo;abc=123/bar")?;
    /// assert_eq!(uri.param(), None);
    /// # Ok::<_, request_uri::ParseError>(())
    /// ```
    #[must_use]
    pub fn param(&'i self) -> Option<&'o str> {
        let (_, end) = self.meta.path_bounds?;
        self.meta.param_start.map(|i| self.slice((i + 1, end)))
    }

    /// Returns the optional query component, without the `'?'`.
    #[must_use]
    pub fn query(&'i self) -> Option<&'o str> {
        self.meta.query_bounds.map(|b| self.slice(b))
    }

    /// Returns the optional fragment component, without the `'#'`.
    #[must_use]
    pub fn fragment(&'i self) -> Option<&'o str> {
        self.meta.fragment_start.map(|i| &self.as_str()[i..])
    }
}

impl<T: Bos<str>> HttpUri<T> {
    /// Returns the port if an authority with a port is present.
    ///
    /// A port of `0` is returned as `Some(0)`.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.meta.auth_meta.and_then(|meta| meta.port)
    }

    /// Checks whether a scheme component is present.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.meta.scheme_end.is_some()
    }

    /// Checks whether an authority component is present.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.meta.auth_meta.is_some()
    }

    /// Checks whether a query component is present.
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.meta.query_bounds.is_some()
    }

    /// Checks whether a fragment component is present.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        self.meta.fragment_start.is_some()
    }

    /// Returns the canonical form of the path, computing it on first call.
    ///
    /// An empty path canonicalizes to an empty string.
    ///
    /// # Errors
    ///
    /// See [`canonicalize`](canonical::canonicalize). The error index is
    /// relative to the raw path.
    pub fn canonical_path(&self) -> Result<&CanonicalPath, ParseError> {
        self.canonical
            .get_or_init(|| {
                let path = self.path().unwrap_or("");
                let res = canonical::canonicalize(path);
                match &res {
                    Ok(canon) if canon.is_ambiguous() => {
                        debug!("path {path:?} is ambiguous: {}", canon.ambiguity());
                    }
                    Ok(_) => {}
                    Err(e) => debug!("path {path:?} cannot be decoded: {e}"),
                }
                res
            })
            .as_ref()
            .map_err(|e| *e)
    }

    /// Returns the canonical decoded path.
    ///
    /// # Errors
    ///
    /// Same as [`canonical_path`](Self::canonical_path).
    ///
    /// # Examples
    ///
    /// ```
    /// use request_uri::{HttpUri, ParseErrorKind};
    ///
    /// let uri = HttpUri::parse("/path/./info/../p%61ge;p")?;
    /// assert_eq!(uri.decoded_path()?, "/path/page");
    ///
    /// let uri = HttpUri::parse("/../etc/passwd")?;
    /// let e = uri.decoded_path().unwrap_err();
    /// assert_eq!(e.kind(), ParseErrorKind::IllegalParentTraversal);
    /// # Ok::<_, request_uri::ParseError>(())
    /// ```
    pub fn decoded_path(&self) -> Result<&str, ParseError> {
        self.canonical_path().map(CanonicalPath::as_str)
    }

    /// Returns the kinds of ambiguity found in the path.
    ///
    /// Returns an empty set when the path cannot be decoded.
    #[must_use]
    pub fn ambiguity(&self) -> Ambiguity {
        self.canonical_path()
            .map_or(Ambiguity::EMPTY, CanonicalPath::ambiguity)
    }

    /// Checks whether any ambiguity was found in the path.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguity().is_empty()
    }

    /// Creates a builder initialized with the components of `self`.
    pub fn to_builder(&self) -> Builder {
        Builder::from(self)
    }
}

impl<T: Clone> Clone for HttpUri<T> {
    fn clone(&self) -> Self {
        Self {
            val: self.val.clone(),
            meta: self.meta,
            canonical: self.canonical.clone(),
        }
    }
}

impl<T: Bos<str>, U: Bos<str>> PartialEq<HttpUri<U>> for HttpUri<T> {
    fn eq(&self, other: &HttpUri<U>) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<T: Bos<str>> PartialEq<str> for HttpUri<T> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<T: Bos<str>> PartialEq<HttpUri<T>> for str {
    fn eq(&self, other: &HttpUri<T>) -> bool {
        self == other.as_str()
    }
}

impl<T: Bos<str>> PartialEq<&str> for HttpUri<T> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<T: Bos<str>> PartialEq<HttpUri<T>> for &str {
    fn eq(&self, other: &HttpUri<T>) -> bool {
        *self == other.as_str()
    }
}

impl<T: Bos<str>> Eq for HttpUri<T> {}

impl<T: Bos<str>> hash::Hash for HttpUri<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<T: Bos<str>> PartialOrd for HttpUri<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Bos<str>> Ord for HttpUri<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl<T: Bos<str>> AsRef<str> for HttpUri<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T: Bos<str>> Borrow<str> for HttpUri<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<'a> TryFrom<&'a str> for HttpUri<&'a str> {
    type Error = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    #[inline]
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        HttpUri::parse(value)
    }
}

impl TryFrom<String> for HttpUri<String> {
    type Error = (ParseError, String);

    /// Equivalent to [`parse`](Self::parse).
    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        HttpUri::parse(value)
    }
}

impl FromStr for HttpUri<String> {
    type Err = ParseError;

    /// Equivalent to `HttpUri::parse(s).map(|r| r.to_owned())`.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpUri::parse(s).map(|r| r.to_owned())
    }
}

impl<'a> From<HttpUri<&'a str>> for &'a str {
    /// Equivalent to [`as_str`](HttpUri::as_str).
    #[inline]
    fn from(value: HttpUri<&'a str>) -> &'a str {
        value.val
    }
}

impl From<HttpUri<String>> for String {
    /// Equivalent to [`into_string`](HttpUri::into_string).
    #[inline]
    fn from(value: HttpUri<String>) -> String {
        value.val
    }
}

impl From<HttpUri<&str>> for HttpUri<String> {
    /// Equivalent to [`to_owned`](HttpUri::to_owned).
    #[inline]
    fn from(value: HttpUri<&str>) -> Self {
        value.to_owned()
    }
}

#[cfg(feature = "serde")]
impl<T: Bos<str>> Serialize for HttpUri<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for HttpUri<&'de str> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        HttpUri::parse(s).map_err(|e| {
            de::Error::custom(format_args!("failed to parse {s:?} as HTTP URI: {e}"))
        })
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for HttpUri<String> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HttpUri::parse(s).map_err(|(e, s)| {
            de::Error::custom(format_args!("failed to parse {s:?} as HTTP URI: {e}"))
        })
    }
}
