#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! An HTTP request-target parser with ambiguity-aware path canonicalization.
//!
//! The crate turns the URI found on an HTTP request line (or in a header such
//! as `Location`) into an [`HttpUri`], which gives access to every raw
//! component and to a *canonical decoded path*: the path with `.` and `..`
//! segments resolved, matrix parameters removed and percent-escapes decoded.
//!
//! # Terminology
//!
//! - A *request-target* is the token on an HTTP request line. It is either an
//!   absolute URI, an authority (for `CONNECT`), an absolute path with an
//!   optional query, or the single character `*`.
//! - A *matrix parameter* is the `;key=value` text attached to a path segment.
//!   Only the parameter of the final segment is exposed, via [`HttpUri::param`].
//! - A path is *ambiguous* when its decoded form differs from what a filter
//!   inspecting the raw bytes would see. See [`Ambiguity`].
//!
//! # Examples
//!
//! ```
//! use request_uri::HttpUri;
//!
//! let uri = HttpUri::parse("http://user:pw@host:8888/ignored/../p%61th;ignored/info;param?q=v#f")?;
//!
//! assert_eq!(uri.scheme().unwrap().as_str(), "http");
//! assert_eq!(uri.user(), Some("user:pw"));
//! assert_eq!(uri.host(), Some("host"));
//! assert_eq!(uri.port(), Some(8888));
//! assert_eq!(uri.path(), Some("/ignored/../p%61th;ignored/info;param"));
//! assert_eq!(uri.decoded_path()?, "/path/info");
//! assert_eq!(uri.param(), Some("param"));
//! assert_eq!(uri.query(), Some("q=v"));
//! assert_eq!(uri.fragment(), Some("f"));
//! assert!(!uri.is_ambiguous());
//! # Ok::<_, request_uri::ParseError>(())
//! ```
//!
//! Encoded dot-segments are never resolved, they are reported instead:
//!
//! ```
//! use request_uri::{Ambiguity, HttpUri};
//!
//! let uri = HttpUri::parse("/path/%2e%2e/secret")?;
//! assert_eq!(uri.decoded_path()?, "/path/../secret");
//! assert!(uri.ambiguity().contains(Ambiguity::DOT_SEGMENT));
//! # Ok::<_, request_uri::ParseError>(())
//! ```
//!
//! # Feature flags
//!
//! All features are disabled by default.
//!
//! - `log`: Logs rejected paths through the [`log`](https://docs.rs/log) facade.
//! - `serde`: Implements `Serialize` and `Deserialize` for [`HttpUri`].

#[macro_use]
mod log;

pub mod build;
pub mod canonical;
pub mod component;
pub mod compliance;
mod error;
mod fmt;
mod imp;
mod parse;
pub mod pct_enc;

pub use build::Builder;
pub use canonical::{Ambiguity, CanonicalPath};
pub use compliance::UriCompliance;
pub use error::{BuildError, ComplianceError, ParseError, ParseErrorKind};
pub use imp::HttpUri;
