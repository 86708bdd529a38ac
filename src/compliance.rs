//! Policies deciding which ambiguous paths a server accepts.

use crate::{canonical::Ambiguity, error::ComplianceError, imp::HttpUri};
use borrow_or_share::Bos;

/// A policy on path ambiguity.
///
/// The default policy, [`new`](Self::new), rejects every kind of ambiguity.
///
/// # Examples
///
/// ```
/// use request_uri::{Ambiguity, ComplianceError, HttpUri, UriCompliance};
///
/// let uri = HttpUri::parse("/files/a%2Fb.txt")?;
///
/// let strict = UriCompliance::new();
/// assert_eq!(
///     strict.check(&uri),
///     Err(ComplianceError::Ambiguous(Ambiguity::PATH_SEPARATOR))
/// );
///
/// let lenient = UriCompliance::new().allow(Ambiguity::PATH_SEPARATOR);
/// assert_eq!(lenient.check(&uri), Ok(()));
/// # Ok::<_, request_uri::ParseError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UriCompliance {
    allowed: Ambiguity,
}

impl UriCompliance {
    /// Creates a policy that allows no ambiguity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allowed: Ambiguity::EMPTY,
        }
    }

    /// Creates a policy that allows every kind of ambiguity.
    ///
    /// Paths that cannot be decoded are still rejected.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            allowed: Ambiguity::ALL,
        }
    }

    /// Returns a policy that also allows the given kinds.
    #[must_use]
    pub const fn allow(self, kinds: Ambiguity) -> Self {
        Self {
            allowed: self.allowed.union(kinds),
        }
    }

    /// Returns a policy that no longer allows the given kinds.
    #[must_use]
    pub const fn disallow(self, kinds: Ambiguity) -> Self {
        Self {
            allowed: self.allowed.difference(kinds),
        }
    }

    /// Returns the kinds of ambiguity allowed.
    #[must_use]
    pub const fn allowed(&self) -> Ambiguity {
        self.allowed
    }

    /// Checks the path of a URI against the policy.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::Ambiguous`] with the kinds found in the path
    /// that the policy does not allow, or [`ComplianceError::Undecodable`] if
    /// the path cannot be canonicalized.
    pub fn check<T: Bos<str>>(&self, uri: &HttpUri<T>) -> Result<(), ComplianceError> {
        let found = uri.canonical_path()?.ambiguity();
        let disallowed = found.difference(self.allowed);
        if disallowed.is_empty() {
            Ok(())
        } else {
            debug!("rejecting {:?}: {disallowed}", uri.as_str());
            Err(ComplianceError::Ambiguous(disallowed))
        }
    }
}

impl Default for UriCompliance {
    fn default() -> Self {
        Self::new()
    }
}
