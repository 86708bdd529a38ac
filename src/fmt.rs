use crate::{
    build::Builder,
    canonical::Ambiguity,
    component::{Authority, Scheme},
    imp::HttpUri,
};
use borrow_or_share::Bos;
use std::fmt::{self, Write};

impl<T: Bos<str>> fmt::Debug for HttpUri<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpUri")
            .field("scheme", &self.scheme())
            .field("authority", &self.authority())
            .field("path", &self.path())
            .field("query", &self.query())
            .field("fragment", &self.fragment())
            .finish()
    }
}

impl<T: Bos<str>> fmt::Display for HttpUri<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Scheme {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl fmt::Debug for Scheme {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Debug for Authority<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authority")
            .field("user", &self.user())
            .field("host", &self.host())
            .field("port", &self.port())
            .finish()
    }
}

impl fmt::Display for Authority<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host())?;
        match self.port() {
            Some(port) if port != 0 => write!(f, ":{port}"),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ambiguity(")?;
        if self.is_empty() {
            f.write_str("EMPTY")?;
        }
        for (i, (_, name)) in Ambiguity::NAMES
            .iter()
            .filter(|(kind, _)| self.contains(*kind))
            .enumerate()
        {
            if i != 0 {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
        }
        f.write_char(')')
    }
}

/// Writes the kinds in lower case, separated by commas.
impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, (_, name)) in Ambiguity::NAMES
            .iter()
            .filter(|(kind, _)| self.contains(*kind))
            .enumerate()
        {
            if i != 0 {
                f.write_str(", ")?;
            }
            for c in name.chars() {
                f.write_char(if c == '_' { ' ' } else { c.to_ascii_lowercase() })?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("scheme", &self.scheme())
            .field("user", &self.user())
            .field("host", &self.host())
            .field("port", &self.port())
            .field("path", &self.path())
            .field("query", &self.query())
            .field("fragment", &self.fragment())
            .finish()
    }
}

impl fmt::Display for Builder {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Ambiguity, HttpUri};

    #[test]
    fn ambiguity() {
        assert_eq!(format!("{:?}", Ambiguity::EMPTY), "Ambiguity(EMPTY)");
        assert_eq!(
            format!("{:?}", Ambiguity::DOT_SEGMENT | Ambiguity::PATH_ENCODING),
            "Ambiguity(DOT_SEGMENT | PATH_ENCODING)"
        );
        assert_eq!(Ambiguity::EMPTY.to_string(), "none");
        assert_eq!(
            (Ambiguity::PATH_SEPARATOR | Ambiguity::PATH_PARAMETER).to_string(),
            "path separator, path parameter"
        );
    }

    #[test]
    fn authority() {
        let uri = HttpUri::parse("//u@h:0/").unwrap();
        assert_eq!(uri.authority().unwrap().to_string(), "h");
        let uri = HttpUri::parse("//h").unwrap();
        assert_eq!(uri.authority().unwrap().to_string(), "h");
    }

    #[test]
    fn uri() {
        let uri = HttpUri::parse("http://example.com/p?q").unwrap();
        assert_eq!(uri.to_string(), "http://example.com/p?q");
        assert_eq!(
            format!("{uri:?}"),
            "HttpUri { scheme: Some(\"http\"), authority: Some(Authority { user: None, \
             host: \"example.com\", port: None }), path: Some(\"/p\"), query: Some(\"q\"), \
             fragment: None }"
        );
    }
}
