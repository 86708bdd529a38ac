mod authority;

pub(crate) use authority::split as split_authority;

use crate::{
    canonical,
    error::ParseError,
    imp::Meta,
    pct_enc::table,
};
use std::num::NonZeroUsize;

type Result<T> = std::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err($crate::error::ParseError::new(
            $index,
            $crate::error::ParseErrorKind::$kind,
        ))
    };
}

pub(crate) use err;

/// Where the scanner starts and how it treats a leading `"//"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// A general URI reference. A leading `"//"` opens an authority.
    Uri,
    /// An HTTP request-target. A leading `'/'` starts an origin-form path,
    /// so `"//foo"` is a path rather than an authority.
    RequestTarget,
    /// The authority-form of a `CONNECT` request-target.
    AuthorityForm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    SchemeOrPath,
    AuthoritySlashes,
    Authority,
    Ipv6Host,
    Path,
    Query,
    Fragment,
    Asterisk,
}

pub(crate) fn parse(s: &str, mode: Mode) -> Result<Meta> {
    let mut scanner = Scanner {
        bytes: s.as_bytes(),
        pos: 0,
        mark: 0,
        auth_start: 0,
        out: Meta::default(),
    };
    let start = match mode {
        Mode::Uri | Mode::RequestTarget => State::Start,
        Mode::AuthorityForm => State::Authority,
    };
    scanner.run(start, mode)?;
    Ok(scanner.out)
}

/// Single left-to-right pass over the input.
///
/// # Invariants
///
/// `pos <= len` and `pos` is non-decreasing. Every index written to `out`
/// sits on an ASCII delimiter or at either end of the input, hence on the
/// boundary of a UTF-8 code point.
///
/// Nothing is decoded here: percent-escapes in the path are checked
/// only when the path is canonicalized.
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    // Start of the path currently being read.
    mark: usize,
    auth_start: usize,
    out: Meta,
}

impl Scanner<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
        debug_assert!(self.pos <= self.len());
    }

    fn run(&mut self, mut state: State, mode: Mode) -> Result<()> {
        loop {
            let next = match state {
                State::Start => self.start(mode)?,
                State::SchemeOrPath => self.scheme_or_path()?,
                State::AuthoritySlashes => self.authority_slashes(),
                State::Authority => self.authority()?,
                State::Ipv6Host => self.ipv6_host()?,
                State::Path => self.path(),
                State::Query => self.query(),
                State::Fragment => self.fragment(),
                State::Asterisk => self.asterisk()?,
            };
            match next {
                Some(next) => state = next,
                None => return Ok(()),
            }
        }
    }

    // Entered at the beginning of the input, and again right after a scheme.
    fn start(&mut self, mode: Mode) -> Result<Option<State>> {
        self.mark = self.pos;
        let at_beginning = self.pos == 0;

        Ok(Some(match self.peek(0) {
            None => return Ok(None),
            Some(b'*') if at_beginning => State::Asterisk,
            Some(b'/') if self.peek(1) == Some(b'/') => {
                if at_beginning && mode == Mode::RequestTarget {
                    State::Path
                } else {
                    State::AuthoritySlashes
                }
            }
            Some(b':') if at_beginning => err!(0, InvalidScheme),
            Some(x) if at_beginning && x.is_ascii_alphabetic() => State::SchemeOrPath,
            Some(b'?') => State::Query,
            Some(b'#') => State::Fragment,
            Some(_) => State::Path,
        }))
    }

    fn scheme_or_path(&mut self) -> Result<Option<State>> {
        // The first letter has been checked by `start`.
        let mut i = 1;
        while let Some(x) = self.peek(i) {
            if !table::SCHEME.allows(x) {
                break;
            }
            i += 1;
        }

        if self.peek(i) == Some(b':') {
            self.skip(i);
            self.out.scheme_end = NonZeroUsize::new(self.pos);
            // INVARIANT: Skipping ":" is fine.
            self.skip(1);
            Ok(Some(State::Start))
        } else {
            // Scheme characters are valid in a path, which starts at `mark`.
            self.skip(i);
            Ok(Some(State::Path))
        }
    }

    fn authority_slashes(&mut self) -> Option<State> {
        self.skip(2);
        self.auth_start = self.pos;
        Some(State::Authority)
    }

    fn authority(&mut self) -> Result<Option<State>> {
        while let Some(x) = self.peek(0) {
            match x {
                b'[' => return Ok(Some(State::Ipv6Host)),
                b'/' | b'?' | b'#' => break,
                _ => self.skip(1),
            }
        }

        let meta = split_authority(self.bytes, self.auth_start, self.pos)?;
        self.out.auth_meta = Some(meta);

        self.mark = self.pos;
        Ok(Some(State::Path))
    }

    fn ipv6_host(&mut self) -> Result<Option<State>> {
        let open = self.pos;
        // The literal cannot extend past the end of the authority.
        match self.bytes[open..]
            .iter()
            .position(|&x| matches!(x, b']' | b'/' | b'?' | b'#'))
        {
            Some(i) if self.bytes[open + i] == b']' => self.skip(i + 1),
            _ => err!(open, UnterminatedIpv6Literal),
        }
        Ok(Some(State::Authority))
    }

    fn path(&mut self) -> Option<State> {
        let start = self.mark;
        while let Some(x) = self.peek(0) {
            if x == b'?' || x == b'#' {
                break;
            }
            self.skip(1);
        }

        if self.pos > start {
            self.out.path_bounds = Some((start, self.pos));
            let path = &self.bytes[start..self.pos];
            self.out.param_start = canonical::find_param(path).map(|i| start + i);
        }

        match self.peek(0) {
            Some(b'?') => Some(State::Query),
            Some(b'#') => Some(State::Fragment),
            _ => None,
        }
    }

    fn query(&mut self) -> Option<State> {
        // INVARIANT: Skipping "?" is fine.
        self.skip(1);
        let start = self.pos;
        let end = self.bytes[start..]
            .iter()
            .position(|&x| x == b'#')
            .map_or(self.len(), |i| start + i);
        self.skip(end - start);
        self.out.query_bounds = Some((start, end));

        (end < self.len()).then_some(State::Fragment)
    }

    fn fragment(&mut self) -> Option<State> {
        // INVARIANT: Skipping "#" is fine.
        self.skip(1);
        self.out.fragment_start = Some(self.pos);
        self.pos = self.len();
        None
    }

    fn asterisk(&mut self) -> Result<Option<State>> {
        if self.len() != 1 {
            err!(1, InvalidAsteriskForm);
        }
        self.skip(1);
        self.out.path_bounds = Some((0, 1));
        Ok(None)
    }
}
