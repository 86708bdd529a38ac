use crate::imp::{AuthMeta, Meta};
use std::{fmt::Write, num::NonZeroUsize};

/// Serialization in progress, with offsets recorded as the parser would.
#[derive(Default)]
pub struct BuilderInner {
    pub buf: String,
    pub meta: Meta,
}

impl BuilderInner {
    pub fn push_scheme(&mut self, v: &str) {
        self.buf.push_str(v);
        self.meta.scheme_end = NonZeroUsize::new(self.buf.len());
        self.buf.push(':');
    }

    pub fn push_authority(&mut self, user: Option<&str>, host: &str, port: Option<u16>) {
        self.buf.push_str("//");
        let start = self.buf.len();

        let user_end = user.map(|v| {
            self.buf.push_str(v);
            let i = self.buf.len();
            self.buf.push('@');
            i
        });

        let host_start = self.buf.len();
        self.buf.push_str(host);
        let host_end = self.buf.len();

        // A zero port is recorded but not written out.
        if let Some(port) = port.filter(|&port| port != 0) {
            write!(self.buf, ":{port}").unwrap();
        }

        self.meta.auth_meta = Some(AuthMeta {
            start,
            user_end,
            host_bounds: (host_start, host_end),
            port,
            end: self.buf.len(),
        });
    }

    pub fn push_path(&mut self, v: &str, param_start: Option<usize>) {
        let start = self.buf.len();
        self.buf.push_str(v);
        if !v.is_empty() {
            self.meta.path_bounds = Some((start, self.buf.len()));
            self.meta.param_start = param_start.map(|i| start + i);
        }
    }

    pub fn push_query(&mut self, v: &str) {
        self.buf.push('?');
        let start = self.buf.len();
        self.buf.push_str(v);
        self.meta.query_bounds = Some((start, self.buf.len()));
    }

    pub fn push_fragment(&mut self, v: &str) {
        self.buf.push('#');
        self.meta.fragment_start = Some(self.buf.len());
        self.buf.push_str(v);
    }
}

/// Checks that a host reads back as a host and nothing more.
pub fn is_valid_host(host: &str) -> bool {
    match host.strip_prefix('[') {
        Some(rem) => matches!(
            rem.split_once(']'),
            Some((inner, "")) if !inner.contains(['[', '@', '/', '?', '#'])
        ),
        None => !host.contains([':', '@', '[', ']', '/', '?', '#']),
    }
}

pub fn first_segment_contains_colon(path: &str) -> bool {
    path.split_once('/').map_or(path, |x| x.0).contains(':')
}
