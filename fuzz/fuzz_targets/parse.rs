#![no_main]
use libfuzzer_sys::fuzz_target;
use request_uri::HttpUri;

fuzz_target!(|data: &str| {
    let Ok(u) = HttpUri::parse(data) else {
        return;
    };
    let mut buf = String::with_capacity(data.len());
    if let Some(s) = u.scheme() {
        buf.push_str(s.as_str());
        buf.push(':');
    }
    if let Some(a) = u.authority() {
        buf.push_str("//");
        let start = buf.len();
        if let Some(user) = a.user() {
            buf.push_str(user);
            buf.push('@');
        }
        buf.push_str(a.host());
        assert!(a.as_str()[buf.len() - start..]
            .strip_prefix(':')
            .map_or(a.port().is_none(), |p| p.parse::<u16>().ok() == a.port()));
        buf.truncate(start);
        buf.push_str(a.as_str());
    }
    if let Some(p) = u.path() {
        buf.push_str(p);
        if let Some(param) = u.param() {
            assert!(p.ends_with(param));
        }
    }
    if let Some(q) = u.query() {
        buf.push('?');
        buf.push_str(q);
    }
    if let Some(f) = u.fragment() {
        buf.push('#');
        buf.push_str(f);
    }
    assert_eq!(data, buf);

    if let Ok(c) = u.canonical_path() {
        assert_eq!(u.ambiguity(), c.ambiguity());
    }
});
