#![no_main]
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};
use request_uri::{Builder, HttpUri};

#[derive(Arbitrary, Debug)]
struct Authority<'a> {
    user: Option<&'a str>,
    host: &'a str,
    port: Option<u16>,
}

#[derive(Arbitrary, Debug)]
struct Components<'a> {
    scheme: Option<&'a str>,
    authority: Option<Authority<'a>>,
    path: Option<&'a str>,
    param: Option<&'a str>,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fuzz_target!(|c: Components<'_>| {
    let mut b = Builder::new();
    b.set_scheme(c.scheme).set_path(c.path);
    if let Some(a) = &c.authority {
        b.set_user(a.user).set_host(a.host);
        if let Some(port) = a.port {
            b.set_port(port);
        }
    }
    if let Some(param) = c.param {
        b.set_param(param);
    }
    b.set_query(c.query).set_fragment(c.fragment);

    let Ok(u1) = b.freeze() else {
        return;
    };
    assert_eq!(u1.as_str(), b.as_str());

    let u2 = HttpUri::parse(u1.as_str()).unwrap();
    assert_eq!(u1.scheme(), u2.scheme());
    assert_eq!(u1.scheme().map(|s| s.as_str()), b.scheme());
    assert_eq!(u1.user(), u2.user());
    assert_eq!(u1.user(), b.user());
    assert_eq!(u1.host(), u2.host());
    assert_eq!(u1.host(), b.host());
    assert_eq!(u1.port(), b.port());
    assert_eq!(u2.port(), b.port().filter(|&p| p != 0));
    assert_eq!(u1.path(), u2.path());
    assert_eq!(u1.path(), b.path());
    assert_eq!(u1.param(), u2.param());
    assert_eq!(u1.param(), b.param());
    assert_eq!(u1.query(), u2.query());
    assert_eq!(u1.fragment(), u2.fragment());
    assert_eq!(u1.fragment(), b.fragment());
});
