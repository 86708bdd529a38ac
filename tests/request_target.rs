use request_uri::{HttpUri, ParseErrorKind};

#[test]
fn origin_form() {
    let uri = HttpUri::parse_request_target("GET", "/foo/bar").unwrap();
    assert_eq!(uri.host(), None);
    assert_eq!(uri.path(), Some("/foo/bar"));

    let uri = HttpUri::parse_request_target("GET", "//foo/bar").unwrap();
    assert_eq!(uri.host(), None);
    assert!(!uri.has_authority());
    assert_eq!(uri.path(), Some("//foo/bar"));
    assert_eq!(uri.decoded_path().unwrap(), "//foo/bar");

    let uri = HttpUri::parse_request_target("POST", "/search;v=2?q=rust#ignored").unwrap();
    assert_eq!(uri.path_and_query(), Some("/search;v=2?q=rust"));
    assert_eq!(uri.param(), Some("v=2"));
    assert_eq!(uri.fragment(), Some("ignored"));
}

#[test]
fn absolute_form() {
    let uri = HttpUri::parse_request_target("GET", "http://foo/bar").unwrap();
    assert_eq!(uri.host(), Some("foo"));
    assert_eq!(uri.path(), Some("/bar"));

    let uri = HttpUri::parse_request_target("GET", "https://[::1]:8443/").unwrap();
    assert_eq!(uri.scheme().unwrap().as_str(), "https");
    assert_eq!(uri.host(), Some("[::1]"));
    assert_eq!(uri.port(), Some(8443));
}

#[test]
fn asterisk_form() {
    let uri = HttpUri::parse_request_target("OPTIONS", "*").unwrap();
    assert_eq!(uri.host(), None);
    assert_eq!(uri.path(), Some("*"));

    let uri = HttpUri::parse_request_target("GET", "*").unwrap();
    assert_eq!(uri.path(), Some("*"));

    let e = HttpUri::parse_request_target("OPTIONS", "*/").unwrap_err();
    assert_eq!(e.kind(), ParseErrorKind::InvalidAsteriskForm);
}

#[test]
fn authority_form() {
    let uri = HttpUri::parse_request_target("CONNECT", "example.com:443").unwrap();
    assert_eq!(uri.scheme(), None);
    assert_eq!(uri.host(), Some("example.com"));
    assert_eq!(uri.port(), Some(443));
    assert_eq!(uri.path(), None);
    assert_eq!(uri.authority().unwrap().as_str(), "example.com:443");

    let uri = HttpUri::parse_request_target("CONNECT", "[::1]:8080").unwrap();
    assert_eq!(uri.host(), Some("[::1]"));
    assert_eq!(uri.port(), Some(8080));

    let e = HttpUri::parse_request_target("CONNECT", "example.com:https").unwrap_err();
    assert_eq!(e.kind(), ParseErrorKind::InvalidPort);
    assert_eq!(e.index(), 11);

    // The method is matched case-sensitively.
    let uri = HttpUri::parse_request_target("connect", "example.com:443").unwrap();
    assert_eq!(uri.scheme().unwrap().as_str(), "example.com");
    assert_eq!(uri.path(), Some("443"));
}

#[test]
fn owned_target() {
    let target = String::from("//a/../b");
    let uri = HttpUri::parse_request_target("GET", target).unwrap();
    assert_eq!(uri.path(), Some("//a/../b"));
    assert_eq!(uri.decoded_path().unwrap(), "//b");
}
