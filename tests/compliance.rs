use request_uri::{Ambiguity, ComplianceError, HttpUri, ParseErrorKind, UriCompliance};
use std::error::Error;

#[test]
fn strict() {
    let policy = UriCompliance::default();
    assert_eq!(policy, UriCompliance::new());
    assert!(policy.allowed().is_empty());

    for s in ["/a/b", "/a/./b/../c", "/a;p/b;q", "//a//b", "/%41"] {
        let uri = HttpUri::parse(s).unwrap();
        assert_eq!(policy.check(&uri), Ok(()), "{s}");
    }

    let cases = [
        ("/a/%2e/b", Ambiguity::DOT_SEGMENT),
        ("/a/..;/b", Ambiguity::DOT_SEGMENT | Ambiguity::PATH_PARAMETER),
        ("/a%2Fb", Ambiguity::PATH_SEPARATOR),
        ("/a%25b", Ambiguity::PATH_ENCODING),
    ];
    for (s, kinds) in cases {
        let uri = HttpUri::parse(s).unwrap();
        assert_eq!(
            policy.check(&uri),
            Err(ComplianceError::Ambiguous(kinds)),
            "{s}"
        );
    }
}

#[test]
fn partially_allowed() {
    let policy = UriCompliance::new().allow(Ambiguity::DOT_SEGMENT | Ambiguity::PATH_ENCODING);

    let uri = HttpUri::parse("/a/%2e%2e/%25").unwrap();
    assert_eq!(policy.check(&uri), Ok(()));

    // Only the kinds the policy does not allow are reported.
    let uri = HttpUri::parse("/a/..;x/%2f").unwrap();
    assert_eq!(
        policy.check(&uri),
        Err(ComplianceError::Ambiguous(
            Ambiguity::PATH_PARAMETER | Ambiguity::PATH_SEPARATOR
        ))
    );

    let policy = policy.disallow(Ambiguity::PATH_ENCODING);
    assert_eq!(policy.allowed(), Ambiguity::DOT_SEGMENT);
    let uri = HttpUri::parse("/a/%2e%2e/%25").unwrap();
    assert_eq!(
        policy.check(&uri),
        Err(ComplianceError::Ambiguous(Ambiguity::PATH_ENCODING))
    );
}

#[test]
fn legacy() {
    let policy = UriCompliance::legacy();
    assert_eq!(policy.allowed(), Ambiguity::ALL);

    let uri = HttpUri::parse("/%2e%2e;p/%2f%5c%25").unwrap();
    assert_eq!(policy.check(&uri), Ok(()));

    let uri = HttpUri::parse("/a/%zz").unwrap();
    let e = policy.check(&uri).unwrap_err();
    match e {
        ComplianceError::Undecodable(e) => {
            assert_eq!(e.kind(), ParseErrorKind::MalformedPercentEscape);
            assert_eq!(e.index(), 3);
        }
        ComplianceError::Ambiguous(_) => panic!("expected undecodable path"),
    }
    assert!(e.source().is_some());

    let uri = HttpUri::parse("/../a").unwrap();
    assert!(matches!(
        policy.check(&uri),
        Err(ComplianceError::Undecodable(e)) if e.kind() == ParseErrorKind::IllegalParentTraversal
    ));
}

#[test]
fn error_display() {
    let uri = HttpUri::parse("/a%2fb/%2e").unwrap();
    let e = UriCompliance::new().check(&uri).unwrap_err();
    assert_eq!(e.to_string(), "ambiguous path: dot segment, path separator");
    assert!(e.source().is_none());

    let uri = HttpUri::parse("/%").unwrap();
    let e = UriCompliance::new().check(&uri).unwrap_err();
    assert_eq!(
        e.to_string(),
        format!("undecodable path: {}", uri.decoded_path().unwrap_err())
    );
}

#[test]
fn ambiguity_set() {
    let all = Ambiguity::DOT_SEGMENT
        | Ambiguity::PATH_SEPARATOR
        | Ambiguity::PATH_PARAMETER
        | Ambiguity::PATH_ENCODING;
    assert_eq!(all, Ambiguity::ALL);
    assert_eq!(Ambiguity::default(), Ambiguity::EMPTY);

    let mut set = Ambiguity::EMPTY;
    set |= Ambiguity::PATH_SEPARATOR;
    assert!(set.contains(Ambiguity::PATH_SEPARATOR));
    assert!(!set.contains(Ambiguity::PATH_SEPARATOR | Ambiguity::DOT_SEGMENT));
    assert!(set.intersects(Ambiguity::PATH_SEPARATOR | Ambiguity::DOT_SEGMENT));
    assert_eq!(set & Ambiguity::DOT_SEGMENT, Ambiguity::EMPTY);
    assert_eq!(
        Ambiguity::ALL.difference(set).iter().collect::<Vec<_>>(),
        [
            Ambiguity::DOT_SEGMENT,
            Ambiguity::PATH_PARAMETER,
            Ambiguity::PATH_ENCODING
        ]
    );

    assert_eq!(Ambiguity::EMPTY.to_string(), "none");
    assert_eq!(
        format!("{:?}", Ambiguity::PATH_PARAMETER),
        "Ambiguity(PATH_PARAMETER)"
    );
}
