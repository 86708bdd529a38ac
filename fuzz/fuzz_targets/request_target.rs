#![no_main]
use libfuzzer_sys::fuzz_target;
use request_uri::HttpUri;

fuzz_target!(|data: (bool, &str)| {
    let (connect, target) = data;
    let method = if connect { "CONNECT" } else { "GET" };
    let Ok(u) = HttpUri::parse_request_target(method, target) else {
        return;
    };
    assert_eq!(u.as_str(), target);

    if connect {
        assert!(u.scheme().is_none());
        assert!(target.starts_with(u.authority().unwrap().as_str()));
    } else if target.starts_with('/') {
        assert!(!u.has_authority());
        assert!(target.starts_with(u.path_and_query().unwrap()));
    }
});
