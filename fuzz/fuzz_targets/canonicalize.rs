#![no_main]
use libfuzzer_sys::fuzz_target;
use request_uri::canonical::canonicalize;

fuzz_target!(|data: &str| {
    let Ok(c1) = canonicalize(data) else {
        return;
    };
    if c1.is_ambiguous() {
        return;
    }

    // An unambiguous canonical path is a fixed point.
    let c2 = canonicalize(c1.as_str()).unwrap();
    assert_eq!(c1.as_str(), c2.as_str());
    assert!(!c2.is_ambiguous());
});
