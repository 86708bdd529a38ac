use super::{err, Result};
use crate::{imp::AuthMeta, pct_enc::table};

/// Splits `bytes[start..end]` into user-info, host and port.
///
/// The user-info ends at the *last* `'@'` and is kept as is, so it may itself
/// contain `':'` or `'@'`. A host starting with `'['` is an IPv6 literal
/// which extends to the matching `']'`; otherwise the host ends at the last `':'`.
pub(crate) fn split(bytes: &[u8], start: usize, end: usize) -> Result<AuthMeta> {
    let user_end = bytes[start..end]
        .iter()
        .rposition(|&x| x == b'@')
        .map(|i| start + i);
    let host_start = user_end.map_or(start, |i| i + 1);

    let host_end = if bytes.get(host_start) == Some(&b'[') && host_start < end {
        match bytes[host_start..end].iter().position(|&x| x == b']') {
            Some(i) => {
                let host_end = host_start + i + 1;
                if host_end < end && bytes[host_end] != b':' {
                    err!(host_end, InvalidPort);
                }
                host_end
            }
            None => err!(host_start, UnterminatedIpv6Literal),
        }
    } else {
        bytes[host_start..end]
            .iter()
            .rposition(|&x| x == b':')
            .map_or(end, |i| host_start + i)
    };

    let port = if host_end < end {
        // INVARIANT: `bytes[host_end]` is ':'.
        match parse_port(&bytes[host_end + 1..end]) {
            Some(port) => Some(port),
            None => err!(host_end, InvalidPort),
        }
    } else {
        None
    };

    Ok(AuthMeta {
        start,
        user_end,
        host_bounds: (host_start, host_end),
        port,
        end,
    })
}

fn parse_port(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !table::DIGIT.validate(digits) {
        return None;
    }
    digits.iter().try_fold(0u16, |acc, &x| {
        acc.checked_mul(10)?.checked_add(u16::from(x - b'0'))
    })
}
