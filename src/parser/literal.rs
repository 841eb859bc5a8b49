//! Classification of the content of a closed domain literal.

use std::sync::LazyLock;

use regex::Regex;

use crate::diagnosis::Kind;

const IPV6_TAG: &str = "IPv6:";
const MAX_GROUPS: usize = 8;

// Dotted quad, each octet 0-255, anchored at the end.
static IPV4_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("static IPv4 pattern")
});

static IPV6_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{0,4}$").expect("static IPv6 group pattern"));

/// Diagnoses produced by an address literal, in emission order.
///
/// A trailing IPv4 dotted quad after other content stands for two
/// 16-bit groups and is rewritten as `0:0` before the IPv6 checks.
pub(crate) fn classify(literal: &[u8]) -> Vec<Kind> {
    let literal = String::from_utf8_lossy(literal);
    let mut found = Vec::new();

    let literal = match IPV4_TAIL.find(&literal) {
        Some(m) if m.start() == 0 => {
            found.push(Kind::AddressLiteral);
            return found;
        }
        Some(m) => format!("{}0:0", &literal[..m.start()]),
        None => literal.into_owned(),
    };

    let Some(ipv6) = literal.strip_prefix(IPV6_TAG) else {
        found.push(Kind::DomainLiteral);
        return found;
    };

    // Trailing empty groups count, so "1::" has three.
    let groups: Vec<&str> = ipv6.split(':').collect();
    match (ipv6.find("::"), ipv6.rfind("::")) {
        (None, _) => {
            if groups.len() != MAX_GROUPS {
                found.push(Kind::Ipv6GrpCount);
            }
        }
        (Some(first), Some(last)) if first != last => found.push(Kind::Ipv6DoubleDoubleColon),
        (Some(index), _) => {
            // An elision at either end may stand for one extra empty group.
            let max = if index == 0 || index + 2 == ipv6.len() {
                MAX_GROUPS + 1
            } else {
                MAX_GROUPS
            };
            if groups.len() > max {
                found.push(Kind::Ipv6MaxGrps);
            } else if groups.len() == max {
                found.push(Kind::Ipv6Deprecated);
            }
        }
    }

    let bytes = ipv6.as_bytes();
    let second_last = bytes.len().checked_sub(2).and_then(|i| bytes.get(i));
    if bytes.first() == Some(&b':') && bytes.get(1) != Some(&b':') {
        found.push(Kind::Ipv6ColonStart);
    } else if bytes.last() == Some(&b':') && second_last != Some(&b':') {
        found.push(Kind::Ipv6ColonEnd);
    } else if groups.iter().any(|group| !IPV6_GROUP.is_match(group)) {
        found.push(Kind::Ipv6BadChar);
    } else {
        found.push(Kind::AddressLiteral);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worst(literal: &str) -> Kind {
        classify(literal.as_bytes())
            .into_iter()
            .max_by_key(|kind| kind.code())
            .unwrap_or(Kind::Valid)
    }

    #[test]
    fn ipv4() {
        assert_eq!(classify(b"127.0.0.1"), vec![Kind::AddressLiteral]);
        assert_eq!(worst("255.255.255.255"), Kind::AddressLiteral);
        assert_eq!(worst("300.1.1.1"), Kind::DomainLiteral);
        assert_eq!(worst("1.2.3"), Kind::DomainLiteral);
    }

    #[test]
    fn general_literal_is_not_an_address() {
        assert_eq!(worst("RFC-5322-domain-literal"), Kind::DomainLiteral);
        // tag is case-sensitive
        assert_eq!(worst("ipv6:1::2"), Kind::DomainLiteral);
    }

    #[test]
    fn full_ipv6() {
        assert_eq!(
            classify(b"IPv6:2001:0db8:0000:0000:0000:0000:1428:57ab"),
            vec![Kind::AddressLiteral]
        );
    }

    #[test]
    fn ipv4_mapped_tail_counts_as_two_groups() {
        assert_eq!(
            worst("IPv6:1111:2222:3333:4444:5555:6666:255.255.255.255"),
            Kind::AddressLiteral
        );
        assert_eq!(
            worst("IPv6:1111:2222:3333:4444:5555:255.255.255.255"),
            Kind::Ipv6GrpCount
        );
    }

    #[test]
    fn group_counts() {
        assert_eq!(
            worst("IPv6:1111:2222:3333:4444:5555:6666:7777"),
            Kind::Ipv6GrpCount
        );
        assert_eq!(worst("IPv6:1:2:3:4:5:6:7:8:9"), Kind::Ipv6GrpCount);
        assert_eq!(
            worst("IPv6:1111:2222:3333:4444:5555:6666:7777::8888"),
            Kind::Ipv6MaxGrps
        );
    }

    #[test]
    fn elisions() {
        assert_eq!(worst("IPv6:::1"), Kind::AddressLiteral);
        assert_eq!(worst("IPv6:1::2"), Kind::AddressLiteral);
        assert_eq!(
            worst("IPv6:1111:2222:3333:4444:5555:6666::8888"),
            Kind::Ipv6Deprecated
        );
        assert_eq!(worst("IPv6:1:2:3:4:5:6:7::"), Kind::Ipv6Deprecated);
        // the empty groups on both sides of a trailing "::" count
        assert_eq!(
            classify(b"IPv6:1:2:3:4:5:6:7:8::"),
            vec![Kind::Ipv6MaxGrps, Kind::AddressLiteral]
        );
        assert_eq!(
            classify(b"IPv6:1::2::3"),
            vec![Kind::Ipv6DoubleDoubleColon, Kind::AddressLiteral]
        );
    }

    #[test]
    fn stray_colons_and_bad_groups() {
        assert_eq!(worst("IPv6::1:2"), Kind::Ipv6ColonStart);
        assert_eq!(worst("IPv6:1::2:"), Kind::Ipv6ColonEnd);
        assert_eq!(
            worst("IPv6:1111:2222:3333:4444:5555:6666:7777:888G"),
            Kind::Ipv6BadChar
        );
        assert_eq!(worst("IPv6:12345::1"), Kind::Ipv6BadChar);
    }
}
