use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::catalogue::Kind;
use super::reference::{Reference, lookup};

/// Codes strictly below this value are usable unmodified in an SMTP envelope.
pub const THRESHOLD: u8 = 16;

/// Severity bands, ordered from least to most severe.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Valid,
    DnsWarn,
    Rfc5321,
    Cfws,
    Deprecated,
    Rfc5322,
    Invalid,
}

impl Band {
    pub const ALL: [Band; 7] = [
        Band::Valid,
        Band::DnsWarn,
        Band::Rfc5321,
        Band::Cfws,
        Band::Deprecated,
        Band::Rfc5322,
        Band::Invalid,
    ];

    /// Highest code a diagnosis of this band may carry.
    pub const fn ceiling(self) -> u8 {
        match self {
            Band::Valid => 1,
            Band::DnsWarn => 7,
            Band::Rfc5321 => 15,
            Band::Cfws => 31,
            Band::Deprecated => 63,
            Band::Rfc5322 => 127,
            Band::Invalid => 255,
        }
    }

    /// Band segment of a diagnosis tag (`ISEMAIL_<PREFIX>_<SUBTYPE>`).
    pub const fn tag_prefix(self) -> &'static str {
        match self {
            Band::Valid => "VALID",
            Band::DnsWarn => "DNSWARN",
            Band::Rfc5321 => "RFC5321",
            Band::Cfws => "CFWS",
            Band::Deprecated => "DEPREC",
            Band::Rfc5322 => "RFC5322",
            Band::Invalid => "ERR",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Band::Valid => "Address is valid.",
            Band::DnsWarn => "Address is valid but a DNS check was not successful.",
            Band::Rfc5321 => "Address is valid for SMTP but has unusual elements.",
            Band::Cfws => {
                "Address is valid within the message but cannot be used unmodified for the envelope."
            }
            Band::Deprecated => {
                "Address contains deprecated elements but may still be valid in restricted contexts."
            }
            Band::Rfc5322 => {
                "Address is only valid according to the broad definition of RFC 5322. It is otherwise invalid."
            }
            Band::Invalid => "Address is invalid for any purpose.",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_prefix())
    }
}

/// One classified finding about an address.
///
/// Two diagnoses are equal when they share the same band and sub-type;
/// they are ordered by their numeric code, which can also be compared
/// against a bare integer such as [`THRESHOLD`].
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Diagnosis {
    kind: Kind,
    band: Band,
    subtype: &'static str,
    code: u8,
    message: &'static str,
    references: Vec<Reference>,
}

impl Diagnosis {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            band: kind.band(),
            subtype: kind.subtype(),
            code: kind.code(),
            message: kind.message(),
            references: kind.reference_keys().iter().map(|key| lookup(key)).collect(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn subtype(&self) -> &'static str {
        self.subtype
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Canonical tag, e.g. `ISEMAIL_ERR_DOT_START`.
    pub fn tag(&self) -> String {
        self.kind.tag()
    }

    /// `true` when the code sits below [`THRESHOLD`].
    pub fn is_valid(&self) -> bool {
        self.code < THRESHOLD
    }
}

impl Default for Diagnosis {
    fn default() -> Self {
        Self::new(Kind::Valid)
    }
}

impl From<Kind> for Diagnosis {
    fn from(kind: Kind) -> Self {
        Self::new(kind)
    }
}

impl PartialEq for Diagnosis {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Diagnosis {}

impl Hash for Diagnosis {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.band.hash(state);
        self.subtype.hash(state);
    }
}

impl PartialOrd for Diagnosis {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Diagnosis {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code)
    }
}

impl PartialEq<u8> for Diagnosis {
    fn eq(&self, other: &u8) -> bool {
        self.code == *other
    }
}

impl PartialOrd<u8> for Diagnosis {
    fn partial_cmp(&self, other: &u8) -> Option<Ordering> {
        Some(self.code.cmp(other))
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_codes() {
        let comment = Diagnosis::new(Kind::CfwsComment);
        let dots = Diagnosis::new(Kind::ConsecutiveDots);
        assert!(comment < dots);
        assert_eq!(std::cmp::max(comment.clone(), dots.clone()), dots);
    }

    #[test]
    fn compares_against_threshold() {
        assert!(Diagnosis::new(Kind::Ipv6Deprecated) < THRESHOLD);
        assert!(Diagnosis::new(Kind::CfwsComment) > THRESHOLD);
        assert!(Diagnosis::new(Kind::AddressLiteral) == 12u8);
    }

    #[test]
    fn equality_is_band_and_subtype() {
        assert_eq!(Diagnosis::new(Kind::CfwsFws), Diagnosis::new(Kind::CfwsFws));
        // same sub-type name, different band
        assert_ne!(
            Diagnosis::new(Kind::CfwsFws),
            Diagnosis::new(Kind::DeprecFws)
        );
    }

    #[test]
    fn every_band_code_fits_under_its_ceiling() {
        for kind in Kind::ALL {
            let band = kind.band();
            let floor = Band::ALL
                .iter()
                .take_while(|b| **b < band)
                .last()
                .map(|b| b.ceiling())
                .unwrap_or(0);
            assert!(
                kind.code() > floor && kind.code() <= band.ceiling(),
                "{kind} has code {} outside ({floor}, {}]",
                kind.code(),
                band.ceiling()
            );
        }
    }

    #[test]
    fn references_are_resolved() {
        let diagnosis = Diagnosis::new(Kind::CfwsNearAt);
        let citations: Vec<_> = diagnosis
            .references()
            .iter()
            .map(|r| r.citation)
            .collect();
        assert_eq!(citations, ["RFC 5322 section 3.4.1", "RFC2119 section 4"]);
    }

    #[test]
    fn display_renders_tag_and_message() {
        insta::assert_snapshot!(
            Diagnosis::new(Kind::ConsecutiveDots),
            @"ISEMAIL_ERR_CONSECUTIVEDOTS: The address may not contain consecutive dots."
        );
        insta::assert_snapshot!(
            Diagnosis::new(Kind::Ipv6Deprecated),
            @"ISEMAIL_RFC5321_IPV6DEPRECATED: Address is valid but contains a :: that only elides one zero group."
        );
    }
}
