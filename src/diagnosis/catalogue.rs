use std::fmt;
use std::str::FromStr;

use super::error::DiagnosisError;
use super::types::Band;

const TAG_PREFIX: &str = "ISEMAIL_";

macro_rules! catalogue {
    ($(
        $(#[$attr:meta])*
        $variant:ident => $band:ident, $subtype:literal, $code:literal, $message:literal, [$($reference:literal),* $(,)?];
    )+) => {
        /// Every diagnosis the scanner knows about, one variant per
        /// (band, sub-type) pair.
        #[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Kind {
            $($(#[$attr])* $variant,)+
        }

        impl Kind {
            pub const ALL: &'static [Kind] = &[$(Kind::$variant),+];

            pub const fn band(self) -> Band {
                match self {
                    $(Kind::$variant => Band::$band,)+
                }
            }

            pub const fn subtype(self) -> &'static str {
                match self {
                    $(Kind::$variant => $subtype,)+
                }
            }

            pub const fn code(self) -> u8 {
                match self {
                    $(Kind::$variant => $code,)+
                }
            }

            pub const fn message(self) -> &'static str {
                match self {
                    $(Kind::$variant => $message,)+
                }
            }

            /// Keys into the reference table.
            pub const fn reference_keys(self) -> &'static [&'static str] {
                match self {
                    $(Kind::$variant => &[$($reference),*],)+
                }
            }
        }
    };
}

catalogue! {
    Valid => Valid, "VALID", 1,
        "Address is valid. Please note that this does not mean the address actually exists, nor even that the domain actually exists. This address could be issued by the domain owner without breaking the rules of any RFCs.",
        [];

    // DNS lookups are out of scope; kept so tags from existing corpora parse.
    NoMxRecord => DnsWarn, "NO_MX_RECORD", 5,
        "Couldn't find an MX record for this domain but an A-record does exist.",
        ["mailbox"];
    NoRecord => DnsWarn, "NO_RECORD", 6,
        "Couldn't find an MX record or an A-record for this domain.",
        ["mailbox"];

    Tld => Rfc5321, "TLD", 9,
        "Address is valid but at a Top Level Domain.",
        ["TLD"];
    TldNumeric => Rfc5321, "TLDNUMERIC", 10,
        "Address is valid but the Top Level Domain begins with a number.",
        ["TLD-format"];
    QuotedString => Rfc5321, "QUOTEDSTRING", 11,
        "Address is valid but contains a quoted string.",
        ["quoted-string"];
    AddressLiteral => Rfc5321, "ADDRESSLITERAL", 12,
        "Address is valid but at a literal address, not a domain.",
        ["address-literal", "address-literal-IPv4"];
    Ipv6Deprecated => Rfc5321, "IPV6DEPRECATED", 13,
        "Address is valid but contains a :: that only elides one zero group.",
        ["address-literal-IPv6"];

    CfwsComment => Cfws, "COMMENT", 17,
        "Address contains comments.",
        ["dot-atom"];
    CfwsFws => Cfws, "FWS", 18,
        "Address contains Folding White Space.",
        ["local-part"];

    DeprecLocalPart => Deprecated, "LOCALPART", 33,
        "Address contains a local part in deprecated form.",
        ["obs-local-part"];
    DeprecFws => Deprecated, "FWS", 34,
        "Address contains Folding White Space in deprecated form.",
        ["obs-local-part", "obs-domain"];
    DeprecQtext => Deprecated, "QTEXT", 35,
        "Address contains a quoted string in deprecated form.",
        ["obs-qtext"];
    DeprecQp => Deprecated, "QP", 36,
        "Address contains a quoted pair in deprecated form.",
        ["obs-qp"];
    DeprecComment => Deprecated, "COMMENT", 37,
        "Address contains a comment in deprecated form.",
        ["obs-local-part", "obs-domain"];
    DeprecCtext => Deprecated, "CTEXT", 38,
        "Address contains a comment with a deprecated character.",
        ["obs-ctext"];
    CfwsNearAt => Deprecated, "CFWS_NEAR_AT", 49,
        "Address contains a comment or Folding White Space around the @ sign.",
        ["CFWS-near-at", "SHOULD-NOT"];

    Rfc5322Domain => Rfc5322, "DOMAIN", 65,
        "Address is RFC 5322 compliant but contains domain characters that are not allowed by DNS.",
        ["domain-RFC5322"];
    TooLong => Rfc5322, "TOOLONG", 66,
        "Address is too long.",
        ["mailbox-maximum"];
    LocalTooLong => Rfc5322, "LOCAL_TOOLONG", 67,
        "The local part of the address is too long.",
        ["local-part-maximum"];
    DomainTooLong => Rfc5322, "DOMAIN_TOOLONG", 68,
        "The domain part is too long.",
        ["domain-maximum"];
    LabelTooLong => Rfc5322, "LABEL_TOOLONG", 69,
        "The domain part contains an element that is too long.",
        ["label"];
    DomainLiteral => Rfc5322, "DOMAINLITERAL", 70,
        "The domain literal is not a valid RFC 5321 address literal.",
        ["domain-literal"];
    DomLitObsDtext => Rfc5322, "DOMLIT_OBSDTEXT", 71,
        "The domain literal is not a valid RFC 5321 address literal and it contains obsolete characters.",
        ["obs-dtext"];
    Ipv6GrpCount => Rfc5322, "IPV6_GRPCOUNT", 72,
        "The IPv6 literal address contains the wrong number of groups.",
        ["address-literal-IPv6"];
    Ipv6DoubleDoubleColon => Rfc5322, "IPV6_2X2XCOLON", 73,
        "The IPv6 literal address contains too many :: sequences.",
        ["address-literal-IPv6"];
    Ipv6BadChar => Rfc5322, "IPV6_BADCHAR", 74,
        "The IPv6 address contains an illegal group of characters.",
        ["address-literal-IPv6"];
    Ipv6MaxGrps => Rfc5322, "IPV6_MAXGRPS", 75,
        "The IPv6 address has too many groups.",
        ["address-literal-IPv6"];
    Ipv6ColonStart => Rfc5322, "IPV6_COLONSTRT", 76,
        "IPv6 address starts with a single colon.",
        ["address-literal-IPv6"];
    Ipv6ColonEnd => Rfc5322, "IPV6_COLONEND", 77,
        "IPv6 address ends with a single colon.",
        ["address-literal-IPv6"];

    ExpectingDtext => Invalid, "EXPECTING_DTEXT", 129,
        "A domain literal contains a character that is not allowed.",
        ["dtext"];
    NoLocalPart => Invalid, "NOLOCALPART", 130,
        "Address has no local part.",
        ["local-part"];
    NoDomain => Invalid, "NODOMAIN", 131,
        "Address has no domain part.",
        ["addr-spec", "mailbox"];
    ConsecutiveDots => Invalid, "CONSECUTIVEDOTS", 132,
        "The address may not contain consecutive dots.",
        ["local-part", "domain-RFC5322", "domain-RFC5321"];
    AtextAfterCfws => Invalid, "ATEXT_AFTER_CFWS", 133,
        "Address contains text after a comment or Folding White Space.",
        ["local-part", "domain-RFC5322"];
    AtextAfterQs => Invalid, "ATEXT_AFTER_QS", 134,
        "Address contains text after a quoted string.",
        ["local-part"];
    AtextAfterDomLit => Invalid, "ATEXT_AFTER_DOMLIT", 135,
        "Extra characters were found after the end of the domain literal.",
        ["domain-RFC5322"];
    ExpectingQpair => Invalid, "EXPECTING_QPAIR", 136,
        "The address contains a character that is not allowed in a quoted pair.",
        ["quoted-pair"];
    ExpectingAtext => Invalid, "EXPECTING_ATEXT", 137,
        "Address contains a character that is not allowed.",
        ["atext"];
    ExpectingQtext => Invalid, "EXPECTING_QTEXT", 138,
        "A quoted string contains a character that is not allowed.",
        ["qtext"];
    ExpectingCtext => Invalid, "EXPECTING_CTEXT", 139,
        "A comment contains a character that is not allowed.",
        ["ctext"];
    BackslashEnd => Invalid, "BACKSLASHEND", 140,
        "The address can't end with a backslash.",
        ["domain-RFC5322", "domain-RFC5321", "quoted-pair"];
    DotStart => Invalid, "DOT_START", 141,
        "Neither part of the address may begin with a dot.",
        ["local-part", "domain-RFC5322", "domain-RFC5321"];
    DotEnd => Invalid, "DOT_END", 142,
        "Neither part of the address may end with a dot.",
        ["local-part", "domain-RFC5322", "domain-RFC5321"];
    DomainHyphenStart => Invalid, "DOMAINHYPHENSTART", 143,
        "A domain or subdomain cannot begin with a hyphen.",
        ["domain-RFC5321"];
    DomainHyphenEnd => Invalid, "DOMAINHYPHENEND", 144,
        "A domain or subdomain cannot end with a hyphen.",
        ["domain-RFC5321"];
    UnclosedQuotedStr => Invalid, "UNCLOSEDQUOTEDSTR", 145,
        "Unclosed quoted string.",
        ["quoted-string"];
    UnclosedComment => Invalid, "UNCLOSEDCOMMENT", 146,
        "Unclosed comment.",
        ["CFWS"];
    UnclosedDomLit => Invalid, "UNCLOSEDDOMLIT", 147,
        "Domain literal is missing its closing bracket.",
        ["domain-literal"];
    FwsCrlfX2 => Invalid, "FWS_CRLF_X2", 148,
        "Folding White Space contains consecutive CRLF sequences.",
        ["CFWS", "CRLF"];
    FwsCrlfEnd => Invalid, "FWS_CRLF_END", 149,
        "Folding White Space ends with a CRLF sequence.",
        ["CFWS", "CRLF"];
    CrNoLf => Invalid, "CR_NO_LF", 150,
        "Address contains a carriage return that is not followed by a line feed.",
        ["CFWS", "CRLF"];
    /// Internal consistency failure of the scanner (unbalanced contexts).
    BadParse => Invalid, "BAD_PARSE", 151,
        "The address could not be parsed.",
        ["addr-spec"];
}

impl Kind {
    /// Canonical tag: `ISEMAIL_VALID` or `ISEMAIL_<BAND>_<SUBTYPE>`.
    pub fn tag(self) -> String {
        match self {
            Kind::Valid => format!("{TAG_PREFIX}VALID"),
            _ => format!(
                "{TAG_PREFIX}{}_{}",
                self.band().tag_prefix(),
                self.subtype()
            ),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for Kind {
    type Err = DiagnosisError;

    /// Accepts `ISEMAIL_ERR_DOT_START` as well as `ERR_DOT_START`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let wanted = trimmed.strip_prefix(TAG_PREFIX).unwrap_or(trimmed);
        Kind::ALL
            .iter()
            .copied()
            .find(|kind| {
                kind.tag()
                    .strip_prefix(TAG_PREFIX)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| DiagnosisError::unknown_tag(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<u8> = Kind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), Kind::ALL.len());
    }

    #[test]
    fn tags_parse_back() {
        for kind in Kind::ALL {
            assert_eq!(kind.tag().parse::<Kind>().ok(), Some(*kind));
        }
    }

    #[test]
    fn parses_without_prefix_and_in_lowercase() {
        assert_eq!("ERR_DOT_START".parse::<Kind>().ok(), Some(Kind::DotStart));
        assert_eq!("deprec_fws".parse::<Kind>().ok(), Some(Kind::DeprecFws));
        assert_eq!("CFWS_FWS".parse::<Kind>().ok(), Some(Kind::CfwsFws));
        assert_eq!("ISEMAIL_VALID".parse::<Kind>().ok(), Some(Kind::Valid));
    }

    #[test]
    fn rejects_unknown_tags() {
        let err = "ISEMAIL_ERR_NOPE".parse::<Kind>().expect_err("unknown tag");
        assert!(matches!(err, DiagnosisError::UnknownTag(ref t) if t == "ISEMAIL_ERR_NOPE"));
        assert!("".parse::<Kind>().is_err());
    }

    #[test]
    fn every_reference_key_is_known() {
        for kind in Kind::ALL {
            for key in kind.reference_keys() {
                assert!(
                    !crate::diagnosis::lookup(key).link.is_empty(),
                    "{kind} cites unknown reference {key}"
                );
            }
        }
    }
}
