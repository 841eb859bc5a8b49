/// Lexical mode of the scanner; also the pushdown stack alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Context {
    LocalPart,
    Domain,
    Literal,
    Comment,
    Fws,
    QuotedString,
    QuotedPair,
}

pub(crate) const AT: u8 = b'@';
pub(crate) const BACKSLASH: u8 = b'\\';
pub(crate) const DOT: u8 = b'.';
pub(crate) const DQUOTE: u8 = b'"';
pub(crate) const OPEN_PAREN: u8 = b'(';
pub(crate) const CLOSE_PAREN: u8 = b')';
pub(crate) const OPEN_BRACKET: u8 = b'[';
pub(crate) const CLOSE_BRACKET: u8 = b']';
pub(crate) const HYPHEN: u8 = b'-';
pub(crate) const SP: u8 = b' ';
pub(crate) const HTAB: u8 = b'\t';
pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';

/// US-ASCII visible characters not valid for atext (RFC 5322 section 3.2.3).
const SPECIALS: &[u8] = b"()<>[]:;@\\,.\"";

/// atext: printable US-ASCII excluding specials.
pub(crate) fn is_atext(c: u8) -> bool {
    (33..=126).contains(&c) && !SPECIALS.contains(&c)
}

/// RFC 5321 sub-domain characters (letter, digit, hyphen).
pub(crate) fn is_ldh(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == HYPHEN
}

/// obs-NO-WS-CTL and DEL, accepted in obsolete forms.
pub(crate) fn is_obsolete_control(c: u8) -> bool {
    (1..32).contains(&c) || c == 127
}
