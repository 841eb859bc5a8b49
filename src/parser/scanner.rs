//! The character loop: one handler per lexical context.

use super::context::{
    AT, BACKSLASH, CLOSE_BRACKET, CLOSE_PAREN, CR, Context, DOT, DQUOTE, HTAB, HYPHEN, LF,
    OPEN_BRACKET, OPEN_PAREN, SP, is_atext, is_ldh, is_obsolete_control,
};
use super::literal;
use super::state::ScanState;
use crate::diagnosis::{Band, Kind};

/// What the loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next,
    /// CR plus the LF that was checked ahead.
    SkipLf,
    /// Hand the same byte to the context just restored.
    Redo,
    Halt,
}

/// Run the automaton over `address`, stopping at the first fatal diagnosis.
pub(crate) fn scan(address: &str) -> ScanState<'_> {
    let mut state = ScanState::new(address.as_bytes());
    let mut i = 0;

    while let Some(&c) = state.input.get(i) {
        state.token = Some(c);
        let step = match state.context {
            Context::LocalPart => state.local_part(c, i),
            Context::Domain => state.domain(c, i),
            Context::Literal => state.literal(c, i),
            Context::QuotedString => state.quoted_string(c, i),
            Context::QuotedPair => state.quoted_pair(c),
            Context::Comment => state.comment(c, i),
            Context::Fws => state.fws(c, i),
        };

        match step {
            Step::Next => i += 1,
            Step::SkipLf => i += 2,
            Step::Redo => continue,
            Step::Halt => break,
        }

        if state.worst() > Band::Rfc5322.ceiling() {
            break;
        }
    }

    #[cfg(feature = "with-tracing")]
    {
        if state.worst() > Band::Rfc5322.ceiling() {
            tracing::debug!(
                offset = i,
                diagnosis = ?state.diagnoses.last(),
                "scan halted on fatal diagnosis"
            );
        }
    }

    state
}

impl ScanState<'_> {
    /// A CR must be followed by LF.
    fn lf_follows(&mut self, i: usize) -> bool {
        if self.input.get(i + 1) == Some(&LF) {
            true
        } else {
            self.record(Kind::CrNoLf);
            false
        }
    }

    /// Open an FWS run on `c`, which is CR, SP or HTAB.
    fn open_fws(&mut self, c: u8) -> Step {
        self.enter(Context::Fws);
        self.token_prior = Some(c);
        if c == CR { Step::SkipLf } else { Step::Next }
    }

    fn close(&mut self, then: Step) -> Step {
        if self.leave() { then } else { Step::Halt }
    }

    fn local_part(&mut self, c: u8, i: usize) -> Step {
        let element_len = self.local.element_len;
        let first_element = self.local.element_count() == 0;

        match c {
            OPEN_PAREN => {
                if element_len == 0 {
                    self.record(if first_element {
                        Kind::CfwsComment
                    } else {
                        Kind::DeprecComment
                    });
                } else {
                    // a comment cannot split an element
                    self.record(Kind::CfwsComment);
                    self.end_or_die = true;
                }
                self.enter(Context::Comment);
            }
            DOT => {
                if element_len == 0 {
                    self.record(if first_element {
                        Kind::DotStart
                    } else {
                        Kind::ConsecutiveDots
                    });
                } else {
                    // a quoted or commented atom among others is obs-local-part
                    if self.end_or_die {
                        self.record(Kind::DeprecLocalPart);
                    }
                    self.end_or_die = false;
                    self.local.next_element(c);
                }
            }
            DQUOTE => {
                if element_len == 0 {
                    self.record(if first_element {
                        Kind::QuotedString
                    } else {
                        Kind::DeprecLocalPart
                    });
                    self.local.push(c);
                    self.end_or_die = true;
                    self.enter(Context::QuotedString);
                } else {
                    self.record(Kind::ExpectingAtext);
                }
            }
            CR | SP | HTAB => {
                if c == CR && !self.lf_follows(i) {
                    return Step::Halt;
                }
                if element_len == 0 {
                    self.record(if first_element {
                        Kind::CfwsFws
                    } else {
                        Kind::DeprecFws
                    });
                } else {
                    self.end_or_die = true;
                }
                return self.open_fws(c);
            }
            AT => {
                if self.stack.len() != 1 {
                    self.record(Kind::BadParse);
                    return Step::Halt;
                }
                if self.local.text.is_empty() {
                    self.record(Kind::NoLocalPart);
                } else if element_len == 0 {
                    self.record(Kind::DotEnd);
                } else if self.local.text.len() > 64 {
                    self.record(Kind::LocalTooLong);
                } else if matches!(self.prior, Context::Comment | Context::Fws) {
                    self.record(Kind::CfwsNearAt);
                }
                self.start_domain();
            }
            _ => {
                if self.end_or_die {
                    match self.prior {
                        Context::Comment | Context::Fws => self.record(Kind::AtextAfterCfws),
                        Context::QuotedString => self.record(Kind::AtextAfterQs),
                        _ => {
                            self.record(Kind::BadParse);
                            return Step::Halt;
                        }
                    }
                } else {
                    self.prior = self.context;
                    if !is_atext(c) {
                        self.record(Kind::ExpectingAtext);
                    }
                    self.local.push(c);
                }
            }
        }
        Step::Next
    }

    fn domain(&mut self, c: u8, i: usize) -> Step {
        let element_len = self.domain.element_len;
        let first_element = self.domain.element_count() == 0;

        match c {
            OPEN_PAREN => {
                if element_len == 0 {
                    self.record(if first_element {
                        Kind::CfwsNearAt
                    } else {
                        Kind::DeprecComment
                    });
                } else {
                    self.record(Kind::CfwsComment);
                    self.end_or_die = true;
                }
                self.enter(Context::Comment);
            }
            DOT => {
                if element_len == 0 {
                    self.record(if first_element {
                        Kind::DotStart
                    } else {
                        Kind::ConsecutiveDots
                    });
                } else if self.hyphen_flag {
                    self.record(Kind::DomainHyphenEnd);
                } else {
                    // RFC 1035: labels are 63 octets or less
                    if element_len > 63 {
                        self.record(Kind::LabelTooLong);
                    }
                    self.end_or_die = false;
                    self.domain.next_element(c);
                }
            }
            OPEN_BRACKET => {
                // a literal must be the whole domain
                if self.domain.text.is_empty() {
                    self.end_or_die = true;
                    self.domain.push(c);
                    self.literal = Some(Vec::new());
                    self.enter(Context::Literal);
                } else {
                    self.record(Kind::ExpectingAtext);
                }
            }
            CR | SP | HTAB => {
                if c == CR && !self.lf_follows(i) {
                    return Step::Halt;
                }
                if element_len == 0 {
                    self.record(if first_element {
                        Kind::CfwsNearAt
                    } else {
                        Kind::DeprecFws
                    });
                } else {
                    self.record(Kind::CfwsFws);
                    self.end_or_die = true;
                }
                return self.open_fws(c);
            }
            _ => {
                if self.end_or_die {
                    match self.prior {
                        Context::Comment | Context::Fws => self.record(Kind::AtextAfterCfws),
                        Context::Literal => self.record(Kind::AtextAfterDomLit),
                        _ => {
                            self.record(Kind::BadParse);
                            return Step::Halt;
                        }
                    }
                }

                self.hyphen_flag = false;
                if !is_atext(c) {
                    self.record(Kind::ExpectingAtext);
                } else if c == HYPHEN {
                    if element_len == 0 {
                        self.record(Kind::DomainHyphenStart);
                    }
                    self.hyphen_flag = true;
                } else if !is_ldh(c) {
                    // fine for RFC 5322, not for DNS
                    self.record(Kind::Rfc5322Domain);
                }
                self.domain.push(c);
            }
        }
        Step::Next
    }

    fn literal(&mut self, c: u8, i: usize) -> Step {
        match c {
            CLOSE_BRACKET => {
                if self.worst() < Band::Deprecated.ceiling() {
                    let content = self.literal.as_deref().unwrap_or_default();
                    for kind in literal::classify(content) {
                        self.record(kind);
                    }
                } else {
                    self.record(Kind::DomainLiteral);
                }
                self.domain.push(c);
                self.prior = self.context;
                self.close(Step::Next)
            }
            BACKSLASH => {
                self.record(Kind::DomLitObsDtext);
                self.enter(Context::QuotedPair);
                Step::Next
            }
            CR | SP | HTAB => {
                if c == CR && !self.lf_follows(i) {
                    return Step::Halt;
                }
                self.record(Kind::CfwsFws);
                self.open_fws(c)
            }
            _ => {
                if c > 127 || c == 0 || c == OPEN_BRACKET {
                    self.record(Kind::ExpectingDtext);
                    return Step::Halt;
                }
                if is_obsolete_control(c) {
                    // SP and HTAB never get here
                    self.record(Kind::DomLitObsDtext);
                }
                if let Some(literal) = self.literal.as_mut() {
                    literal.push(c);
                }
                self.domain.push(c);
                Step::Next
            }
        }
    }

    fn quoted_string(&mut self, c: u8, i: usize) -> Step {
        match c {
            BACKSLASH => {
                self.enter(Context::QuotedPair);
                Step::Next
            }
            // bare SP is qtext here
            CR | HTAB => {
                if c == CR && !self.lf_follows(i) {
                    return Step::Halt;
                }
                // folded whitespace reads as a single space
                self.local.push(SP);
                self.record(Kind::CfwsFws);
                self.open_fws(c)
            }
            DQUOTE => {
                self.local.push(c);
                self.prior = self.context;
                self.close(Step::Next)
            }
            _ => {
                if c > 127 || c == 0 || c == LF {
                    self.record(Kind::ExpectingQtext);
                } else if is_obsolete_control(c) {
                    self.record(Kind::DeprecQtext);
                }
                self.local.push(c);
                Step::Next
            }
        }
    }

    fn quoted_pair(&mut self, c: u8) -> Step {
        if c > 127 {
            self.record(Kind::ExpectingQpair);
        } else if (c < 31 && c != HTAB) || c == 127 {
            self.record(Kind::DeprecQp);
        }

        self.prior = self.context;
        if !self.leave() {
            return Step::Halt;
        }

        match self.context {
            Context::Comment => {}
            Context::QuotedString => self.local.push_pair(c),
            Context::Literal => self.domain.push_pair(c),
            _ => {
                self.record(Kind::BadParse);
                return Step::Halt;
            }
        }
        Step::Next
    }

    fn comment(&mut self, c: u8, i: usize) -> Step {
        match c {
            OPEN_PAREN => {
                self.enter(Context::Comment);
                Step::Next
            }
            CLOSE_PAREN => {
                self.prior = self.context;
                self.close(Step::Next)
            }
            BACKSLASH => {
                self.enter(Context::QuotedPair);
                Step::Next
            }
            CR | SP | HTAB => {
                if c == CR && !self.lf_follows(i) {
                    return Step::Halt;
                }
                self.record(Kind::CfwsFws);
                self.open_fws(c)
            }
            _ => {
                if c > 127 || c == 0 || c == LF {
                    self.record(Kind::ExpectingCtext);
                } else if is_obsolete_control(c) {
                    self.record(Kind::DeprecCtext);
                }
                Step::Next
            }
        }
    }

    fn fws(&mut self, c: u8, i: usize) -> Step {
        if self.token_prior == Some(CR) {
            if c == CR {
                self.record(Kind::FwsCrlfX2);
                return Step::Halt;
            }
            let folds = self.crlf_count.map_or(1, |n| n + 1);
            self.crlf_count = Some(folds);
            if folds > 1 {
                self.record(Kind::DeprecFws);
            }
        }

        match c {
            CR => {
                if !self.lf_follows(i) {
                    return Step::Halt;
                }
                self.token_prior = Some(c);
                Step::SkipLf
            }
            SP | HTAB => {
                self.token_prior = Some(c);
                Step::Next
            }
            _ => {
                // a fold must be followed by whitespace
                if self.token_prior == Some(CR) {
                    self.record(Kind::FwsCrlfEnd);
                    return Step::Halt;
                }
                self.crlf_count = None;
                self.prior = self.context;
                self.close(Step::Redo)
            }
        }
    }
}
