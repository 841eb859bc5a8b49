//! End-of-input checks and aggregation of the recorded diagnoses.

use super::context::{CR, Context};
use super::state::ScanState;
use super::types::{ParseReport, ParserOptions};
use crate::diagnosis::{Band, Diagnosis, Kind};

/// Longest domain, RFC 5321 section 4.5.3.1.2.
const MAX_DOMAIN: usize = 255;
/// Longest mailbox, RFC 3696 erratum 1690.
const MAX_MAILBOX: usize = 254;
const MAX_LABEL: usize = 63;

/// Close the scan and build the report.
pub(crate) fn finish(mut state: ScanState<'_>, options: &ParserOptions) -> ParseReport {
    if state.worst() < Band::Rfc5322.ceiling() {
        structural_checks(&mut state);
    }
    if options.tld_warnings && state.worst() < Band::DnsWarn.ceiling() {
        tld_checks(&mut state);
    }

    let mut kinds: Vec<Kind> = Vec::with_capacity(state.diagnoses.len());
    for kind in &state.diagnoses {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }
    let worst = kinds
        .iter()
        .copied()
        .max_by_key(|kind| kind.code())
        .unwrap_or(Kind::Valid);
    // drop the placeholder once something else was found
    if kinds.len() > 1 {
        kinds.remove(0);
    }

    #[cfg(feature = "with-tracing")]
    tracing::debug!(worst = %worst, count = kinds.len(), "verdict");

    let text = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();
    ParseReport {
        address: text(state.input),
        local_part: text(&state.local.text),
        domain: text(&state.domain.text),
        literal: state.literal.as_deref().map(text),
        local_elements: state.local.elements.iter().map(|e| text(e)).collect(),
        domain_elements: state.domain.elements.iter().map(|e| text(e)).collect(),
        diagnoses: kinds.into_iter().map(Diagnosis::new).collect(),
        worst: Diagnosis::new(worst),
        mode: options.mode,
    }
}

/// First failing check wins.
fn structural_checks(state: &mut ScanState<'_>) {
    let element_len = state.part().element_len;
    let domain_len = state.domain.text.len();

    let found = match state.context {
        Context::QuotedString => Some(Kind::UnclosedQuotedStr),
        Context::QuotedPair => Some(Kind::BackslashEnd),
        Context::Comment => Some(Kind::UnclosedComment),
        Context::Literal => Some(Kind::UnclosedDomLit),
        _ if state.token == Some(CR) => Some(Kind::FwsCrlfEnd),
        _ if domain_len == 0 => Some(Kind::NoDomain),
        _ if element_len == 0 => Some(Kind::DotEnd),
        _ if state.hyphen_flag => Some(Kind::DomainHyphenEnd),
        _ if domain_len > MAX_DOMAIN => Some(Kind::DomainTooLong),
        _ if state.local.text.len() + 1 + domain_len > MAX_MAILBOX => Some(Kind::TooLong),
        _ if element_len > MAX_LABEL => Some(Kind::LabelTooLong),
        _ => None,
    };
    if let Some(kind) = found {
        state.record(kind);
    }
}

fn tld_checks(state: &mut ScanState<'_>) {
    if state.domain.element_count() == 0 {
        state.record(Kind::Tld);
    }
    if state
        .domain
        .last_element()
        .first()
        .is_some_and(u8::is_ascii_digit)
    {
        state.record(Kind::TldNumeric);
    }
}
