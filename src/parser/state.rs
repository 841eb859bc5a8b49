use super::context::{BACKSLASH, Context};
use crate::diagnosis::Kind;

/// Text accumulated for one side of the `@`.
#[derive(Debug, Clone)]
pub(crate) struct Part {
    pub text: Vec<u8>,
    /// Dot-separated atoms, or the quoted/bracketed unit. Never empty.
    pub elements: Vec<Vec<u8>>,
    /// Octets in the element being built.
    pub element_len: usize,
}

impl Part {
    pub fn new() -> Self {
        Self {
            text: Vec::new(),
            elements: vec![Vec::new()],
            element_len: 0,
        }
    }

    /// Index of the current element.
    pub fn element_count(&self) -> usize {
        self.elements.len() - 1
    }

    pub fn last_element(&self) -> &[u8] {
        self.elements.last().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn push(&mut self, c: u8) {
        self.text.push(c);
        if let Some(element) = self.elements.last_mut() {
            element.push(c);
        }
        self.element_len += 1;
    }

    /// Re-emit a quoted pair with its backslash.
    pub fn push_pair(&mut self, c: u8) {
        self.text.extend_from_slice(&[BACKSLASH, c]);
        if let Some(element) = self.elements.last_mut() {
            element.extend_from_slice(&[BACKSLASH, c]);
        }
        self.element_len += 2;
    }

    /// Close the current element on a dot.
    pub fn next_element(&mut self, dot: u8) {
        self.text.push(dot);
        self.elements.push(Vec::new());
        self.element_len = 0;
    }
}

/// Everything one scan owns. Created per call, never shared.
#[derive(Debug)]
pub(crate) struct ScanState<'a> {
    pub input: &'a [u8],
    pub context: Context,
    /// Where we've been; the base frame is the side being scanned.
    pub stack: Vec<Context>,
    /// Context closed most recently.
    pub prior: Context,
    /// Last byte examined (an LF consumed as part of CRLF is not recorded).
    pub token: Option<u8>,
    /// Last whitespace byte seen while entering or inside FWS.
    pub token_prior: Option<u8>,
    pub local: Part,
    pub domain: Part,
    pub in_domain: bool,
    /// Content strictly inside `[...]`, once a literal has opened.
    pub literal: Option<Vec<u8>>,
    pub hyphen_flag: bool,
    pub end_or_die: bool,
    pub crlf_count: Option<u32>,
    /// Append-only; index 0 is the `Valid` placeholder.
    pub diagnoses: Vec<Kind>,
}

impl<'a> ScanState<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            context: Context::LocalPart,
            stack: vec![Context::LocalPart],
            prior: Context::LocalPart,
            token: None,
            token_prior: None,
            local: Part::new(),
            domain: Part::new(),
            in_domain: false,
            literal: None,
            hyphen_flag: false,
            end_or_die: false,
            crlf_count: None,
            diagnoses: vec![Kind::Valid],
        }
    }

    /// Side of the address currently being built.
    pub fn part(&self) -> &Part {
        if self.in_domain {
            &self.domain
        } else {
            &self.local
        }
    }

    pub fn record(&mut self, kind: Kind) {
        self.diagnoses.push(kind);
    }

    /// Highest code recorded so far.
    pub fn worst(&self) -> u8 {
        self.diagnoses
            .iter()
            .map(|kind| kind.code())
            .max()
            .unwrap_or(Kind::Valid.code())
    }

    pub fn enter(&mut self, next: Context) {
        #[cfg(feature = "with-tracing")]
        tracing::trace!(from = ?self.context, to = ?next, depth = self.stack.len(), "push context");
        self.stack.push(self.context);
        self.context = next;
    }

    /// Pop back to the enclosing context. An empty stack is a parse failure.
    pub fn leave(&mut self) -> bool {
        match self.stack.pop() {
            Some(previous) => {
                #[cfg(feature = "with-tracing")]
                tracing::trace!(from = ?self.context, to = ?previous, depth = self.stack.len(), "pop context");
                self.context = previous;
                true
            }
            None => {
                self.record(Kind::BadParse);
                false
            }
        }
    }

    /// Switch from the local part to the domain; nothing is carried over.
    pub fn start_domain(&mut self) {
        self.context = Context::Domain;
        self.stack = vec![Context::Domain];
        self.in_domain = true;
        self.end_or_die = false;
    }
}
