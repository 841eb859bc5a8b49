use crate::diagnosis::{Band, Diagnosis, THRESHOLD};

/// Où placer la limite du verdict booléen.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Usable unmodified in an SMTP envelope (codes below 16).
    #[default]
    Strict,
    /// Acceptable inside message headers: comments, folding white space
    /// and obsolete forms pass, RFC 5322-only and invalid results do not.
    Relaxed,
}

impl ValidationMode {
    /// Codes strictly below this value are accepted.
    pub const fn threshold(self) -> u8 {
        match self {
            ValidationMode::Strict => THRESHOLD,
            ValidationMode::Relaxed => Band::Deprecated.ceiling() + 1,
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Warn about single-label domains and numeric top-level labels.
    pub tld_warnings: bool,
    pub mode: ValidationMode,
}

impl ParserOptions {
    /// Strict verdict, no TLD warnings.
    pub const fn standard() -> Self {
        Self {
            tld_warnings: false,
            mode: ValidationMode::Strict,
        }
    }

    pub const fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn with_tld_warnings(mut self) -> Self {
        self.tld_warnings = true;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Everything a scan learned about one address.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub address: String,
    pub local_part: String,
    pub domain: String,
    /// Content between the brackets of a domain literal.
    pub literal: Option<String>,
    pub local_elements: Vec<String>,
    pub domain_elements: Vec<String>,
    /// Deduplicated, in emission order. Holds only `Valid` when nothing
    /// else was found.
    pub diagnoses: Vec<Diagnosis>,
    pub worst: Diagnosis,
    pub mode: ValidationMode,
}

impl ParseReport {
    pub fn is_valid(&self) -> bool {
        self.worst.code() < self.mode.threshold()
    }

    /// Every finding of at least `band`.
    pub fn at_least(&self, band: Band) -> impl Iterator<Item = &Diagnosis> + '_ {
        self.diagnoses.iter().filter(move |d| d.band() >= band)
    }
}
