#![forbid(unsafe_code)]
//! maildiag_lib — diagnostic syntaxique d'adresses e-mail (RFC 5321/5322/1123/4291)
//!
//! ```
//! use maildiag_lib::{Kind, diagnose, is_email};
//!
//! assert!(is_email("test@example.com"));
//! assert!(!is_email("a..b@example.com"));
//! assert_eq!(diagnose("\"quoted local\"@example.com").kind(), Kind::QuotedString);
//! ```

pub mod diagnosis;
pub mod parser;

pub use diagnosis::{Band, Diagnosis, DiagnosisError, Kind, Reference, THRESHOLD, lookup};
pub use parser::{ParseReport, ParserOptions, ValidationMode, parse};

/// Result of [`validate`]: a flag, or the worst diagnosis when one was asked for.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Flag(bool),
    Diagnosis(Diagnosis),
}

impl Verdict {
    /// The flag itself, or whether the diagnosis sits below [`THRESHOLD`].
    pub fn is_valid(&self) -> bool {
        match self {
            Verdict::Flag(ok) => *ok,
            Verdict::Diagnosis(diagnosis) => diagnosis.is_valid(),
        }
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            Verdict::Flag(_) => None,
            Verdict::Diagnosis(diagnosis) => Some(diagnosis),
        }
    }
}

/// `true` when the address can be used unmodified in an SMTP envelope.
pub fn is_email(address: &str) -> bool {
    diagnose(address).is_valid()
}

/// Worst finding for the address, with its message and citations.
pub fn diagnose(address: &str) -> Diagnosis {
    parse(address, &ParserOptions::standard()).worst
}

/// `Verdict::Flag` with the boolean verdict, or `Verdict::Diagnosis` with the
/// worst finding when `diagnose` is set.
pub fn validate(address: &str, diagnose: bool) -> Verdict {
    validate_with_options(address, diagnose, &ParserOptions::standard())
}

/// Like [`validate`], with the verdict cutoff taken from `options.mode`.
pub fn validate_with_options(address: &str, diagnose: bool, options: &ParserOptions) -> Verdict {
    let report = parse(address, options);
    if diagnose {
        Verdict::Diagnosis(report.worst)
    } else {
        Verdict::Flag(report.is_valid())
    }
}
