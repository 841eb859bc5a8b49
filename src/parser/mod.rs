//! Pushdown scanner for RFC 5321/5322 addresses.
//!
//! [`parse`] walks the address one octet at a time, recording diagnoses as
//! it goes, then runs the end-of-input checks and returns a [`ParseReport`].

mod context;
mod finalize;
mod literal;
mod scanner;
mod state;
mod types;

pub use types::{ParseReport, ParserOptions, ValidationMode};

/// Scan `address` and collect every finding.
pub fn parse(address: &str, options: &ParserOptions) -> ParseReport {
    finalize::finish(scanner::scan(address), options)
}
