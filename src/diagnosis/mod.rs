//! Diagnosis taxonomy: severity bands, the closed catalogue of kinds and the
//! citations attached to them.

mod catalogue;
mod error;
mod reference;
mod types;

pub use catalogue::Kind;
pub use error::DiagnosisError;
pub use reference::{Reference, lookup};
pub use types::{Band, Diagnosis, THRESHOLD};
