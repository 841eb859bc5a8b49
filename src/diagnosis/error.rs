use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagnosisError {
    #[error("unknown diagnosis tag '{0}'")]
    UnknownTag(String),
}

impl DiagnosisError {
    pub(crate) fn unknown_tag(tag: impl Into<String>) -> Self {
        Self::UnknownTag(tag.into())
    }
}
