use thiserror::Error;

/// A string did not match any variant of one of the fixed enumerations
/// (pipeline stage, job status, question kind).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value '{value}'")]
pub struct InvalidValue {
    /// Which enumeration was being parsed, e.g. `"stage"`.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

impl InvalidValue {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
