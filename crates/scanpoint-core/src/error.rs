//! Error types shared by every scanpoint crate.

use thiserror::Error;

/// Errors raised while building, preparing or reading a scan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// Generators, excluders or mutators were wired together inconsistently
    /// (axis collision, size/alternate mismatch, empty lists, bad parameters).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A point was requested before `prepare()` completed.
    #[error("generator has not been prepared")]
    NotPrepared,

    /// A retrieval index or range fell outside `[0, size)`.
    #[error("requested range [{start}, {end}) is outside [0, {size})")]
    OutOfRange { start: usize, end: usize, size: usize },

    /// A generator was asked for an index outside its own `[0, size)`.
    #[error("{generator}: index {index} is outside [0, {size})")]
    IndexRange {
        generator: String,
        index: usize,
        size: usize,
    },

    /// Deserialization met an unregistered typeid or a malformed structure.
    #[error("unknown variant '{typeid}': {detail}")]
    UnknownVariant { typeid: String, detail: String },
}

impl ScanError {
    /// Shorthand for [`ScanError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
