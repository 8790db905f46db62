//! Error taxonomy shared by the curation workflows.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurateError {
    /// A required input file is missing. Always fatal.
    #[error("{kind} not found: {}", path.display())]
    MissingInput { kind: &'static str, path: PathBuf },

    /// The expected `name = { ... }` assignment is absent from the source.
    #[error("could not locate the `{name}` assignment")]
    AssignmentNotFound { name: String },

    /// The located text could not be read as an object literal.
    #[error("malformed {context} at byte {offset}: {message}")]
    Parse { context: String, offset: usize, message: String },

    #[error("invalid decision for '{scale}': {message}")]
    InvalidDecision { scale: String, message: String },
}

impl CurateError {
    pub fn missing(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { kind, path: path.into() }
    }

    pub fn assignment(name: &str) -> Self {
        Self::AssignmentNotFound { name: name.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, CurateError>;
