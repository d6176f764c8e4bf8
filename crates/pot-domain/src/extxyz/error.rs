use thiserror::Error;

use crate::DomainError;

#[derive(Debug, Error)]
pub enum ExtxyzError {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse extended XYZ data: {details} (at line {line})")]
    Parse { line: usize, details: String },

    #[error("invalid structure at line {line}: {source}")]
    Invalid { line: usize, source: DomainError },
}

impl ExtxyzError {
    pub fn parse(line: usize, details: impl Into<String>) -> Self {
        Self::Parse { line,
                      details: details.into() }
    }
}
