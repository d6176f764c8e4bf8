use thiserror::Error;

/// Errores del modelo de estructuras y de sus operaciones puras.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("unknown chemical symbol '{0}'")]
    UnknownElement(String),
    #[error("structure has {symbols} symbols but {positions} positions")]
    LengthMismatch { symbols: usize, positions: usize },
    #[error("label '{label}' has {found} entries, expected {expected}")]
    LabelShape { label: &'static str, expected: usize, found: usize },
    #[error("structure {index} has no '{label}' label")]
    MissingLabel { index: usize, label: &'static str },
    #[error("cell is singular (volume {0})")]
    SingularCell(f64),
    #[error("requested {requested} structures but only {available} are available")]
    NotEnoughStructures { requested: usize, available: usize },
    #[error("non-finite value in '{0}'")]
    NonFinite(&'static str),
    #[error("calculator has no '{0}' result")]
    NoResult(&'static str),
    #[error("calculation failed: {0}")]
    Calculation(String),
}
