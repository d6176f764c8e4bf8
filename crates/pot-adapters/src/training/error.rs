use thiserror::Error;

use pot_domain::DomainError;

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("unsupported device '{0}' (only 'cpu' is available)")]
    UnsupportedDevice(String),
    #[error("species '{0}' is not part of the model")]
    UnknownSpecies(String),
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("training structure {index} has no '{label}' label")]
    MissingLabel { index: usize, label: &'static str },
    #[error("normal equations are not positive definite (pivot {pivot} at row {row})")]
    NotPositiveDefinite { row: usize, pivot: f64 },
    #[error("invalid trainer configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}
