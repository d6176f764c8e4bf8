use std::path::PathBuf;

use pot_core::{ArtifactError, CoreEngineError};
use pot_domain::{DomainError, ExtxyzError};
use thiserror::Error;

use crate::training::TrainerError;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Extxyz(#[from] ExtxyzError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Trainer(#[from] TrainerError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("unsupported model format '{found}'")]
    ModelFormat { found: String },
    #[error("deployed model {} does not match its recorded digest", path.display())]
    DigestMismatch { path: PathBuf },
}

impl From<AdapterError> for CoreEngineError {
    fn from(e: AdapterError) -> Self {
        CoreEngineError::NodeExecution(e.to_string())
    }
}
