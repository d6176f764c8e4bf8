//! Errores de persistencia.
//! Agrupa fallos de disco, de serialización y de proyecto; los errores del
//! engine se envuelven tal cual.

use std::path::PathBuf;

use pot_adapters::AdapterError;
use pot_core::{ArtifactError, CoreEngineError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("json error on {}: {source}", path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("{} is not a potflow project", .0.display())]
    NotInitialized(PathBuf),
    #[error("{} is already a potflow project", .0.display())]
    AlreadyInitialized(PathBuf),
    #[error("version control: {0}")]
    Vcs(String),
    #[error("configuration: {0}")]
    Config(String),
    #[error("node '{0}' has no output manifest (was the project run?)")]
    MissingManifest(String),
    #[error("node '{node}' has no output port '{port}'")]
    UnknownPort { node: String, port: String },
    #[error("artifact {hash} not found in cache")]
    MissingArtifact { hash: String },
    #[error("decode: {0}")]
    Decode(#[from] ArtifactError),
    #[error(transparent)]
    Engine(#[from] CoreEngineError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> Self {
        let path = path.into();
        move |source| Self::Json { path, source }
    }
}

/// Los stores del engine sólo pueden devolver `CoreEngineError`.
impl From<PersistenceError> for CoreEngineError {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::Engine(inner) => inner,
            other => CoreEngineError::Storage(other.to_string()),
        }
    }
}
