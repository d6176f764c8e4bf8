//! Almacenamiento de artifacts direccionado por contenido.
//!
//! El engine sólo guarda artifacts ya sellados (con hash); un mismo payload
//! producido dos veces ocupa una sola entrada.

use std::collections::HashMap;

use crate::errors::CoreEngineError;
use crate::model::Artifact;

pub trait ArtifactStore {
    /// Persiste el artifact bajo su hash. Idempotente.
    fn put(&mut self, artifact: &Artifact) -> Result<(), CoreEngineError>;
    /// Recupera un artifact por hash.
    fn get(&self, hash: &str) -> Result<Option<Artifact>, CoreEngineError>;
}

#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    pub inner: HashMap<String, Artifact>,
}

impl ArtifactStore for InMemoryArtifactStore {
    fn put(&mut self, artifact: &Artifact) -> Result<(), CoreEngineError> {
        if artifact.hash.is_empty() {
            return Err(CoreEngineError::Storage("artifact without hash".into()));
        }
        self.inner.entry(artifact.hash.clone()).or_insert_with(|| artifact.clone());
        Ok(())
    }

    fn get(&self, hash: &str) -> Result<Option<Artifact>, CoreEngineError> {
        Ok(self.inner.get(hash).cloned())
    }
}
