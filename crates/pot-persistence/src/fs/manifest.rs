//! Manifiesto de outputs por nodo (`<nodes>/<name>/outputs.json`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use pot_core::{CoreEngineError, NodeCompletion, OutputSink};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::PersistenceError;

pub const MANIFEST_FILE: &str = "outputs.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeManifest {
    pub node: String,
    pub flow_id: Uuid,
    pub fingerprint: String,
    /// puerto -> hash del artifact
    pub outputs: BTreeMap<String, String>,
}

impl NodeManifest {
    pub fn path(nodes_dir: &Path, node: &str) -> PathBuf {
        nodes_dir.join(node).join(MANIFEST_FILE)
    }

    pub fn read(nodes_dir: &Path, node: &str) -> Result<Self, PersistenceError> {
        let path = Self::path(nodes_dir, node);
        if !path.is_file() {
            return Err(PersistenceError::MissingManifest(node.to_string()));
        }
        let bytes = fs::read(&path).map_err(PersistenceError::io(&path))?;
        serde_json::from_slice(&bytes).map_err(PersistenceError::json(&path))
    }

    pub fn write(&self, nodes_dir: &Path) -> Result<(), PersistenceError> {
        let path = Self::path(nodes_dir, &self.node);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(PersistenceError::io(parent))?;
        }
        let bytes = serde_json::to_vec_pretty(self).map_err(PersistenceError::json(&path))?;
        fs::write(&path, bytes).map_err(PersistenceError::io(&path))
    }

    /// Borra el manifiesto de `node` si existe.
    pub fn remove(nodes_dir: &Path, node: &str) -> Result<bool, PersistenceError> {
        let path = Self::path(nodes_dir, node);
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(PersistenceError::io(&path))?;
        Ok(true)
    }

    pub fn hash_of(&self, port: &str) -> Result<&str, PersistenceError> {
        self.outputs
            .get(port)
            .map(String::as_str)
            .ok_or_else(|| PersistenceError::UnknownPort { node: self.node.clone(),
                                                           port: port.to_string() })
    }
}

/// `OutputSink` que publica el manifiesto de cada nodo al terminar.
#[derive(Debug, Clone)]
pub struct ManifestSink {
    nodes_dir: PathBuf,
}

impl ManifestSink {
    pub fn new(nodes_dir: impl Into<PathBuf>) -> Self {
        Self { nodes_dir: nodes_dir.into() }
    }
}

impl OutputSink for ManifestSink {
    fn on_node_finished(&mut self, completion: NodeCompletion<'_>) -> Result<(), CoreEngineError> {
        let manifest = NodeManifest { node: completion.node.to_string(),
                                      flow_id: completion.flow_id,
                                      fingerprint: completion.fingerprint.to_string(),
                                      outputs: completion.outputs.clone() };
        manifest.write(&self.nodes_dir)?;
        debug!("manifest written for node {}", completion.node);
        Ok(())
    }
}
