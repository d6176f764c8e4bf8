use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Artifact;
use crate::node::OutputRef;

/// Directorio de trabajo de un nodo dentro de un proyecto.
///
/// `relative_dir` es relativo a `root` (p. ej. `nodes/MLModel`); los nodos que
/// publican rutas hacia afuera (metadatos de despliegue) usan la forma
/// relativa para que el proyecto siga siendo relocalizable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeWorkspace {
    pub root: PathBuf,
    pub relative_dir: PathBuf,
}

impl NodeWorkspace {
    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.relative_dir)
    }
}

/// Contexto de ejecución entregado a `NodeDefinition::run`.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub node: String,
    pub inputs: BTreeMap<OutputRef, Artifact>, // artifacts upstream ya resueltos por el engine
    pub params: Value,                         // parámetros canónicos
    pub workspace: Option<NodeWorkspace>,
}

impl ExecutionContext {
    /// Decodifica los params al tipo del nodo.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.params.clone())
    }

    pub fn input(&self, source: &OutputRef) -> Option<&Artifact> {
        self.inputs.get(source)
    }

    /// Workspace del nodo o error si el engine corre sin proyecto.
    pub fn workspace(&self) -> Result<&NodeWorkspace, crate::errors::CoreEngineError> {
        self.workspace
            .as_ref()
            .ok_or_else(|| crate::errors::CoreEngineError::MissingWorkspace(self.node.clone()))
    }

    pub fn root(&self) -> Option<&Path> {
        self.workspace.as_ref().map(|w| w.root.as_path())
    }
}
