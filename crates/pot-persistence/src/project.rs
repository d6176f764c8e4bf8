//! Proyecto en disco: raíz explícita + metadatos + stores del engine.
//!
//! Toda operación recibe la raíz del proyecto; nada depende del directorio
//! de trabajo del proceso.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use pot_adapters::{TrainedModel, TrainedModelArtifact};
use pot_core::{Artifact, ArtifactSpec, FlowDefinition, FlowEngine, InMemoryFlowRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{ProjectConfig, VcsKind};
use crate::fs::{FsArtifactStore, FsEventStore, ManifestSink, NodeManifest, MANIFEST_FILE};
use crate::vcs::{GitCli, NoVcs, VersionControl};
use crate::PersistenceError;

pub const PROJECT_FILE: &str = "project.json";

/// Contenido de `<meta>/project.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub engine_version: String,
    pub nodes_dir: PathBuf,
    pub vcs: String,
}

pub type ProjectEngine = FlowEngine<FsEventStore, FsArtifactStore, InMemoryFlowRepository>;

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    meta_dir: PathBuf,
    meta: ProjectMeta,
}

impl Project {
    /// Crea la raíz si hace falta, inicializa VCS y escribe los metadatos.
    pub fn init(root: impl AsRef<Path>, config: &ProjectConfig) -> Result<Self, PersistenceError> {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(&config.meta_dir);
        let meta_file = meta_dir.join(PROJECT_FILE);
        if meta_file.exists() {
            return Err(PersistenceError::AlreadyInitialized(root));
        }
        fs::create_dir_all(&root).map_err(PersistenceError::io(&root))?;

        let vcs: Box<dyn VersionControl> = match config.vcs {
            VcsKind::Git => Box::new(GitCli),
            VcsKind::None => Box::new(NoVcs),
        };
        vcs.init(&root)?;

        for dir in [meta_dir.join("events"), meta_dir.join("cache"), root.join(&config.nodes_dir)] {
            fs::create_dir_all(&dir).map_err(PersistenceError::io(&dir))?;
        }
        let ignore = meta_dir.join(".gitignore");
        fs::write(&ignore, "cache/\n").map_err(PersistenceError::io(&ignore))?;

        let name = root.file_name()
                       .map(|n| n.to_string_lossy().into_owned())
                       .unwrap_or_else(|| "project".to_string());
        let meta = ProjectMeta { name,
                                 created_at: Utc::now(),
                                 engine_version: pot_core::constants::ENGINE_VERSION.to_string(),
                                 nodes_dir: config.nodes_dir.clone(),
                                 vcs: vcs.name().to_string() };
        let bytes = serde_json::to_vec_pretty(&meta).map_err(PersistenceError::json(&meta_file))?;
        fs::write(&meta_file, bytes).map_err(PersistenceError::io(&meta_file))?;
        info!("initialized project '{}' at {} (vcs: {})", meta.name, root.display(), meta.vcs);
        Ok(Self { root, meta_dir, meta })
    }

    /// Abre un proyecto existente usando la configuración del entorno.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        Self::open_with(root, &ProjectConfig::from_env()?)
    }

    pub fn open_with(root: impl AsRef<Path>, config: &ProjectConfig) -> Result<Self, PersistenceError> {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(&config.meta_dir);
        let meta_file = meta_dir.join(PROJECT_FILE);
        if !meta_file.is_file() {
            return Err(PersistenceError::NotInitialized(root));
        }
        let bytes = fs::read(&meta_file).map_err(PersistenceError::io(&meta_file))?;
        let meta: ProjectMeta = serde_json::from_slice(&bytes).map_err(PersistenceError::json(&meta_file))?;
        Ok(Self { root, meta_dir, meta })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta(&self) -> &ProjectMeta {
        &self.meta
    }

    /// Directorio absoluto de nodos.
    pub fn nodes_dir(&self) -> PathBuf {
        self.root.join(&self.meta.nodes_dir)
    }

    pub fn event_store(&self) -> FsEventStore {
        FsEventStore::new(self.meta_dir.join("events"))
    }

    pub fn artifact_store(&self) -> FsArtifactStore {
        FsArtifactStore::new(self.meta_dir.join("cache"))
    }

    /// Engine con stores de disco, workspace en la raíz y manifiestos.
    pub fn engine(&self) -> ProjectEngine {
        let mut engine = FlowEngine::new_with_stores(self.event_store(),
                                                     self.artifact_store(),
                                                     InMemoryFlowRepository::new())
                                                     .with_workspace(&self.root, &self.meta.nodes_dir);
        engine.add_sink(Box::new(ManifestSink::new(self.nodes_dir())));
        engine
    }

    /// Ejecuta el grafo completo; cada nodo publica su manifiesto antes de
    /// que arranquen sus dependientes.
    ///
    /// Los manifiestos previos de los nodos del grafo se retiran antes de
    /// arrancar: tras un fallo sólo quedan los de los nodos que terminaron en
    /// este flujo.
    pub fn run(&self, definition: &FlowDefinition) -> Result<Uuid, PersistenceError> {
        let nodes_dir = self.nodes_dir();
        for node in definition.order() {
            if NodeManifest::remove(&nodes_dir, node)? {
                debug!("stale manifest removed for node {node}");
            }
        }
        let mut engine = self.engine();
        let flow_id = engine.run(definition)?;
        info!("project '{}': flow {flow_id} completed ({} nodes)", self.meta.name, definition.len());
        Ok(flow_id)
    }

    /// Manifiesto de outputs de `node` (se lee de disco en cada llamada).
    pub fn load_outputs(&self, node: &str) -> Result<NodeManifest, PersistenceError> {
        NodeManifest::read(&self.nodes_dir(), node)
    }

    pub fn load_artifact(&self, node: &str, port: &str) -> Result<Artifact, PersistenceError> {
        let manifest = self.load_outputs(node)?;
        let hash = manifest.hash_of(port)?;
        self.artifact_store()
            .load(hash)?
            .ok_or_else(|| PersistenceError::MissingArtifact { hash: hash.to_string() })
    }

    pub fn load<T: ArtifactSpec>(&self, node: &str, port: &str) -> Result<T, PersistenceError> {
        Ok(T::from_artifact(&self.load_artifact(node, port)?)?)
    }

    /// Modelo entrenado publicado por `node` en su puerto `model`.
    pub fn load_model(&self, node: &str) -> Result<TrainedModel, PersistenceError> {
        let artifact: TrainedModelArtifact = self.load(node, "model")?;
        Ok(TrainedModel::new(artifact, &self.root))
    }

    /// Manifiestos de todos los nodos ejecutados, por nombre.
    pub fn manifests(&self) -> Result<Vec<NodeManifest>, PersistenceError> {
        let nodes_dir = self.nodes_dir();
        if !nodes_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&nodes_dir).map_err(PersistenceError::io(&nodes_dir))? {
            let entry = entry.map_err(PersistenceError::io(&nodes_dir))?;
            if entry.path().join(MANIFEST_FILE).is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        names.iter().map(|n| self.load_outputs(n)).collect()
    }
}
