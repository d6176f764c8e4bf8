//! Core FlowEngine implementation

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde_json::json;
use uuid::Uuid;

use crate::engine::sink::{NodeCompletion, OutputSink};
use crate::errors::CoreEngineError;
use crate::event::{EventStore, FlowEvent, FlowEventKind, InMemoryEventStore};
use crate::hashing::hash_value;
use crate::model::{Artifact, ExecutionContext, NodeFingerprintInput, NodeWorkspace};
use crate::node::{NodeDefinition, NodeRunResult};
use crate::repo::{FlowDefinition, FlowRepository, InMemoryFlowRepository};
use crate::store::{ArtifactStore, InMemoryArtifactStore};

/// Motor de ejecución de grafos deterministas.
///
/// Ejecuta los nodos de una `FlowDefinition` en orden topológico, persiste
/// cada output en el `ArtifactStore` antes de arrancar a los dependientes y
/// registra el progreso como eventos. El estado se reconstruye siempre por
/// replay, por lo que el engine no guarda cursores mutables.
#[derive(Debug)]
pub struct FlowEngine<E, A, R>
    where E: EventStore,
          A: ArtifactStore,
          R: FlowRepository
{
    event_store: E,
    artifact_store: A,
    repository: R,
    workspace_root: Option<PathBuf>,
    nodes_dir: PathBuf,
    sinks: Vec<Box<dyn OutputSink>>,
    default_flow_id: Option<Uuid>,
}

impl FlowEngine<InMemoryEventStore, InMemoryArtifactStore, InMemoryFlowRepository> {
    /// Engine con stores en memoria y sin workspace.
    pub fn in_memory() -> Self {
        Self::new_with_stores(InMemoryEventStore::default(),
                              InMemoryArtifactStore::default(),
                              InMemoryFlowRepository::new())
    }
}

impl Default for FlowEngine<InMemoryEventStore, InMemoryArtifactStore, InMemoryFlowRepository> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<E, A, R> FlowEngine<E, A, R>
    where E: EventStore,
          A: ArtifactStore,
          R: FlowRepository
{
    /// Crea un nuevo motor con los stores proporcionados.
    pub fn new_with_stores(event_store: E, artifact_store: A, repository: R) -> Self {
        Self { event_store,
               artifact_store,
               repository,
               workspace_root: None,
               nodes_dir: PathBuf::from("nodes"),
               sinks: Vec::new(),
               default_flow_id: None }
    }

    /// Fija la raíz del proyecto: cada nodo recibe `root/nodes_dir/<nombre>`.
    pub fn with_workspace(mut self, root: impl Into<PathBuf>, nodes_dir: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self.nodes_dir = nodes_dir.into();
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn OutputSink>) {
        self.sinks.push(sink);
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn artifact_store(&self) -> &A {
        &self.artifact_store
    }

    /// Recupera un artifact por su hash.
    pub fn get_artifact(&self, hash: &str) -> Result<Option<Artifact>, CoreEngineError> {
        self.artifact_store.get(hash)
    }

    /// Obtiene el `flow_id` de la última ejecución, si existe.
    pub fn default_flow_id(&self) -> Option<Uuid> {
        self.default_flow_id
    }

    /// Ejecuta el grafo completo con un `flow_id` nuevo y lo retorna.
    pub fn run(&mut self, definition: &FlowDefinition) -> Result<Uuid, CoreEngineError> {
        let flow_id = Uuid::new_v4();
        self.default_flow_id = Some(flow_id);
        info!("flow {flow_id}: running {} nodes {:?}", definition.len(), definition.order());
        self.run_flow_to_completion(flow_id, definition)
    }

    /// Ejecuta un flujo específico hasta su finalización.
    pub fn run_flow_to_completion(&mut self, flow_id: Uuid, definition: &FlowDefinition) -> Result<Uuid, CoreEngineError> {
        loop {
            match self.next_with(flow_id, definition) {
                Ok(()) => continue,
                Err(CoreEngineError::FlowCompleted) => return Ok(flow_id),
                Err(e) => return Err(e),
            }
        }
    }

    /// Ensure a FlowInitialized event exists and return the current events
    /// for the flow (including the possibly newly appended FlowInitialized).
    fn load_or_init(&mut self, flow_id: Uuid, definition: &FlowDefinition) -> Result<Vec<FlowEvent>, CoreEngineError> {
        let mut events = self.event_store.list(flow_id)?;
        let has_init = events.iter().any(|e| matches!(e.kind, FlowEventKind::FlowInitialized { .. }));
        if !has_init {
            if definition.is_empty() {
                warn!("flow {flow_id}: empty definition");
            }
            let ev = self.event_store
                         .append_kind(flow_id,
                                      FlowEventKind::FlowInitialized { definition_hash: definition.definition_hash.clone(),
                                                                       node_count: definition.len() })?;
            events.push(ev);
        }
        Ok(events)
    }

    /// Ejecuta el siguiente nodo pendiente del flujo.
    pub fn next_with(&mut self, flow_id: Uuid, definition: &FlowDefinition) -> Result<(), CoreEngineError> {
        let events = self.load_or_init(flow_id, definition)?;
        let instance = self.repository.load(flow_id, &events, definition);

        if instance.failed {
            return Err(CoreEngineError::FlowHasFailed);
        }
        if instance.completed {
            return Err(CoreEngineError::FlowCompleted);
        }
        let cursor = instance.cursor;
        if cursor >= definition.len() {
            // Grafo vacío o sin cierre registrado
            self.complete_flow(flow_id, definition)?;
            return Err(CoreEngineError::FlowCompleted);
        }

        let node = definition.nodes[cursor].as_ref();
        let mut inputs = BTreeMap::new();
        for input in node.inputs() {
            let hash = definition.index_of(&input.source.node)
                                 .and_then(|i| instance.nodes.get(i))
                                 .and_then(|slot| slot.outputs.get(&input.source.port))
                                 .ok_or_else(|| CoreEngineError::MissingInputs(node.name().to_string()))?;
            let artifact = self.artifact_store
                               .get(hash)?
                               .ok_or_else(|| CoreEngineError::MissingInputs(node.name().to_string()))?;
            inputs.insert(input.source.clone(), artifact);
        }

        let workspace = match &self.workspace_root {
            Some(root) => {
                let ws = NodeWorkspace { root: root.clone(),
                                         relative_dir: self.nodes_dir.join(node.name()) };
                std::fs::create_dir_all(ws.dir()).map_err(|e| CoreEngineError::Storage(e.to_string()))?;
                Some(ws)
            }
            None => None,
        };

        let ctx = ExecutionContext { node: node.name().to_string(),
                                     inputs,
                                     params: node.base_params(),
                                     workspace };

        self.event_store.append_kind(flow_id,
                                     FlowEventKind::NodeStarted { node_index: cursor,
                                                                  node: node.name().to_string() })?;
        debug!("flow {flow_id}: node {} ({}/{}) started", node.name(), cursor + 1, definition.len());

        match node.run(&ctx) {
            NodeRunResult::Success { outputs } => self.handle_node_success(flow_id, cursor, node, outputs, definition),
            NodeRunResult::Failure { error } => self.handle_node_failure(flow_id, cursor, node, error, definition),
        }
    }

    fn hash_and_store_outputs(&mut self,
                              node: &dyn NodeDefinition,
                              outputs: Vec<(String, Artifact)>)
                              -> Result<BTreeMap<String, String>, CoreEngineError> {
        let declared = node.output_ports();
        if let Some(port) = declared.iter().find(|d| !outputs.iter().any(|(p, _)| p == *d)) {
            return Err(CoreEngineError::MissingOutput { node: node.name().to_string(),
                                                        port: port.clone() });
        }
        let mut hashes = BTreeMap::new();
        for (port, mut artifact) in outputs {
            if !declared.iter().any(|p| *p == port) {
                return Err(CoreEngineError::UnknownPort { node: node.name().to_string(),
                                                          target: node.name().to_string(),
                                                          port });
            }
            let h = artifact.seal();
            self.artifact_store.put(&artifact)?;
            hashes.insert(port, h);
        }
        Ok(hashes)
    }

    fn handle_node_success(&mut self,
                           flow_id: Uuid,
                           cursor: usize,
                           node: &dyn NodeDefinition,
                           outputs: Vec<(String, Artifact)>,
                           definition: &FlowDefinition)
                           -> Result<(), CoreEngineError> {
        let output_hashes = match self.hash_and_store_outputs(node, outputs) {
            Ok(h) => h,
            Err(e) => return self.handle_node_failure(flow_id, cursor, node, e, definition),
        };
        let params = node.base_params();
        let fp_input = NodeFingerprintInput { engine_version: crate::constants::ENGINE_VERSION,
                                              definition_hash: &definition.definition_hash,
                                              node_index: cursor,
                                              node: node.name(),
                                              output_hashes: &output_hashes,
                                              params: &params };
        let fp = serde_json::to_value(&fp_input).map(|v| hash_value(&v))
                                                .map_err(|e| CoreEngineError::Internal(e.to_string()))?;

        self.event_store.append_kind(flow_id,
                                     FlowEventKind::NodeFinished { node_index: cursor,
                                                                   node: node.name().to_string(),
                                                                   outputs: output_hashes.clone(),
                                                                   fingerprint: fp.clone() })?;
        debug!("flow {flow_id}: node {} finished fp={fp}", node.name());

        for sink in self.sinks.iter_mut() {
            sink.on_node_finished(NodeCompletion { flow_id,
                                                   node_index: cursor,
                                                   node: node.name(),
                                                   fingerprint: &fp,
                                                   outputs: &output_hashes })?;
        }

        if cursor + 1 == definition.len() {
            self.complete_flow(flow_id, definition)?;
        }
        Ok(())
    }

    fn handle_node_failure(&mut self,
                           flow_id: Uuid,
                           cursor: usize,
                           node: &dyn NodeDefinition,
                           error: CoreEngineError,
                           definition: &FlowDefinition)
                           -> Result<(), CoreEngineError> {
        let fp = hash_value(&json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": definition.definition_hash,
            "node_definition_hash": node.definition_hash(),
            "node_index": cursor,
            "params": node.base_params()
        }));
        warn!("flow {flow_id}: node {} failed: {error}", node.name());
        self.event_store.append_kind(flow_id,
                                     FlowEventKind::NodeFailed { node_index: cursor,
                                                                 node: node.name().to_string(),
                                                                 error: error.clone(),
                                                                 fingerprint: fp })?;
        Err(error)
    }

    fn complete_flow(&mut self, flow_id: Uuid, definition: &FlowDefinition) -> Result<(), CoreEngineError> {
        let events = self.event_store.list(flow_id)?;
        let node_fps: Vec<String> = events.iter()
                                          .filter_map(|e| match &e.kind {
                                              FlowEventKind::NodeFinished { fingerprint, .. } => Some(fingerprint.clone()),
                                              _ => None,
                                          })
                                          .collect();
        let flow_fp = hash_value(&json!({
                                     "engine_version": crate::constants::ENGINE_VERSION,
                                     "definition_hash": definition.definition_hash,
                                     "node_fingerprints": node_fps
                                 }));
        info!("flow {flow_id}: completed fp={flow_fp}");
        self.event_store
            .append_kind(flow_id, FlowEventKind::FlowCompleted { flow_fingerprint: flow_fp })?;
        Ok(())
    }

    /// Lista eventos de un flujo arbitrario.
    pub fn events_for(&self, flow_id: Uuid) -> Result<Vec<FlowEvent>, CoreEngineError> {
        self.event_store.list(flow_id)
    }

    /// Lista eventos del flujo por defecto.
    pub fn events(&self) -> Option<Vec<FlowEvent>> {
        self.default_flow_id.and_then(|fid| self.event_store.list(fid).ok())
    }

    /// Variante compacta de eventos para el flujo por defecto.
    pub fn event_variants(&self) -> Option<Vec<&'static str>> {
        self.events().map(|events| {
                         events.iter()
                               .map(|e| match e.kind {
                                   FlowEventKind::FlowInitialized { .. } => "I",
                                   FlowEventKind::NodeStarted { .. } => "S",
                                   FlowEventKind::NodeFinished { .. } => "F",
                                   FlowEventKind::NodeFailed { .. } => "X",
                                   FlowEventKind::FlowCompleted { .. } => "C",
                               })
                               .collect()
                     })
    }

    /// Fingerprint del flujo por defecto si está presente.
    pub fn flow_fingerprint(&self) -> Option<String> {
        let evs = self.events()?;
        evs.iter().rev().find_map(|e| match &e.kind {
                            FlowEventKind::FlowCompleted { flow_fingerprint } => Some(flow_fingerprint.clone()),
                            _ => None,
                        })
    }

    /// Hashes de salida de `node` en el flujo por defecto.
    pub fn outputs_of(&self, node: &str) -> Option<BTreeMap<String, String>> {
        self.events()?.iter().rev().find_map(|e| match &e.kind {
                                       FlowEventKind::NodeFinished { node: n, outputs, .. } if n == node => {
                                           Some(outputs.clone())
                                       }
                                       _ => None,
                                   })
    }
}
