//! Tipos de repositorio: estado reconstruido (`FlowInstance`) y definición
//! (`FlowDefinition`).
//!
//! El repositorio aplica un replay: consume eventos en orden y actualiza un
//! `FlowInstance` por evento. No almacena artifacts completos (sólo hashes).
//! La definición guarda los nodos ya ordenados topológicamente, de modo que
//! el "siguiente nodo pendiente" siempre tiene sus dependencias terminadas.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::CoreEngineError;
use crate::event::{FlowEvent, FlowEventKind};
use crate::node::{NodeDefinition, NodeStatus};

pub struct FlowInstance {
    pub id: Uuid,
    pub nodes: Vec<NodeSlot>,
    pub cursor: usize,
    pub completed: bool,
    pub failed: bool,
}

/// Estado de un nodo en la instancia.
#[derive(Debug, Clone)]
pub struct NodeSlot {
    pub node: String,
    pub status: NodeStatus,
    pub fingerprint: Option<String>,
    pub outputs: BTreeMap<String, String>, // port -> hash
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub attempts: u32,
}

/// Trait para reconstruir (`replay`) el estado de un flow a partir de eventos.
pub trait FlowRepository {
    fn load(&self, flow_id: Uuid, events: &[FlowEvent], definition: &FlowDefinition) -> FlowInstance;
}

/// Definición inmutable del grafo, con nodos en orden topológico.
#[derive(Debug)]
pub struct FlowDefinition {
    pub nodes: Vec<Box<dyn NodeDefinition>>,
    pub definition_hash: String,
}

impl FlowDefinition {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name() == name)
    }

    pub fn node(&self, name: &str) -> Option<&dyn NodeDefinition> {
        self.nodes.iter().find(|n| n.name() == name).map(|n| n.as_ref())
    }

    /// Nombres en orden de ejecución.
    pub fn order(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name()).collect()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryFlowRepository;

impl InMemoryFlowRepository {
    pub fn new() -> Self {
        Self
    }
}

impl FlowRepository for InMemoryFlowRepository {
    fn load(&self, flow_id: Uuid, events: &[FlowEvent], definition: &FlowDefinition) -> FlowInstance {
        let mut nodes: Vec<NodeSlot> = definition.nodes
                                                 .iter()
                                                 .map(|n| NodeSlot { node: n.name().to_string(),
                                                                     status: NodeStatus::Pending,
                                                                     fingerprint: None,
                                                                     outputs: BTreeMap::new(),
                                                                     started_at: None,
                                                                     finished_at: None,
                                                                     attempts: 0 })
                                                 .collect();
        let mut completed = false;
        let mut failed = false;
        for ev in events {
            match &ev.kind {
                FlowEventKind::FlowInitialized { .. } => {}
                FlowEventKind::NodeStarted { node_index, .. } => {
                    if let Some(slot) = nodes.get_mut(*node_index) {
                        slot.status = NodeStatus::Running;
                        slot.started_at = Some(ev.ts);
                        slot.attempts += 1;
                    }
                }
                FlowEventKind::NodeFinished { node_index,
                                              fingerprint,
                                              outputs,
                                              .. } => {
                    if let Some(slot) = nodes.get_mut(*node_index) {
                        slot.status = NodeStatus::FinishedOk;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.outputs = outputs.clone();
                        slot.finished_at = Some(ev.ts);
                    }
                }
                FlowEventKind::NodeFailed { node_index, fingerprint, .. } => {
                    if let Some(slot) = nodes.get_mut(*node_index) {
                        slot.status = NodeStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                    failed = true;
                }
                FlowEventKind::FlowCompleted { .. } => completed = true,
            }
        }
        let cursor = nodes.iter()
                          .position(|s| matches!(s.status, NodeStatus::Pending))
                          .unwrap_or(nodes.len());
        FlowInstance { id: flow_id,
                       nodes,
                       cursor,
                       completed,
                       failed }
    }
}

/// Valida las referencias entre nodos y los ordena topológicamente.
///
/// - Nombres duplicados, nodos o puertos inexistentes y ciclos son errores.
/// - Empates entre nodos listos se resuelven por orden de declaración (Kahn
///   con cola ordenada), así el orden es determinista.
/// - `definition_hash` cubre nombres y aristas en el orden resultante.
pub fn build_flow_definition(nodes: Vec<Box<dyn NodeDefinition>>) -> Result<FlowDefinition, CoreEngineError> {
    let mut by_name: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
    for (i, n) in nodes.iter().enumerate() {
        if by_name.insert(n.name().to_string(), i).is_some() {
            return Err(CoreEngineError::DuplicateNode(n.name().to_string()));
        }
    }

    let mut indegree = vec![0usize; nodes.len()];
    let mut dependents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); nodes.len()];
    for (i, n) in nodes.iter().enumerate() {
        let mut upstream = BTreeSet::new();
        for input in n.inputs() {
            let src = *by_name.get(&input.source.node)
                              .ok_or_else(|| CoreEngineError::UnknownNode { node: n.name().to_string(),
                                                                            target: input.source.node.clone() })?;
            if !nodes[src].output_ports().iter().any(|p| *p == input.source.port) {
                return Err(CoreEngineError::UnknownPort { node: n.name().to_string(),
                                                          target: input.source.node.clone(),
                                                          port: input.source.port.clone() });
            }
            upstream.insert(src);
        }
        for src in upstream {
            indegree[i] += 1;
            dependents[src].insert(i);
        }
    }

    let mut ready: BTreeSet<usize> = (0..nodes.len()).filter(|i| indegree[*i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for dep in &dependents[next] {
            indegree[*dep] -= 1;
            if indegree[*dep] == 0 {
                ready.insert(*dep);
            }
        }
    }

    if order.len() != nodes.len() {
        let stuck: Vec<String> = (0..nodes.len()).filter(|i| indegree[*i] > 0)
                                                 .map(|i| nodes[i].name().to_string())
                                                 .collect();
        return Err(CoreEngineError::CycleDetected(stuck));
    }

    let mut slots: Vec<Option<Box<dyn NodeDefinition>>> = nodes.into_iter().map(Some).collect();
    let ordered: Vec<Box<dyn NodeDefinition>> = order.iter().filter_map(|i| slots[*i].take()).collect();

    let shape: Vec<Value> = ordered.iter()
                                   .map(|n| {
                                       let edges: Vec<String> = n.inputs()
                                                                 .iter()
                                                                 .map(|p| format!("{}<-{}", p.port, p.source))
                                                                 .collect();
                                       json!({"name": n.name(), "inputs": edges, "outputs": n.output_ports()})
                                   })
                                   .collect();
    let definition_hash = crate::hashing::hash_value(&json!(shape));
    Ok(FlowDefinition { nodes: ordered,
                        definition_hash })
}
