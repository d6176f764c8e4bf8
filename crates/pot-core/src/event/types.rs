//! Tipos de evento del flujo y estructura `FlowEvent`.
//!
//! Rol en el flujo:
//! - Cada ejecución del `FlowEngine` emite eventos a un `EventStore`
//!   append-only.
//! - Estos eventos permiten reconstruir el estado del `FlowRepository` (replay)
//!   sin depender de estructuras mutables.
//! - El enum `FlowEventKind` define el contrato observable y estable del motor.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreEngineError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FlowEventKind {
    /// Emisión inicial de un flujo: fija la `definition_hash` y cantidad de
    /// nodos. Invariante: debe ser el primer evento de un `flow_id`.
    FlowInitialized { definition_hash: String, node_count: usize },
    /// Un nodo comenzó su ejecución. No implica éxito.
    NodeStarted { node_index: usize, node: String },
    /// Un nodo terminó correctamente: hashes de sus outputs por puerto.
    NodeFinished {
        node_index: usize,
        node: String,
        outputs: BTreeMap<String, String>,
        fingerprint: String,
    },
    /// Un nodo terminó con error terminal. El flujo no continúa
    /// (stop-on-failure).
    NodeFailed {
        node_index: usize,
        node: String,
        error: CoreEngineError,
        fingerprint: String,
    },
    /// Evento de cierre con fingerprint agregado del flow (hash de
    /// fingerprints de nodos en orden topológico).
    FlowCompleted { flow_fingerprint: String },
}

impl FlowEventKind {
    /// Nombre corto de la variante (logs).
    pub fn variant_name(&self) -> &'static str {
        match self {
            FlowEventKind::FlowInitialized { .. } => "FlowInitialized",
            FlowEventKind::NodeStarted { .. } => "NodeStarted",
            FlowEventKind::NodeFinished { .. } => "NodeFinished",
            FlowEventKind::NodeFailed { .. } => "NodeFailed",
            FlowEventKind::FlowCompleted { .. } => "FlowCompleted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowEvent {
    pub seq: u64, // asignado por el EventStore (orden append)
    pub flow_id: Uuid,
    pub kind: FlowEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}
