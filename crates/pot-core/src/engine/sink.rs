//! Hooks de publicación de outputs.
//!
//! El engine invoca cada `OutputSink` después de registrar `NodeFinished` y
//! antes de avanzar al siguiente nodo. La capa de persistencia lo usa para
//! escribir el manifiesto de outputs de cada nodo en disco.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::errors::CoreEngineError;

/// Datos de un nodo recién terminado.
#[derive(Debug, Clone, Copy)]
pub struct NodeCompletion<'a> {
    pub flow_id: Uuid,
    pub node_index: usize,
    pub node: &'a str,
    pub fingerprint: &'a str,
    pub outputs: &'a BTreeMap<String, String>,
}

pub trait OutputSink: std::fmt::Debug {
    fn on_node_finished(&mut self, completion: NodeCompletion<'_>) -> Result<(), CoreEngineError>;
}
