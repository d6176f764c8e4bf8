use serde_json::{json, Value};

use super::run_result::NodeRunResult;
use super::PortRef;
use crate::model::ExecutionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Source,
    Transform,
    Sink,
}

/// Trait que define un nodo. Implementaciones deben ser puras respecto a
/// inputs + params (salvo los archivos que escriben en su propio workspace).
pub trait NodeDefinition: std::fmt::Debug {
    /// Nombre estable y único dentro del grafo.
    fn name(&self) -> &str;

    fn kind(&self) -> NodeKind;

    /// Inputs declarados: puerto local + salida upstream referenciada.
    fn inputs(&self) -> Vec<PortRef>;

    /// Puertos de salida que el nodo publica al terminar.
    fn output_ports(&self) -> Vec<String>;

    /// Parámetros base deterministas.
    fn base_params(&self) -> Value;

    /// Ejecución del nodo. Debe usar únicamente `ctx`.
    fn run(&self, ctx: &ExecutionContext) -> NodeRunResult;

    /// Hash de la declaración del nodo (nombre, tipo, params, aristas).
    fn definition_hash(&self) -> String {
        let inputs: Vec<Value> = self.inputs()
                                     .iter()
                                     .map(|p| json!({"port": p.port, "source": p.source.to_string()}))
                                     .collect();
        crate::hashing::hash_value(&json!({
            "name": self.name(),
            "kind": format!("{:?}", self.kind()),
            "inputs": inputs,
            "outputs": self.output_ports(),
            "base_params": self.base_params(),
        }))
    }
}
