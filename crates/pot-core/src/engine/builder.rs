//! Builder del grafo (construcción diferida).
//!
//! `FlowBuilder` sólo registra declaraciones de nodos; ningún nodo se ejecuta
//! aquí. La validación de aristas y el orden topológico ocurren en `build`,
//! que produce la `FlowDefinition` que luego consume `FlowEngine::run`.
//!
//! ```ignore
//! let mut b = FlowBuilder::new();
//! let data = b.add(AddData::new("traj.extxyz").named("data_1"))?;
//! b.add(UniformEnergeticSelection::new(data.output("atoms"), 10).named("train_data"))?;
//! let definition = b.build()?;
//! ```

use std::collections::BTreeSet;
use std::marker::PhantomData;

use crate::errors::CoreEngineError;
use crate::model::ArtifactSpec;
use crate::node::{NodeDefinition, Port};
use crate::repo::{build_flow_definition, FlowDefinition};

#[derive(Debug, Default)]
pub struct FlowBuilder {
    nodes: Vec<Box<dyn NodeDefinition>>,
    names: BTreeSet<String>,
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un nodo y devuelve un handle para referenciar sus salidas.
    ///
    /// Los nombres deben ser únicos dentro del grafo.
    pub fn add<N>(&mut self, node: N) -> Result<NodeHandle<N>, CoreEngineError>
        where N: NodeDefinition + 'static
    {
        let name = node.name().to_string();
        if !self.names.insert(name.clone()) {
            return Err(CoreEngineError::DuplicateNode(name));
        }
        let ports = node.output_ports();
        self.nodes.push(Box::new(node));
        Ok(NodeHandle { name,
                        ports,
                        _node: PhantomData })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Valida y ordena el grafo. Consume el builder.
    pub fn build(self) -> Result<FlowDefinition, CoreEngineError> {
        build_flow_definition(self.nodes)
    }
}

/// Handle devuelto por `FlowBuilder::add`.
#[derive(Debug, Clone)]
pub struct NodeHandle<N> {
    name: String,
    ports: Vec<String>,
    _node: PhantomData<fn() -> N>,
}

impl<N> NodeHandle<N> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ports(&self) -> &[String] {
        &self.ports
    }

    /// Referencia tipada a un puerto de salida del nodo. Un puerto
    /// inexistente se reporta en `FlowBuilder::build` como `UnknownPort`.
    pub fn output<T: ArtifactSpec>(&self, port: &str) -> Port<T> {
        debug_assert!(self.ports.iter().any(|p| p == port),
                      "el nodo {} no declara el puerto {}",
                      self.name,
                      port);
        Port::new(self.name.clone(), port)
    }
}
