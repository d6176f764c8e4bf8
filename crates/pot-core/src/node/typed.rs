use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use super::{NodeKind, NodeRunResult, Port, PortRef};
use crate::errors::CoreEngineError;
use crate::model::{Artifact, ArtifactError, ArtifactSpec, ExecutionContext, NodeWorkspace};

/// Conjunto de salidas tipadas de un nodo (uno o más puertos con nombre).
///
/// Normalmente se declara con el macro `node_outputs!`.
pub trait NodeOutputs {
    /// Nombres de puerto, en el orden en que se publican.
    fn ports() -> &'static [&'static str];

    /// Convierte cada campo a su artifact neutral (sin hash).
    fn into_artifacts(self) -> Result<Vec<(String, Artifact)>, ArtifactError>;
}

/// Vista tipada sobre los inputs resueltos de un `ExecutionContext`.
pub struct NodeInputs<'a> {
    ctx: &'a ExecutionContext,
}

impl<'a> NodeInputs<'a> {
    pub fn new(ctx: &'a ExecutionContext) -> Self {
        Self { ctx }
    }

    /// Decodifica el artifact publicado en `port`.
    pub fn get<T: ArtifactSpec>(&self, port: &Port<T>) -> Result<T, CoreEngineError> {
        let raw = self.ctx
                      .input(port.target())
                      .ok_or_else(|| CoreEngineError::MissingInputs(self.ctx.node.clone()))?;
        T::from_artifact(raw).map_err(|e| CoreEngineError::InputDecode { source_ref: port.target().to_string(),
                                                                         details: e.to_string() })
    }

    pub fn workspace(&self) -> Result<&NodeWorkspace, CoreEngineError> {
        self.ctx.workspace()
    }

    /// Directorio absoluto del nodo (ya creado por el engine).
    pub fn node_dir(&self) -> Result<PathBuf, CoreEngineError> {
        Ok(self.workspace()?.dir())
    }

    pub fn node_name(&self) -> &str {
        &self.ctx.node
    }
}

/// Interfaz de alto nivel para definir nodos con tipos fuertes.
///
/// Implementadores escriben `run_typed` con tipos concretos; el adaptador de
/// abajo convierte esa ejecución a la interfaz neutra `NodeDefinition`.
pub trait TypedNode {
    /// Parámetros deserializables y clonables (soportan `Default`).
    type Params: DeserializeOwned + Serialize + Clone + Default;
    /// Salidas tipadas publicadas por el nodo.
    type Outputs: NodeOutputs;

    fn name(&self) -> &str;

    fn kind(&self) -> NodeKind;

    /// Inputs declarados (vacío para `Source`).
    fn inputs(&self) -> Vec<PortRef> {
        Vec::new()
    }

    /// Parámetros deterministas del nodo.
    fn params(&self) -> Self::Params {
        Default::default()
    }

    fn run_typed(&self, inputs: &NodeInputs<'_>, params: Self::Params) -> Result<Self::Outputs, CoreEngineError>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedNode` implementa `NodeDefinition` neutro.
// -------------------------------------------------------------
impl<T> crate::node::NodeDefinition for T where T: TypedNode + std::fmt::Debug + 'static
{
    fn name(&self) -> &str {
        <Self as TypedNode>::name(self)
    }

    fn kind(&self) -> NodeKind {
        <Self as TypedNode>::kind(self)
    }

    fn inputs(&self) -> Vec<PortRef> {
        <Self as TypedNode>::inputs(self)
    }

    fn output_ports(&self) -> Vec<String> {
        <T::Outputs as NodeOutputs>::ports().iter().map(|p| p.to_string()).collect()
    }

    fn base_params(&self) -> serde_json::Value {
        serde_json::to_value(<Self as TypedNode>::params(self)).unwrap_or_default()
    }

    fn run(&self, ctx: &ExecutionContext) -> NodeRunResult {
        // Si los params del contexto no decodifican, usamos los del nodo
        let params: T::Params = ctx.params_as().unwrap_or_else(|_| <Self as TypedNode>::params(self));
        let inputs = NodeInputs::new(ctx);
        let outputs = <Self as TypedNode>::run_typed(self, &inputs, params).and_then(|o| {
                          o.into_artifacts()
                           .map_err(|e| CoreEngineError::NodeExecution(format!("output encode: {e}")))
                      });
        match outputs {
            Ok(outputs) => NodeRunResult::Success { outputs },
            Err(error) => NodeRunResult::Failure { error },
        }
    }

    fn definition_hash(&self) -> String {
        let inputs: Vec<String> = <Self as TypedNode>::inputs(self).iter()
                                                                   .map(|p| format!("{}<-{}", p.port, p.source))
                                                                   .collect();
        crate::hashing::hash_value(&serde_json::json!({
            "name": <Self as TypedNode>::name(self),
            "kind": format!("{:?}", <Self as TypedNode>::kind(self)),
            "inputs": inputs,
            "base_params": crate::node::NodeDefinition::base_params(self),
            "type": std::any::type_name::<T>()
        }))
    }
}
