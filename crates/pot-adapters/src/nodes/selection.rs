//! UniformEnergeticSelection (Transform): subconjunto uniforme en energía.

use pot_core::{node_outputs, CoreEngineError, NodeInputs, NodeKind, Port, PortRef, TypedNode};
use pot_domain::uniform_energetic;
use serde::{Deserialize, Serialize};

use crate::artifacts::StructureSetArtifact;
use crate::AdapterError;

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SelectionParams {
    pub n_configurations: usize,
}

node_outputs!(SelectionOutputs { atoms: StructureSetArtifact,
                                 excluded_atoms: StructureSetArtifact });

#[derive(Debug, Clone)]
pub struct UniformEnergeticSelection {
    name: String,
    data: Port<StructureSetArtifact>,
    n_configurations: usize,
}

impl UniformEnergeticSelection {
    pub fn new(data: Port<StructureSetArtifact>, n_configurations: usize) -> Self {
        Self { name: "UniformEnergeticSelection".to_string(),
               data,
               n_configurations }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Estructuras elegidas.
    pub fn atoms(&self) -> Port<StructureSetArtifact> {
        Port::new(self.name.clone(), "atoms")
    }

    /// El resto, en el orden original.
    pub fn excluded_atoms(&self) -> Port<StructureSetArtifact> {
        Port::new(self.name.clone(), "excluded_atoms")
    }
}

impl TypedNode for UniformEnergeticSelection {
    type Params = SelectionParams;
    type Outputs = SelectionOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn inputs(&self) -> Vec<PortRef> {
        vec![PortRef::new("data", &self.data)]
    }

    fn params(&self) -> SelectionParams {
        SelectionParams { n_configurations: self.n_configurations }
    }

    fn run_typed(&self, inputs: &NodeInputs<'_>, params: SelectionParams) -> Result<SelectionOutputs, CoreEngineError> {
        let data = inputs.get(&self.data)?;
        let selection = uniform_energetic(&data.records, params.n_configurations).map_err(AdapterError::from)?;
        let (atoms, excluded) = selection.split(&data.records);
        log::debug!("{}: selected {} of {}", self.name, atoms.len(), data.records.len());
        Ok(SelectionOutputs { atoms: StructureSetArtifact::new(atoms),
                              excluded_atoms: StructureSetArtifact::new(excluded) })
    }
}
