//! AddData (Source): ingesta de un fichero extended XYZ.

use std::path::PathBuf;

use pot_core::{node_outputs, CoreEngineError, NodeInputs, NodeKind, Port, TypedNode};
use pot_domain::extxyz;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::artifacts::StructureSetArtifact;
use crate::AdapterError;

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AddDataParams {
    /// Ruta tal y como se declaró; relativa a la raíz del proyecto o absoluta.
    pub file: String,
}

node_outputs!(AddDataOutputs { atoms: StructureSetArtifact });

#[derive(Debug, Clone)]
pub struct AddData {
    name: String,
    file: PathBuf,
}

impl AddData {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { name: "AddData".to_string(),
               file: file.into() }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Puerto `atoms`.
    pub fn atoms(&self) -> Port<StructureSetArtifact> {
        Port::new(self.name.clone(), "atoms")
    }
}

impl TypedNode for AddData {
    type Params = AddDataParams;
    type Outputs = AddDataOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Source
    }

    fn params(&self) -> AddDataParams {
        AddDataParams { file: self.file.to_string_lossy().into_owned() }
    }

    fn run_typed(&self, inputs: &NodeInputs<'_>, params: AddDataParams) -> Result<AddDataOutputs, CoreEngineError> {
        let path = match inputs.workspace() {
            Ok(ws) => ws.root.join(&params.file),
            Err(_) => PathBuf::from(&params.file),
        };
        let bytes = std::fs::read(&path).map_err(|source| AdapterError::Io { path: path.clone(),
                                                                              source })?;
        let records = extxyz::read(bytes.as_slice()).map_err(AdapterError::from)?;
        let digest = Sha256::digest(&bytes);
        log::debug!("{}: read {} structures from {}", self.name, records.len(), path.display());

        let mut atoms = StructureSetArtifact::new(records);
        atoms.source_sha256 = Some(format!("{digest:x}"));
        Ok(AddDataOutputs { atoms })
    }
}
