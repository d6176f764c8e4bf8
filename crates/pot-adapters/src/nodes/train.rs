//! TrainPotential (Sink): entrena un potencial y lo despliega en el
//! directorio del nodo (`<nodes>/<name>/deployed_model.pth`).

use std::path::{Path, PathBuf};

use pot_core::{node_outputs, CoreEngineError, NodeInputs, NodeKind, Port, PortRef, TypedNode};
use serde::{Deserialize, Serialize};

use crate::artifacts::{StructureSetArtifact, TrainedModelArtifact};
use crate::training::{LinearPotentialTrainer, PotentialTrainer, TrainerConfig};
use crate::{sha256_hex, AdapterError};

pub const DEPLOYED_MODEL_FILE: &str = "deployed_model.pth";

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TrainParams {
    /// YAML relativo a la raíz del proyecto (o absoluto).
    pub config: String,
    pub device: String,
}

node_outputs!(TrainOutputs { model: TrainedModelArtifact });

#[derive(Debug)]
pub struct TrainPotential {
    name: String,
    config: PathBuf,
    device: String,
    data: Port<StructureSetArtifact>,
    validation_data: Port<StructureSetArtifact>,
    trainer: Box<dyn PotentialTrainer>,
}

impl TrainPotential {
    pub fn new(config: impl Into<PathBuf>,
               device: impl Into<String>,
               data: Port<StructureSetArtifact>,
               validation_data: Port<StructureSetArtifact>)
               -> Self {
        Self { name: "MLModel".to_string(),
               config: config.into(),
               device: device.into(),
               data,
               validation_data,
               trainer: Box::new(LinearPotentialTrainer) }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_trainer(mut self, trainer: impl PotentialTrainer + 'static) -> Self {
        self.trainer = Box::new(trainer);
        self
    }

    pub fn model(&self) -> Port<TrainedModelArtifact> {
        Port::new(self.name.clone(), "model")
    }
}

impl TypedNode for TrainPotential {
    type Params = TrainParams;
    type Outputs = TrainOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Sink
    }

    fn inputs(&self) -> Vec<PortRef> {
        vec![PortRef::new("data", &self.data), PortRef::new("validation_data", &self.validation_data)]
    }

    fn params(&self) -> TrainParams {
        TrainParams { config: self.config.to_string_lossy().into_owned(),
                      device: self.device.clone() }
    }

    fn run_typed(&self, inputs: &NodeInputs<'_>, params: TrainParams) -> Result<TrainOutputs, CoreEngineError> {
        let workspace = inputs.workspace()?;
        let config = TrainerConfig::from_path(&workspace.root.join(&params.config))?;
        let train = inputs.get(&self.data)?;
        let validation = inputs.get(&self.validation_data)?;

        let model = self.trainer
                        .train(&config, &params.device, &train.records, &validation.records)
                        .map_err(AdapterError::from)?;

        let file = inputs.node_dir()?.join(DEPLOYED_MODEL_FILE);
        let bytes = model.to_bytes()?;
        std::fs::write(&file, &bytes).map_err(|source| AdapterError::Io { path: file.clone(),
                                                                          source })?;
        log::info!("{}: deployed model written to {}", self.name, file.display());

        let model = TrainedModelArtifact { node_name: self.name.clone(),
                                           pair_style: model.pair_style.clone(),
                                           species: model.species.clone(),
                                           deployed_model: posix(&workspace.relative_dir.join(DEPLOYED_MODEL_FILE)),
                                           model_sha256: sha256_hex(&bytes),
                                           config_file: params.config,
                                           device: params.device,
                                           metrics: model.metrics,
                                           schema_version: 1 };
        Ok(TrainOutputs { model })
    }
}

fn posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
