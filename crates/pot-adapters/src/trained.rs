//! Handle de un modelo entrenado ya recargado desde el proyecto.

use std::path::{Path, PathBuf};

use crate::artifacts::TrainedModelArtifact;
use crate::training::{DeployedModel, LinearPotentialCalculator};
use crate::AdapterError;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    artifact: TrainedModelArtifact,
    root: PathBuf,
}

impl TrainedModel {
    pub fn new(artifact: TrainedModelArtifact, root: impl Into<PathBuf>) -> Self {
        Self { artifact,
               root: root.into() }
    }

    pub fn artifact(&self) -> &TrainedModelArtifact {
        &self.artifact
    }

    pub fn lammps_pair_style(&self) -> &str {
        &self.artifact.pair_style
    }

    pub fn lammps_pair_coeff(&self) -> Vec<String> {
        self.artifact.pair_coeff()
    }

    pub fn deployed_model_path(&self) -> PathBuf {
        self.root.join(&self.artifact.deployed_model)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lee el modelo desplegado y verifica su digest contra el artifact.
    pub fn deployed_model(&self) -> Result<DeployedModel, AdapterError> {
        let path = self.deployed_model_path();
        let bytes = std::fs::read(&path).map_err(|source| AdapterError::Io { path: path.clone(),
                                                                              source })?;
        if crate::sha256_hex(&bytes) != self.artifact.model_sha256 {
            return Err(AdapterError::DigestMismatch { path });
        }
        DeployedModel::load(&path)
    }

    pub fn calculator(&self) -> Result<LinearPotentialCalculator, AdapterError> {
        Ok(LinearPotentialCalculator::new(&self.deployed_model()?)?)
    }
}
