//! Modelo desplegado (`deployed_model.pth`) y su calculador.
//!
//! El fichero es JSON aunque conserve la extensión que espera LAMMPS.

use std::path::Path;

use pot_domain::{Calculator, DomainError, Element, Prediction, Structure};
use serde::{Deserialize, Serialize};

use super::basis::Basis;
use super::TrainerError;
use crate::artifacts::TrainingMetrics;
use crate::AdapterError;

pub const MODEL_FORMAT: &str = "potflow-linear";
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployedModel {
    pub format: String,
    pub format_version: u32,
    pub pair_style: String,
    pub species: Vec<String>,
    pub r_max: f64,
    pub num_basis: usize,
    pub site_harmonics: usize,
    pub weights: Vec<f64>,
    pub metrics: TrainingMetrics,
}

impl DeployedModel {
    pub(crate) fn basis(&self) -> Result<Basis, TrainerError> {
        let species = self.species
                          .iter()
                          .map(|s| Element::from_symbol(s))
                          .collect::<Result<Vec<_>, _>>()?;
        let basis = Basis::new(species, self.r_max, self.num_basis, self.site_harmonics)?;
        if basis.len() != self.weights.len() {
            return Err(TrainerError::InvalidConfig(format!("model has {} weights but its basis needs {}",
                                                           self.weights.len(),
                                                           basis.len())));
        }
        Ok(basis)
    }

    /// Energía y fuerzas analíticas.
    pub fn predict(&self, structure: &Structure) -> Result<Prediction, TrainerError> {
        evaluate(&self.basis()?, &self.weights, structure)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, AdapterError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), AdapterError> {
        std::fs::write(path, self.to_bytes()?).map_err(|source| AdapterError::Io { path: path.to_path_buf(),
                                                                                    source })
    }

    pub fn load(path: &Path) -> Result<Self, AdapterError> {
        let bytes = std::fs::read(path).map_err(|source| AdapterError::Io { path: path.to_path_buf(),
                                                                             source })?;
        let model: DeployedModel = serde_json::from_slice(&bytes)?;
        if model.format != MODEL_FORMAT || model.format_version != MODEL_FORMAT_VERSION {
            return Err(AdapterError::ModelFormat { found: format!("{} v{}", model.format, model.format_version) });
        }
        Ok(model)
    }
}

pub(crate) fn evaluate(basis: &Basis, weights: &[f64], structure: &Structure) -> Result<Prediction, TrainerError> {
    let features = basis.evaluate(structure)?;
    let energy = features.values.iter().zip(weights).map(|(v, w)| v * w).sum();
    let mut forces = vec![[0.0; 3]; structure.len()];
    for (grad, w) in features.gradients.iter().zip(weights) {
        for (force, g) in forces.iter_mut().zip(grad) {
            for b in 0..3 {
                force[b] -= w * g[b];
            }
        }
    }
    Ok(Prediction { energy, forces })
}

/// `Calculator` sobre un modelo desplegado (base precalculada).
#[derive(Debug, Clone)]
pub struct LinearPotentialCalculator {
    basis: Basis,
    weights: Vec<f64>,
}

impl LinearPotentialCalculator {
    pub fn new(model: &DeployedModel) -> Result<Self, TrainerError> {
        Ok(Self { basis: model.basis()?,
                  weights: model.weights.clone() })
    }
}

impl Calculator for LinearPotentialCalculator {
    fn calculate(&self, structure: &Structure) -> Result<Prediction, DomainError> {
        evaluate(&self.basis, &self.weights, structure).map_err(|e| DomainError::Calculation(e.to_string()))
    }
}
