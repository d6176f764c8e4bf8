//! Entrenamiento de potenciales interatómicos.
//!
//! `PotentialTrainer` es la costura entre el nodo `TrainPotential` y el
//! algoritmo concreto; `LinearPotentialTrainer` es la implementación
//! incluida.

mod basis;
mod config;
mod deployed;
mod error;
mod linear;
mod solve;

use std::fmt::Debug;

use pot_domain::StructureRecord;

pub use basis::{Basis, Features};
pub use config::{LossCoeff, LossCoeffs, TrainerConfig};
pub use deployed::{DeployedModel, LinearPotentialCalculator, MODEL_FORMAT, MODEL_FORMAT_VERSION};
pub use error::TrainerError;
pub use linear::{model_species, LinearPotentialTrainer};

pub trait PotentialTrainer: Debug {
    /// Entrena con `train` y reporta métricas sobre `validation`.
    fn train(&self,
             config: &TrainerConfig,
             device: &str,
             train: &[StructureRecord],
             validation: &[StructureRecord])
             -> Result<DeployedModel, TrainerError>;
}
