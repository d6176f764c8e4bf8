//! pot-adapters: capa de adaptación Dominio ↔ Core.
//!
//! Este crate provee:
//! - Artifacts tipados (`StructureSetArtifact`, `TrainedModelArtifact`).
//! - Los nodos del pipeline: `AddData` (ingesta extended XYZ),
//!   `UniformEnergeticSelection` y `TrainPotential`.
//! - La costura `PotentialTrainer` y el entrenador lineal incluido.
//! - `TrainedModel`, el handle que expone calculador y metadatos LAMMPS.
//!
//! Nota: el core sólo conoce `Artifact { kind, hash, payload, metadata }`; los
//! tipos de aquí fijan la forma del payload y el engine calcula el hash.

pub mod artifacts;
pub mod error;
pub mod nodes;
pub mod trained;
pub mod training;

use sha2::{Digest, Sha256};

pub use artifacts::{StructureSetArtifact, TrainedModelArtifact, TrainingMetrics};
pub use error::AdapterError;
pub use nodes::{AddData, TrainPotential, UniformEnergeticSelection, DEPLOYED_MODEL_FILE};
pub use trained::TrainedModel;
pub use training::{DeployedModel, LinearPotentialCalculator, LinearPotentialTrainer, PotentialTrainer, TrainerConfig,
                   TrainerError};

/// Digest SHA-256 en hexadecimal.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
