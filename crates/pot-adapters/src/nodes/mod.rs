//! Nodos del pipeline de potenciales.
pub mod add_data;
pub mod selection;
pub mod train;

pub use add_data::{AddData, AddDataOutputs, AddDataParams};
pub use selection::{SelectionOutputs, SelectionParams, UniformEnergeticSelection};
pub use train::{TrainOutputs, TrainParams, TrainPotential, DEPLOYED_MODEL_FILE};
