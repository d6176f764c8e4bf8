//! Interfaz de calculadores de energía y fuerzas.

use crate::{DomainError, StructureRecord, Structure, Vec3};

/// Resultado de un cálculo single-point.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub energy: f64,
    pub forces: Vec<Vec3>,
}

pub trait Calculator: std::fmt::Debug {
    fn calculate(&self, structure: &Structure) -> Result<Prediction, DomainError>;

    fn potential_energy(&self, structure: &Structure) -> Result<f64, DomainError> {
        Ok(self.calculate(structure)?.energy)
    }

    fn forces(&self, structure: &Structure) -> Result<Vec<Vec3>, DomainError> {
        Ok(self.calculate(structure)?.forces)
    }
}

/// Devuelve las etiquetas almacenadas de un registro, sin mirar la
/// estructura recibida más allá del número de átomos.
#[derive(Debug, Clone)]
pub struct SinglePointCalculator {
    energy: f64,
    forces: Vec<Vec3>,
}

impl SinglePointCalculator {
    pub fn from_record(record: &StructureRecord) -> Result<Self, DomainError> {
        let energy = record.energy().ok_or(DomainError::NoResult("energy"))?;
        let forces = record.forces().ok_or(DomainError::NoResult("forces"))?.to_vec();
        Ok(Self { energy, forces })
    }
}

impl Calculator for SinglePointCalculator {
    fn calculate(&self, structure: &Structure) -> Result<Prediction, DomainError> {
        if structure.len() != self.forces.len() {
            return Err(DomainError::LabelShape { label: "forces",
                                                 expected: structure.len(),
                                                 found: self.forces.len() });
        }
        Ok(Prediction { energy: self.energy,
                        forces: self.forces.clone() })
    }
}
