//! Configuración YAML del entrenador.
//!
//! Acepta el subconjunto relevante de un fichero de configuración estilo
//! NequIP/Allegro; las claves desconocidas se ignoran.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::AdapterError;

/// Coeficiente de pérdida: escalar o `[escalar, nombre_de_pérdida]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LossCoeff {
    Scalar(f64),
    Named(f64, String),
}

impl LossCoeff {
    pub fn weight(&self) -> f64 {
        match self {
            LossCoeff::Scalar(w) | LossCoeff::Named(w, _) => *w,
        }
    }

    /// `PerAtom*` normaliza el residuo de energía por número de átomos.
    pub fn per_atom(&self) -> bool {
        matches!(self, LossCoeff::Named(_, name) if name.starts_with("PerAtom"))
    }
}

impl Default for LossCoeff {
    fn default() -> Self {
        LossCoeff::Scalar(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LossCoeffs {
    pub forces: LossCoeff,
    pub total_energy: LossCoeff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub r_max: f64,
    pub num_basis: usize,
    pub site_harmonics: usize,
    pub l2_regularization: f64,
    pub chemical_symbols: Option<Vec<String>>,
    pub model_builders: Vec<String>,
    /// Sólo se registra en el log: el ajuste lineal es determinista.
    pub seed: u64,
    pub loss_coeffs: LossCoeffs,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self { r_max: 4.0,
               num_basis: 8,
               site_harmonics: 1,
               l2_regularization: 1e-6,
               chemical_symbols: None,
               model_builders: Vec::new(),
               seed: 0,
               loss_coeffs: LossCoeffs::default() }
    }
}

impl TrainerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AdapterError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, AdapterError> {
        let text = std::fs::read_to_string(path).map_err(|source| AdapterError::Io { path: path.to_path_buf(),
                                                                                      source })?;
        Self::from_yaml_str(&text)
    }

    /// `"allegro"` si algún builder lo menciona, `"nequip"` en otro caso.
    pub fn pair_style(&self) -> &'static str {
        if self.model_builders.iter().any(|b| b.to_ascii_lowercase().contains("allegro")) {
            "allegro"
        } else {
            "nequip"
        }
    }
}
