//! Artifacts tipados que fluyen entre los nodos del pipeline.
//!
//! El core sólo ve `Artifact { kind, hash, payload, metadata }`; aquí se fija
//! la forma del `payload` JSON de cada uno. El `schema_version` lo inserta el
//! macro y el hash lo calcula el engine a partir del payload canónico.

use pot_core::{typed_artifact, ArtifactKind};
use pot_domain::StructureRecord;
use serde::{Deserialize, Serialize};

typed_artifact!(
    /// Secuencia ordenada de estructuras etiquetadas.
    ///
    /// `source_sha256` sólo está presente cuando el conjunto se leyó de un
    /// fichero (digest del contenido, no de la ruta).
    StructureSetArtifact {
        records: Vec<StructureRecord>,
        source_sha256: Option<String>,
    } kind: ArtifactKind::Dataset
);

impl StructureSetArtifact {
    pub fn new(records: Vec<StructureRecord>) -> Self {
        Self { records,
               source_sha256: None,
               schema_version: 1 }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Errores cuadráticos medios de un entrenamiento.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub train_energy_rmse: f64,
    pub train_forces_rmse: f64,
    pub validation_energy_rmse: Option<f64>,
    pub validation_forces_rmse: Option<f64>,
    pub n_train: usize,
    pub n_validation: usize,
}

typed_artifact!(
    /// Resultado del nodo de entrenamiento. `deployed_model` es relativo a la
    /// raíz del proyecto con separadores `/`.
    TrainedModelArtifact {
        node_name: String,
        pair_style: String,
        species: Vec<String>,
        deployed_model: String,
        model_sha256: String,
        config_file: String,
        device: String,
        metrics: TrainingMetrics,
    } kind: ArtifactKind::Model
);

impl TrainedModelArtifact {
    /// Línea `pair_coeff` de LAMMPS: `* * <modelo> <especies...>`.
    pub fn pair_coeff(&self) -> Vec<String> {
        vec![format!("* * {} {}", self.deployed_model, self.species.join(" "))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pot_core::{ArtifactError, ArtifactSpec};
    use pot_domain::{generate, SyntheticConfig};

    #[test]
    fn structure_set_decode_rejects_mismatched_force_rows() {
        let records = generate(&SyntheticConfig::default().with_n(2)).unwrap();
        let artifact = StructureSetArtifact::new(records).into_artifact().unwrap();
        assert_eq!(StructureSetArtifact::from_artifact(&artifact).unwrap().len(), 2);

        let mut broken = artifact.clone();
        broken.payload["records"][1]["labels"]["forces"] = serde_json::json!([[0.0, 0.0, 0.0]]);
        let err = StructureSetArtifact::from_artifact(&broken).unwrap_err();
        assert!(matches!(err, ArtifactError::Deserialize(_)), "{err:?}");
    }
}
