//! Artifact neutral del flujo.
//!
//! Un `Artifact` es la unidad de datos intercambiada entre nodos. Es neutral:
//! - `payload` es JSON genérico; el motor no interpreta su semántica.
//! - `hash` es calculado por el engine sobre el JSON canonicalizado (ver
//!   `hashing::to_canonical_json`). Sirve como identidad para deduplicación y
//!   para recargar outputs desde un store.
//! - `metadata` permite anotar información auxiliar que no entra al hash.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hashing::hash_value;

/// Familias gruesas de artifact. El core no conoce el shape del payload; el
/// kind sólo evita decodificar un dataset como si fuera un modelo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// JSON genérico sin semántica.
    GenericJson,
    /// Colección ordenada de registros (p. ej. estructuras etiquetadas).
    Dataset,
    /// Resultado entrenado/desplegable de un nodo.
    Model,
}

/// Artifact neutral producido/consumido por nodos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub hash: String,            // hash canonical del payload (asignado por engine)
    pub payload: Value,          // contenido neutro JSON
    pub metadata: Option<Value>, // información auxiliar (no entra al hash)
}

impl Artifact {
    /// Constructor sin hash; preferir `ArtifactSpec::into_artifact`.
    pub fn new_unhashed(kind: ArtifactKind, payload: Value, metadata: Option<Value>) -> Self {
        Self { kind,
               hash: String::new(),
               payload,
               metadata }
    }

    /// Calcula y fija el hash del payload. Devuelve el hash asignado.
    pub fn seal(&mut self) -> String {
        self.hash = hash_value(&self.payload);
        self.hash.clone()
    }

    /// Verifica que `hash` corresponde al payload actual.
    pub fn verify(&self) -> bool {
        !self.hash.is_empty() && self.hash == hash_value(&self.payload)
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_does_not_enter_hash() {
        let mut a = Artifact::new_unhashed(ArtifactKind::GenericJson, json!({"x": 1}), None);
        let mut b = Artifact::new_unhashed(ArtifactKind::GenericJson, json!({"x": 1}), Some(json!({"note": "b"})));
        assert_eq!(a.seal(), b.seal());
        assert!(a.verify());
        b.payload = json!({"x": 2});
        assert!(!b.verify());
    }
}
