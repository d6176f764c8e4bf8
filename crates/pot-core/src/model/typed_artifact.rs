//! Infraestructura opcional de tipado fuerte para `Artifact` manteniendo el
//! núcleo agnóstico. Permite describir artefactos con un tipo de datos
//! concreto y validaciones; no introduce semántica de dominio.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{Artifact, ArtifactKind};

/// Errores posibles al codificar/decodificar un artifact tipado.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArtifactError {
    #[error("artifact kind mismatch: expected {expected:?}, found {found:?}")]
    KindMismatch { expected: ArtifactKind, found: ArtifactKind },
    #[error("schema version mismatch: expected {expected}, found {found:?}")]
    VersionMismatch { expected: u32, found: Option<u32> },
    #[error("serialize: {0}")]
    Serialize(String),
    #[error("deserialize: {0}")]
    Deserialize(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Especificación abstracta de un artifact tipado.
pub trait ArtifactSpec: Sized + Serialize + DeserializeOwned + Clone {
    /// Kind asociado (permite distinguir en runtime).
    const KIND: ArtifactKind;
    /// Versión de esquema (incrementar en cambios incompatibles).
    const SCHEMA_VERSION: u32 = 1;

    /// Validación semántica ligera (sin efectos secundarios). Opcional.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Nombre de campo que lleva la versión dentro del payload.
    fn version_field_name() -> &'static str {
        "schema_version"
    }

    /// Serializa a `Artifact` sin hash (lo añade el engine).
    fn into_artifact(self) -> Result<Artifact, ArtifactError> {
        self.validate().map_err(ArtifactError::Validation)?;
        let mut value = serde_json::to_value(&self).map_err(|e| ArtifactError::Serialize(e.to_string()))?;
        if let Value::Object(map) = &mut value {
            map.entry(Self::version_field_name().to_string())
               .or_insert(Value::from(Self::SCHEMA_VERSION));
        }
        Ok(Artifact::new_unhashed(Self::KIND, value, None))
    }

    /// Decodifica desde artifact neutro verificando kind, versión y validación.
    fn from_artifact(a: &Artifact) -> Result<Self, ArtifactError> {
        if a.kind != Self::KIND {
            return Err(ArtifactError::KindMismatch { expected: Self::KIND,
                                                     found: a.kind });
        }
        let found_version = a.payload
                             .get(Self::version_field_name())
                             .and_then(|v| v.as_u64())
                             .map(|v| v as u32);
        match found_version {
            Some(v) if v == Self::SCHEMA_VERSION => {}
            other => {
                return Err(ArtifactError::VersionMismatch { expected: Self::SCHEMA_VERSION,
                                                            found: other })
            }
        }
        let decoded: Self =
            serde_json::from_value(a.payload.clone()).map_err(|e| ArtifactError::Deserialize(e.to_string()))?;
        decoded.validate().map_err(ArtifactError::Validation)?;
        Ok(decoded)
    }
}

/// Artifact tipado ya decodificado junto a su representación neutra (con hash).
#[derive(Debug, Clone)]
pub struct TypedArtifact<T: ArtifactSpec> {
    pub inner: T,
    pub raw: Artifact,
}

impl<T: ArtifactSpec> TypedArtifact<T> {
    pub fn decode(raw: &Artifact) -> Result<Self, ArtifactError> {
        let inner = T::from_artifact(raw)?;
        Ok(Self { inner, raw: raw.clone() })
    }

    pub fn hash(&self) -> &str {
        &self.raw.hash
    }
}
