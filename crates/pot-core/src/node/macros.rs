//! Macros utilitarias para reducir boilerplate al definir artifacts tipados
//! y conjuntos de salidas de nodos.
//!
//! Exportadas en la raíz del crate:
//!   use pot_core::{node_outputs, typed_artifact};

/// Declara un artifact tipado con derives y `ArtifactSpec`.
///
/// Formas soportadas:
/// - typed_artifact!(Name { field1: Ty1, field2: Ty2 }); // KIND = GenericJson
/// - typed_artifact!(Name { field1: Ty1 } kind: $kind_expr);
#[macro_export]
macro_rules! typed_artifact {
    ($(#[$meta:meta])* $name:ident { $($fname:ident : $fty:ty),+ $(,)? } kind: $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name { $(pub $fname: $fty,)+ pub schema_version: u32 }
        impl $crate::model::ArtifactSpec for $name {
            const KIND: $crate::model::ArtifactKind = $kind;
        }
    };
    ($(#[$meta:meta])* $name:ident { $($fname:ident : $fty:ty),+ $(,)? }) => {
        $crate::typed_artifact!($(#[$meta])* $name { $($fname : $fty),+ } kind: $crate::model::ArtifactKind::GenericJson);
    };
}

/// Declara el struct de salidas de un nodo: un campo por puerto.
///
/// node_outputs!(SelectionOutputs { atoms: SetArtifact, excluded_atoms: SetArtifact });
#[macro_export]
macro_rules! node_outputs {
    ($(#[$meta:meta])* $name:ident { $($port:ident : $ty:ty),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name { $(pub $port: $ty,)+ }
        impl $crate::node::NodeOutputs for $name {
            fn ports() -> &'static [&'static str] {
                &[$(stringify!($port)),+]
            }
            fn into_artifacts(self) -> Result<Vec<(String, $crate::model::Artifact)>, $crate::model::ArtifactError> {
                Ok(vec![$((stringify!($port).to_string(),
                           $crate::model::ArtifactSpec::into_artifact(self.$port)?)),+])
            }
        }
    };
}
