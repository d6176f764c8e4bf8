//! pot-persistence
//!
//! Backend de ficheros del proyecto: los stores del engine viven bajo el
//! directorio de metadatos y cada nodo publica un manifiesto de outputs en su
//! propio directorio.
//!
//! Módulos:
//! - `config`: configuración desde entorno / `.env`.
//! - `fs`: `FsEventStore`, `FsArtifactStore` y `ManifestSink`.
//! - `project`: init/open/run/load sobre una raíz explícita.
//! - `vcs`: inicialización de control de versiones.
//! - `scratch`: proyecto temporal para tests.

pub mod config;
pub mod error;
pub mod fs;
pub mod project;
pub mod scratch;
pub mod vcs;

pub use config::{init_dotenv, ProjectConfig, VcsKind};
pub use error::PersistenceError;
pub use fs::{FsArtifactStore, FsEventStore, ManifestSink, NodeManifest};
pub use project::{Project, ProjectEngine, ProjectMeta};
pub use scratch::ScratchProject;
pub use vcs::{GitCli, NoVcs, VersionControl};
