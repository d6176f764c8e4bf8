//! Backend de ficheros para los stores del engine.
mod artifacts;
mod events;
mod manifest;

pub use artifacts::FsArtifactStore;
pub use events::FsEventStore;
pub use manifest::{ManifestSink, NodeManifest, MANIFEST_FILE};
