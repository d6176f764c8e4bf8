//! Modelos neutrales (Artifact, Fingerprint, ExecutionContext,...)

pub mod artifact;
pub mod context;
pub mod fingerprint;
pub mod typed_artifact;

pub use artifact::{Artifact, ArtifactKind};
pub use context::{ExecutionContext, NodeWorkspace};
pub use fingerprint::NodeFingerprintInput;
pub use typed_artifact::{ArtifactError, ArtifactSpec, TypedArtifact};
