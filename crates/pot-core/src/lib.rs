//! pot-core: motor DAG determinista.
//!
//! Los nodos se declaran sobre un `FlowBuilder` (construcción diferida), el
//! grafo se valida y ordena topológicamente, y `FlowEngine::run` lo ejecuta
//! persistiendo cada output (direccionado por contenido) antes de arrancar a
//! los nodos dependientes. Todo el progreso queda registrado como eventos.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod node;
pub mod repo;
pub mod store;

pub use engine::{FlowBuilder, FlowCtx, FlowEngine, NodeCompletion, NodeHandle, OutputSink};
pub use errors::CoreEngineError;
pub use event::{EventStore, FlowEvent, FlowEventKind, InMemoryEventStore};
pub use model::{Artifact, ArtifactError, ArtifactKind, ArtifactSpec, ExecutionContext, NodeWorkspace, TypedArtifact};
pub use node::{NodeDefinition, NodeInputs, NodeKind, NodeOutputs, NodeRunResult, NodeStatus, OutputRef, Port, PortRef,
               TypedNode};
pub use repo::{build_flow_definition, FlowDefinition, FlowRepository, InMemoryFlowRepository};
pub use store::{ArtifactStore, InMemoryArtifactStore};
