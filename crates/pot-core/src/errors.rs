//! Errores específicos del core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("flow already completed")]
    FlowCompleted,
    #[error("flow has failed previously (stop-on-failure invariant)")]
    FlowHasFailed,
    #[error("duplicate node name: {0}")]
    DuplicateNode(String),
    #[error("node '{node}' references unknown node '{target}'")]
    UnknownNode { node: String, target: String },
    #[error("node '{node}' references unknown port '{target}.{port}'")]
    UnknownPort { node: String, target: String, port: String },
    #[error("node '{node}' did not publish declared output port '{port}'")]
    MissingOutput { node: String, port: String },
    #[error("dependency cycle detected among nodes: {0:?}")]
    CycleDetected(Vec<String>),
    #[error("missing required inputs for node '{0}'")]
    MissingInputs(String),
    #[error("input '{source_ref}' could not be decoded: {details}")]
    InputDecode { source_ref: String, details: String },
    #[error("node '{0}' requires a project workspace but the engine has none")]
    MissingWorkspace(String),
    #[error("node execution failed: {0}")]
    NodeExecution(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("internal: {0}")]
    Internal(String),
}
