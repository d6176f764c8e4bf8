use crate::{errors::CoreEngineError, model::Artifact};

/// Resultado abstracto de ejecutar un nodo: artifacts por puerto o error.
#[derive(Debug)]
pub enum NodeRunResult {
    Success { outputs: Vec<(String, Artifact)> },
    Failure { error: CoreEngineError },
}
