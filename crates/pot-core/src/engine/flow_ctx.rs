//! Ejecución paso a paso de un flujo ya declarado.

use uuid::Uuid;

use crate::engine::FlowEngine;
use crate::errors::CoreEngineError;
use crate::event::EventStore;
use crate::repo::{FlowDefinition, FlowRepository};
use crate::store::ArtifactStore;

/// Cursor sobre un `flow_id` concreto. Útil en tests y para inspeccionar el
/// estado entre nodos (p. ej. leer artifacts intermedios antes del
/// entrenamiento).
pub struct FlowCtx<'a, E: EventStore, A: ArtifactStore, R: FlowRepository> {
    pub engine: &'a mut FlowEngine<E, A, R>,
    pub flow_id: Uuid,
    pub definition: &'a FlowDefinition,
}

impl<'a, E: EventStore, A: ArtifactStore, R: FlowRepository> FlowCtx<'a, E, A, R> {
    pub fn new(engine: &'a mut FlowEngine<E, A, R>, flow_id: Uuid, definition: &'a FlowDefinition) -> Self {
        Self { engine,
               flow_id,
               definition }
    }

    /// Ejecuta el siguiente nodo pendiente.
    pub fn step(&mut self) -> Result<(), CoreEngineError> {
        self.engine.next_with(self.flow_id, self.definition)
    }

    /// Ejecuta como máximo `n` nodos; retorna cuántos corrieron.
    /// Un flujo ya completo no es error: simplemente se detiene.
    pub fn run_n(&mut self, n: usize) -> Result<usize, CoreEngineError> {
        let mut executed = 0;
        while executed < n {
            match self.step() {
                Ok(()) => executed += 1,
                Err(CoreEngineError::FlowCompleted) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(executed)
    }

    pub fn run_to_completion(&mut self) -> Result<Uuid, CoreEngineError> {
        self.engine.run_flow_to_completion(self.flow_id, self.definition)
    }
}
