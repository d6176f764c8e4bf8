//! potflow
//!
//! Fachada del workspace: pipeline determinista para construir conjuntos de
//! datos atómicos y entrenar potenciales interatómicos.
//!
//! - `engine`: motor DAG (builder diferido, ejecución topológica, eventos).
//! - `domain`: estructuras, extended XYZ, generador sintético, selección.
//! - `adapters`: artifacts y nodos (`AddData`, `UniformEnergeticSelection`,
//!   `TrainPotential`), entrenador y calculador.
//! - `persistence`: proyecto en disco, stores de ficheros, fixture temporal.

pub use pot_adapters as adapters;
pub use pot_core as engine;
pub use pot_domain as domain;
pub use pot_persistence as persistence;

pub use pot_adapters::{AddData, TrainPotential, TrainedModel, UniformEnergeticSelection};
pub use pot_core::{FlowBuilder, FlowDefinition};
pub use pot_domain::{Calculator, StructureRecord};
pub use pot_persistence::{PersistenceError, Project, ScratchProject};

/// Declara un pipeline y lo ejecuta en `project`.
///
/// `declare` sólo registra nodos; nada corre hasta que el grafo completo se
/// valida y se llama a `Project::run`.
pub fn run_pipeline<F>(project: &Project, declare: F) -> Result<uuid::Uuid, PersistenceError>
    where F: FnOnce(&mut FlowBuilder) -> Result<(), pot_core::CoreEngineError>
{
    let mut builder = FlowBuilder::new();
    declare(&mut builder)?;
    let definition = builder.build()?;
    log::info!("pipeline declarado: {}", definition.order().join(" -> "));
    project.run(&definition)
}
