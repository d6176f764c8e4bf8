//! Definiciones relacionadas a nodos del grafo.
//!
//! Un nodo es una unidad determinista que consume 0..n artifacts publicados
//! por nodos upstream (referenciados por `OutputRef`) y publica 0..n artifacts
//! en puertos con nombre. Este módulo define:
//! - `NodeDefinition`: interfaz neutral usada por el engine.
//! - `TypedNode`: interfaz de alto nivel (opcional) con tipos fuertes.
//! - `Port<T>` / `OutputRef` / `PortRef`: referencias entre nodos.
//! - `NodeRunResult` y `NodeStatus`.

pub mod definition;
pub mod macros;
mod ports;
mod run_result;
mod status;
pub mod typed;

pub use definition::{NodeDefinition, NodeKind};
pub use ports::{OutputRef, Port, PortRef};
pub use run_result::NodeRunResult;
pub use status::NodeStatus;
pub use typed::{NodeInputs, NodeOutputs, TypedNode};
