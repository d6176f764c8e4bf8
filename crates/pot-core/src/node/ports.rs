use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::model::ArtifactSpec;

/// Referencia neutra a un puerto de salida: `nodo.puerto`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputRef {
    pub node: String,
    pub port: String,
}

impl OutputRef {
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self { node: node.into(),
               port: port.into() }
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

/// Input declarado por un nodo: nombre local del puerto + salida upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRef {
    pub port: String,
    pub source: OutputRef,
}

impl PortRef {
    pub fn new<T: ArtifactSpec>(port: impl Into<String>, source: &Port<T>) -> Self {
        Self { port: port.into(),
               source: source.target().clone() }
    }
}

/// Referencia tipada a la salida de otro nodo. El tipo `T` fija qué
/// `ArtifactSpec` se espera encontrar al decodificar el input.
pub struct Port<T> {
    target: OutputRef,
    _spec: PhantomData<fn() -> T>,
}

impl<T: ArtifactSpec> Port<T> {
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self { target: OutputRef::new(node, port),
               _spec: PhantomData }
    }

    pub fn target(&self) -> &OutputRef {
        &self.target
    }
}

impl<T> Clone for Port<T> {
    fn clone(&self) -> Self {
        Self { target: self.target.clone(),
               _spec: PhantomData }
    }
}

impl<T> fmt::Debug for Port<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Port({})", self.target)
    }
}

impl<T> PartialEq for Port<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}
