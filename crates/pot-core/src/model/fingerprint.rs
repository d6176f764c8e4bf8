use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Insumos para calcular el fingerprint de un nodo terminado.
/// NO es el fingerprint final (string hash) sino el modelo previo a canonicalizar.
#[derive(Serialize)]
pub struct NodeFingerprintInput<'a> {
    pub engine_version: &'a str,
    pub definition_hash: &'a str,
    pub node_index: usize,
    pub node: &'a str,
    pub output_hashes: &'a BTreeMap<String, String>, // port -> hash, orden estable por BTreeMap
    pub params: &'a Value,
}
