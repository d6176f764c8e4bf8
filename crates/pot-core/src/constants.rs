//! Constantes del motor core.
//!
//! Este módulo agrupa valores estáticos que participan en el cálculo de
//! fingerprints y en la compatibilidad entre versiones del motor. Cambios en
//! estas constantes invalidan los fingerprints almacenados si forman parte del
//! input del hashing (`ENGINE_VERSION` sí lo es).

/// Versión lógica del motor DAG. Se incluye en el `NodeFingerprintInput` para
/// que un cambio de versión del engine recalcule los fingerprints aunque la
/// definición y los datos no cambien.
pub const ENGINE_VERSION: &str = "D1.0";
