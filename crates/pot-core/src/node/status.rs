/// Estado de un nodo en tiempo de ejecución.
///
/// Las transiciones válidas son:
/// - `Pending` -> `Running`
/// - `Running` -> `FinishedOk`
/// - `Running` -> `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// El nodo está pendiente de ejecución.
    Pending,
    /// El nodo está en ejecución.
    Running,
    /// El nodo finalizó correctamente.
    FinishedOk,
    /// El nodo falló.
    Failed,
}
