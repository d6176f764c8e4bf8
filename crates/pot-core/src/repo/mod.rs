pub mod types;
pub use types::{build_flow_definition, FlowDefinition, FlowInstance, FlowRepository, InMemoryFlowRepository, NodeSlot};
