//! Engine module: builder diferido del grafo, executor topológico y
//! contexto por flujo.

pub mod builder;
pub mod core;
pub mod flow_ctx;
pub mod sink;

pub use builder::{FlowBuilder, NodeHandle};
pub use core::FlowEngine;
pub use flow_ctx::FlowCtx;
pub use sink::{NodeCompletion, OutputSink};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreEngineError;
    use crate::model::ExecutionContext;
    use crate::node::{NodeDefinition, NodeInputs, NodeKind, NodeRunResult, Port, PortRef, TypedNode};
    use crate::{node_outputs, typed_artifact};

    typed_artifact!(Numbers { values: Vec<i64> });

    node_outputs!(One { out: Numbers });
    node_outputs!(Split { low: Numbers, high: Numbers });

    #[derive(Debug)]
    struct Seed(&'static str);

    impl TypedNode for Seed {
        type Params = ();
        type Outputs = One;
        fn name(&self) -> &str { self.0 }
        fn kind(&self) -> NodeKind { NodeKind::Source }
        fn run_typed(&self, _inputs: &NodeInputs<'_>, _p: ()) -> Result<One, CoreEngineError> {
            Ok(One { out: Numbers { values: (0..10).collect(), schema_version: 1 } })
        }
    }

    #[derive(Debug)]
    struct Splitter { name: &'static str, data: Port<Numbers> }

    impl TypedNode for Splitter {
        type Params = ();
        type Outputs = Split;
        fn name(&self) -> &str { self.name }
        fn kind(&self) -> NodeKind { NodeKind::Transform }
        fn inputs(&self) -> Vec<PortRef> { vec![PortRef::new("data", &self.data)] }
        fn run_typed(&self, inputs: &NodeInputs<'_>, _p: ()) -> Result<Split, CoreEngineError> {
            let n = inputs.get(&self.data)?;
            let (low, high): (Vec<i64>, Vec<i64>) = n.values.into_iter().partition(|v| *v < 5);
            Ok(Split { low: Numbers { values: low, schema_version: 1 },
                       high: Numbers { values: high, schema_version: 1 } })
        }
    }

    #[derive(Debug)]
    struct Sum { name: &'static str, a: Port<Numbers>, b: Port<Numbers> }

    impl TypedNode for Sum {
        type Params = ();
        type Outputs = One;
        fn name(&self) -> &str { self.name }
        fn kind(&self) -> NodeKind { NodeKind::Sink }
        fn inputs(&self) -> Vec<PortRef> { vec![PortRef::new("a", &self.a), PortRef::new("b", &self.b)] }
        fn run_typed(&self, inputs: &NodeInputs<'_>, _p: ()) -> Result<One, CoreEngineError> {
            let a = inputs.get(&self.a)?;
            let b = inputs.get(&self.b)?;
            Ok(One { out: Numbers { values: vec![a.values.iter().sum::<i64>() + b.values.iter().sum::<i64>()], schema_version: 1 } })
        }
    }

    // Nodo neutral que siempre falla
    #[derive(Debug)]
    struct Broken { data: Port<Numbers> }

    impl NodeDefinition for Broken {
        fn name(&self) -> &str { "broken" }
        fn kind(&self) -> NodeKind { NodeKind::Sink }
        fn inputs(&self) -> Vec<PortRef> { vec![PortRef::new("data", &self.data)] }
        fn output_ports(&self) -> Vec<String> { vec![] }
        fn base_params(&self) -> serde_json::Value { serde_json::json!({}) }
        fn run(&self, _ctx: &ExecutionContext) -> NodeRunResult {
            NodeRunResult::Failure { error: CoreEngineError::NodeExecution("boom".into()) }
        }
    }

    // Declara dos puertos pero sólo publica uno
    #[derive(Debug)]
    struct HalfSplit;

    impl NodeDefinition for HalfSplit {
        fn name(&self) -> &str { "half" }
        fn kind(&self) -> NodeKind { NodeKind::Source }
        fn inputs(&self) -> Vec<PortRef> { vec![] }
        fn output_ports(&self) -> Vec<String> { vec!["low".into(), "high".into()] }
        fn base_params(&self) -> serde_json::Value { serde_json::json!({}) }
        fn run(&self, _ctx: &ExecutionContext) -> NodeRunResult {
            let low = crate::model::ArtifactSpec::into_artifact(Numbers { values: vec![1], schema_version: 1 }).unwrap();
            NodeRunResult::Success { outputs: vec![("low".to_string(), low)] }
        }
    }

    fn diamond() -> crate::repo::FlowDefinition {
        let mut b = FlowBuilder::new();
        // Declaramos el sumidero antes que sus dependencias para forzar el orden topológico
        let seed = Port::<Numbers>::new("seed", "out");
        let low = Port::<Numbers>::new("split", "low");
        let high = Port::<Numbers>::new("split", "high");
        b.add(Sum { name: "sum", a: low, b: high }).unwrap();
        let s = b.add(Splitter { name: "split", data: seed }).unwrap();
        assert_eq!(s.ports(), ["low".to_string(), "high".to_string()]);
        b.add(Seed("seed")).unwrap();
        b.build().expect("valid graph")
    }

    #[test]
    fn builder_orders_nodes_topologically() {
        let def = diamond();
        assert_eq!(def.order(), vec!["seed", "split", "sum"]);
        assert_eq!(def.definition_hash.len(), 64);
    }

    #[test]
    fn run_executes_in_dependency_order_and_completes() {
        let def = diamond();
        let mut engine = FlowEngine::in_memory();
        let flow_id = engine.run(&def).expect("flow should complete");
        assert_eq!(engine.default_flow_id(), Some(flow_id));
        assert_eq!(engine.event_variants().unwrap(), vec!["I", "S", "F", "S", "F", "S", "F", "C"]);

        let hash = engine.outputs_of("sum").unwrap()["out"].clone();
        let art = engine.get_artifact(&hash).unwrap().unwrap();
        let out = <Numbers as crate::model::ArtifactSpec>::from_artifact(&art).unwrap();
        assert_eq!(out.values, vec![45]);
    }

    #[test]
    fn fingerprint_is_reproducible_across_engines() {
        let mut e1 = FlowEngine::in_memory();
        let mut e2 = FlowEngine::in_memory();
        e1.run(&diamond()).unwrap();
        e2.run(&diamond()).unwrap();
        assert!(e1.flow_fingerprint().is_some());
        assert_eq!(e1.flow_fingerprint(), e2.flow_fingerprint());
    }

    #[test]
    fn failure_stops_the_flow() {
        let mut b = FlowBuilder::new();
        let seed = b.add(Seed("seed")).unwrap();
        b.add(Broken { data: seed.output("out") }).unwrap();
        let def = b.build().unwrap();

        let mut engine = FlowEngine::in_memory();
        let err = engine.run(&def).unwrap_err();
        assert_eq!(err, CoreEngineError::NodeExecution("boom".into()));
        assert_eq!(engine.event_variants().unwrap(), vec!["I", "S", "F", "S", "X"]);

        let flow_id = engine.default_flow_id().unwrap();
        let mut ctx = FlowCtx::new(&mut engine, flow_id, &def);
        assert_eq!(ctx.step(), Err(CoreEngineError::FlowHasFailed));
    }

    #[test]
    fn declared_port_without_output_fails_the_node() {
        let mut b = FlowBuilder::new();
        let half = b.add(HalfSplit).unwrap();
        b.add(Sum { name: "sum", a: half.output("low"), b: half.output("high") }).unwrap();
        let def = b.build().unwrap();

        let mut engine = FlowEngine::in_memory();
        let err = engine.run(&def).unwrap_err();
        assert_eq!(err, CoreEngineError::MissingOutput { node: "half".into(), port: "high".into() });
        assert_eq!(engine.event_variants().unwrap(), vec!["I", "S", "X"]);
        assert!(engine.outputs_of("half").is_none());
    }

    #[test]
    fn flow_ctx_steps_one_node_at_a_time() {
        let def = diamond();
        let mut engine = FlowEngine::in_memory();
        let flow_id = uuid::Uuid::new_v4();
        let mut ctx = FlowCtx::new(&mut engine, flow_id, &def);
        assert!(ctx.step().is_ok());
        assert_eq!(ctx.run_n(1), Ok(1));
        assert_eq!(ctx.run_n(5), Ok(1));
        assert_eq!(ctx.step(), Err(CoreEngineError::FlowCompleted));
    }

    #[test]
    fn node_without_workspace_reports_it() {
        let ctx = ExecutionContext { node: "n".into(),
                                     inputs: Default::default(),
                                     params: serde_json::Value::Null,
                                     workspace: None };
        assert_eq!(NodeInputs::new(&ctx).node_dir().unwrap_err(),
                   CoreEngineError::MissingWorkspace("n".into()));
    }
}
