use pot_core::{ArtifactStore, EventStore, FlowBuilder, FlowEngine, FlowEventKind, InMemoryArtifactStore,
               InMemoryEventStore, InMemoryFlowRepository};
use uuid::Uuid;

#[test]
fn integration_smoke_inmemory_store_and_engine() {
    // InMemory event store should allow append and list deterministically
    let mut store = InMemoryEventStore::default();
    let flow_id = Uuid::new_v4();
    let ev = store.append_kind(flow_id,
                               FlowEventKind::FlowInitialized { definition_hash: "h1".to_string(),
                                                                node_count: 0 })
                  .unwrap();
    assert_eq!(ev.seq, 0);

    let mut engine = FlowEngine::new_with_stores(store, InMemoryArtifactStore::default(), InMemoryFlowRepository::new());
    let events = engine.event_store().list(flow_id).unwrap();
    assert!(events.iter().any(|e| matches!(e.kind, FlowEventKind::FlowInitialized { .. })),
            "FlowInitialized missing");

    // Un grafo vacío completa inmediatamente
    let def = FlowBuilder::new().build().unwrap();
    let id = engine.run(&def).unwrap();
    assert_eq!(engine.event_variants().unwrap(), vec!["I", "C"]);
    assert!(engine.artifact_store().get("missing").unwrap().is_none());
    assert_ne!(id, flow_id);
}
