use pot_adapters::{AddData, StructureSetArtifact, UniformEnergeticSelection};
use pot_core::{Artifact, ArtifactKind, ArtifactStore, EventStore, FlowBuilder, FlowEventKind};
use pot_domain::{extxyz, generate, SyntheticConfig};
use pot_persistence::{FsArtifactStore, FsEventStore, PersistenceError, Project, ProjectConfig, ScratchProject, VcsKind};
use serde_json::json;
use uuid::Uuid;

fn config() -> ProjectConfig {
    ProjectConfig::default().with_vcs(VcsKind::None)
}

#[test]
fn init_writes_metadata_and_rejects_reinit() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("proj");
    let project = Project::init(&root, &config()).unwrap();
    assert!(root.join(".potflow/project.json").is_file());
    assert!(root.join(".potflow/.gitignore").is_file());
    assert!(root.join("nodes").is_dir());
    assert_eq!(project.meta().name, "proj");
    assert_eq!(project.meta().vcs, "none");

    let err = Project::init(&root, &config()).unwrap_err();
    assert!(matches!(err, PersistenceError::AlreadyInitialized(_)));

    let reopened = Project::open_with(&root, &config()).unwrap();
    assert_eq!(reopened.meta(), project.meta());
}

#[test]
fn open_requires_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let err = Project::open_with(dir.path(), &config()).unwrap_err();
    assert!(matches!(err, PersistenceError::NotInitialized(_)));
}

#[test]
fn fs_event_store_assigns_sequence_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsEventStore::new(dir.path().join("events"));
    let flow = Uuid::new_v4();
    store.append_kind(flow, FlowEventKind::FlowInitialized { definition_hash: "h".into(), node_count: 1 })
         .unwrap();
    store.append_kind(flow, FlowEventKind::NodeStarted { node_index: 0, node: "a".into() })
         .unwrap();

    // un store nuevo sobre el mismo directorio ve el mismo log
    let reopened = FsEventStore::new(dir.path().join("events"));
    let events = reopened.list(flow).unwrap();
    assert_eq!(events.iter().map(|e| e.seq).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(events[1].kind.variant_name(), "NodeStarted");
    assert_eq!(reopened.flows().unwrap(), vec![flow]);
    assert!(reopened.list(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn fs_artifact_store_dedups_and_detects_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsArtifactStore::new(dir.path());
    let mut artifact = Artifact::new_unhashed(ArtifactKind::GenericJson, json!({"x": [1.5, 2.25]}), None);
    let hash = artifact.seal();
    store.put(&artifact).unwrap();
    store.put(&artifact).unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    assert_eq!(store.get(&hash).unwrap(), Some(artifact.clone()));
    assert_eq!(store.get("missing").unwrap(), None);

    let mut tampered = artifact.clone();
    tampered.payload = json!({"x": [0.0]});
    std::fs::write(dir.path().join(format!("{hash}.json")), serde_json::to_vec(&tampered).unwrap()).unwrap();
    assert!(store.get(&hash).is_err());
}

#[test]
fn run_publishes_manifests_and_reload_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::init(dir.path(), &config()).unwrap();
    let records = generate(&SyntheticConfig::default()).unwrap();
    extxyz::write_path(dir.path().join("data.extxyz"), &records).unwrap();

    let mut b = FlowBuilder::new();
    let data = AddData::new("data.extxyz").named("data_1");
    let selection = UniformEnergeticSelection::new(data.atoms(), 10).named("train_data");
    b.add(data).unwrap();
    b.add(selection).unwrap();
    let flow_id = project.run(&b.build().unwrap()).unwrap();

    let manifest = project.load_outputs("train_data").unwrap();
    assert_eq!(manifest.flow_id, flow_id);
    assert_eq!(manifest.outputs.keys().collect::<Vec<_>>(), vec!["atoms", "excluded_atoms"]);
    let names: Vec<_> = project.manifests().unwrap().into_iter().map(|m| m.node).collect();
    assert_eq!(names, vec!["data_1", "train_data"]);

    let fresh = Project::open_with(dir.path(), &config()).unwrap();
    let first: StructureSetArtifact = fresh.load("data_1", "atoms").unwrap();
    let second: StructureSetArtifact = fresh.load("data_1", "atoms").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.records, records);

    let selected: StructureSetArtifact = fresh.load("train_data", "atoms").unwrap();
    assert_eq!(selected.len(), 10);

    assert!(matches!(fresh.load::<StructureSetArtifact>("data_1", "nope"),
                     Err(PersistenceError::UnknownPort { .. })));
    assert!(matches!(fresh.load_outputs("never_ran"), Err(PersistenceError::MissingManifest(_))));

    let events = fresh.event_store().list(flow_id).unwrap();
    assert!(matches!(events.last().map(|e| &e.kind), Some(FlowEventKind::FlowCompleted { .. })));
}

#[test]
fn failed_rerun_leaves_only_manifests_of_the_new_flow() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::init(dir.path(), &config()).unwrap();
    let records = generate(&SyntheticConfig::default()).unwrap();
    extxyz::write_path(dir.path().join("full.extxyz"), &records).unwrap();
    extxyz::write_path(dir.path().join("small.extxyz"), &records[..5]).unwrap();

    let pipeline = |file: &str| {
        let mut b = FlowBuilder::new();
        let data = AddData::new(file).named("data_1");
        let selection = UniformEnergeticSelection::new(data.atoms(), 10).named("train_data");
        b.add(data).unwrap();
        b.add(selection).unwrap();
        b.build().unwrap()
    };
    let first = project.run(&pipeline("full.extxyz")).unwrap();
    assert_eq!(project.load_outputs("train_data").unwrap().flow_id, first);

    // 5 estructuras no alcanzan para seleccionar 10
    assert!(project.run(&pipeline("small.extxyz")).is_err());

    let fresh = Project::open_with(dir.path(), &config()).unwrap();
    let data: StructureSetArtifact = fresh.load("data_1", "atoms").unwrap();
    assert_eq!(data.len(), 5);
    let second = fresh.load_outputs("data_1").unwrap().flow_id;
    assert_ne!(second, first);
    assert!(matches!(fresh.load::<StructureSetArtifact>("train_data", "atoms"),
                     Err(PersistenceError::MissingManifest(_))));
    assert!(fresh.manifests().unwrap().iter().all(|m| m.flow_id == second));
}

#[test]
fn scratch_project_copies_caller_and_aux_files() {
    let dir = tempfile::tempdir().unwrap();
    let aux = dir.path().join("allegro_minimal.yaml");
    std::fs::write(&aux, "r_max: 4.0\n").unwrap();

    let caller = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/project_tests.rs");
    let scratch = ScratchProject::create(&caller).unwrap().with_aux(&aux).unwrap();
    assert!(scratch.root().join("project_tests.rs").is_file());
    assert!(scratch.root().join("allegro_minimal.yaml").is_file());
    assert!(scratch.root().join(".potflow/project.json").is_file());
    assert_eq!(scratch.reopen().unwrap().meta(), scratch.project().meta());
}
