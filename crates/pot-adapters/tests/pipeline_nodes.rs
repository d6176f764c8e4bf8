//! Pipeline completo sobre el engine en memoria con un workspace temporal.

use pot_adapters::{AddData, StructureSetArtifact, TrainPotential, TrainedModel, TrainedModelArtifact,
                   UniformEnergeticSelection};
use pot_core::{ArtifactSpec, CoreEngineError, FlowBuilder, FlowEngine};
use pot_domain::{extxyz, generate, Calculator, SyntheticConfig};

const CONFIG: &str = "\
model_builders:
  - allegro.model.Allegro
  - PerSpeciesRescale
chemical_symbols: [C, O]
r_max: 4.0
";

fn decode<T: ArtifactSpec>(engine: &FlowEngine<pot_core::InMemoryEventStore,
                                               pot_core::InMemoryArtifactStore,
                                               pot_core::InMemoryFlowRepository>,
                           node: &str,
                           port: &str)
                           -> T {
    let outputs = engine.outputs_of(node).expect("node finished");
    let artifact = engine.get_artifact(&outputs[port]).unwrap().expect("artifact stored");
    T::from_artifact(&artifact).unwrap()
}

#[test]
fn pipeline_trains_and_deploys_model() {
    let dir = tempfile::tempdir().unwrap();
    let records = generate(&SyntheticConfig::default()).unwrap();
    extxyz::write_path(dir.path().join("trajectory.extxyz"), &records).unwrap();
    std::fs::write(dir.path().join("allegro_minimal.yaml"), CONFIG).unwrap();

    let mut b = FlowBuilder::new();
    let data = AddData::new("trajectory.extxyz").named("data_1");
    let train = UniformEnergeticSelection::new(data.atoms(), 10).named("train_data");
    let validation = UniformEnergeticSelection::new(train.excluded_atoms(), 8).named("val_data");
    let model = TrainPotential::new("allegro_minimal.yaml", "cpu", train.atoms(), validation.atoms());
    // declarado en orden inverso: el builder ordena topológicamente
    b.add(model).unwrap();
    b.add(validation).unwrap();
    b.add(train).unwrap();
    b.add(data).unwrap();
    let definition = b.build().unwrap();
    assert_eq!(definition.order(), vec!["data_1", "train_data", "val_data", "MLModel"]);

    let mut engine = FlowEngine::in_memory().with_workspace(dir.path(), "nodes");
    engine.run(&definition).unwrap();

    let atoms: StructureSetArtifact = decode(&engine, "data_1", "atoms");
    assert_eq!(atoms.records, records);
    assert_eq!(atoms.source_sha256.as_ref().map(String::len), Some(64));

    let selected: StructureSetArtifact = decode(&engine, "train_data", "atoms");
    let rest: StructureSetArtifact = decode(&engine, "train_data", "excluded_atoms");
    let val: StructureSetArtifact = decode(&engine, "val_data", "atoms");
    assert_eq!((selected.len(), rest.len(), val.len()), (10, 11, 8));
    assert!(val.records.iter().all(|r| !selected.records.contains(r)));

    let artifact: TrainedModelArtifact = decode(&engine, "MLModel", "model");
    assert_eq!(artifact.deployed_model, "nodes/MLModel/deployed_model.pth");
    assert_eq!(artifact.metrics.n_train, 10);
    assert_eq!(artifact.metrics.n_validation, 8);

    let handle = TrainedModel::new(artifact, dir.path());
    assert_eq!(handle.lammps_pair_style(), "allegro");
    assert_eq!(handle.lammps_pair_coeff()[0], "* * nodes/MLModel/deployed_model.pth C O");
    assert!(handle.deployed_model_path().is_file());

    let calc = handle.calculator().unwrap();
    let energy = calc.potential_energy(records[0].structure()).unwrap();
    let forces = calc.forces(records[0].structure()).unwrap();
    assert!(energy.is_finite() && energy != 0.0);
    assert_ne!(forces[0][0], 0.0);
}

#[test]
fn selection_larger_than_pool_fails_the_flow() {
    let dir = tempfile::tempdir().unwrap();
    let records = generate(&SyntheticConfig::default().with_n(5)).unwrap();
    extxyz::write_path(dir.path().join("small.extxyz"), &records).unwrap();

    let mut b = FlowBuilder::new();
    let data = b.add(AddData::new("small.extxyz")).unwrap();
    b.add(UniformEnergeticSelection::new(data.output("atoms"), 10)).unwrap();
    let definition = b.build().unwrap();

    let mut engine = FlowEngine::in_memory().with_workspace(dir.path(), "nodes");
    let err = engine.run(&definition).unwrap_err();
    assert!(matches!(err, CoreEngineError::NodeExecution(ref m) if m.contains("requested 10")), "{err:?}");
    assert_eq!(engine.event_variants().unwrap(), vec!["I", "S", "F", "S", "X"]);
}

#[test]
fn training_requires_a_workspace() {
    let records = generate(&SyntheticConfig::default().with_n(4)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("t.extxyz");
    extxyz::write_path(&file, &records).unwrap();

    let mut b = FlowBuilder::new();
    let data = AddData::new(&file);
    let model = TrainPotential::new("missing.yaml", "cpu", data.atoms(), data.atoms());
    b.add(data).unwrap();
    b.add(model).unwrap();
    let definition = b.build().unwrap();

    // sin workspace AddData usa la ruta absoluta, pero el entrenamiento no
    // tiene dónde desplegar el modelo
    let mut engine = FlowEngine::in_memory();
    let err = engine.run(&definition).unwrap_err();
    assert_eq!(err, CoreEngineError::MissingWorkspace("MLModel".to_string()));
}
