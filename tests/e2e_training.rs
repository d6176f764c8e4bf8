//! Escenario completo: trayectoria sintética -> selección -> entrenamiento ->
//! recarga desde disco en un proyecto temporal.

use std::path::{Path, PathBuf};

use potflow::adapters::{StructureSetArtifact, TrainedModelArtifact};
use potflow::domain::{extxyz, generate, SyntheticConfig};
use potflow::{run_pipeline, AddData, Calculator, ScratchProject, TrainPotential, UniformEnergeticSelection};

fn manifest_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(rel)
}

#[test]
fn trains_allegro_style_potential_and_reloads_it() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = tempfile::tempdir()?;
    let trajectory = data_dir.path().join("trajectory.extxyz");
    let records = generate(&SyntheticConfig::default())?;
    extxyz::write_path(&trajectory, &records)?;

    let scratch = ScratchProject::create(manifest_path("tests/e2e_training.rs"))?
        .with_aux(manifest_path("tests/data/allegro_minimal.yaml"))?;
    assert!(scratch.root().join("e2e_training.rs").is_file());
    assert!(scratch.root().join("allegro_minimal.yaml").is_file());

    let traj = trajectory.clone();
    run_pipeline(scratch.project(), move |b| {
        let data = AddData::new(traj).named("data_1");
        let train = UniformEnergeticSelection::new(data.atoms(), 10).named("train_data");
        let validation = UniformEnergeticSelection::new(train.excluded_atoms(), 8).named("val_data");
        let model = TrainPotential::new("allegro_minimal.yaml", "cpu", train.atoms(), validation.atoms());
        b.add(data)?;
        b.add(train)?;
        b.add(validation)?;
        b.add(model)?;
        Ok(())
    })?;

    // una sesión nueva sólo ve lo que quedó en disco
    let project = scratch.reopen()?;
    let atoms: StructureSetArtifact = project.load("data_1", "atoms")?;
    assert_eq!(atoms.records, records);

    let train: StructureSetArtifact = project.load("train_data", "atoms")?;
    let validation: StructureSetArtifact = project.load("val_data", "atoms")?;
    assert_eq!((train.len(), validation.len()), (10, 8));

    let model = project.load_model("MLModel")?;
    assert_eq!(model.lammps_pair_style(), "allegro");
    assert_eq!(model.lammps_pair_coeff(), vec!["* * nodes/MLModel/deployed_model.pth C O".to_string()]);
    assert!(model.deployed_model_path().starts_with(scratch.root()));

    let calc = model.calculator()?;
    let first = atoms.records[0].structure();
    let energy = calc.potential_energy(first)?;
    let forces = calc.forces(first)?;
    assert!(energy.is_finite());
    assert_ne!(energy, 0.0);
    assert_eq!(forces.len(), 2);
    assert_ne!(forces[0][0], 0.0);

    let again: TrainedModelArtifact = project.load("MLModel", "model")?;
    assert_eq!(&again, model.artifact());
    assert_eq!(project.load::<StructureSetArtifact>("data_1", "atoms")?, atoms);
    Ok(())
}

#[test]
fn pipeline_with_unknown_species_fails_without_manifest() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = tempfile::tempdir()?;
    let trajectory = data_dir.path().join("trajectory.extxyz");
    let records = generate(&SyntheticConfig::default())?;
    extxyz::write_path(&trajectory, &records)?;

    let scratch = ScratchProject::create(manifest_path("tests/e2e_training.rs"))?;
    std::fs::write(scratch.root().join("wrong_species.yaml"), "chemical_symbols: [H, N]\n")?;

    let result = run_pipeline(scratch.project(), move |b| {
        let data = AddData::new(trajectory).named("data_1");
        let model = TrainPotential::new("wrong_species.yaml", "cpu", data.atoms(), data.atoms());
        b.add(data)?;
        b.add(model)?;
        Ok(())
    });
    assert!(result.is_err());
    let project = scratch.reopen()?;
    assert!(project.load_outputs("data_1").is_ok());
    assert!(project.load_outputs("MLModel").is_err());
    Ok(())
}
