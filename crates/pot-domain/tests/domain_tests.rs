use pot_domain::extxyz;
use pot_domain::{generate, uniform_energetic, Calculator, SinglePointCalculator, SyntheticConfig};

#[test]
fn test_generator_labels_follow_index() {
    for n in [0, 1, 2, 7, 21, 50] {
        let records = generate(&SyntheticConfig::default().with_n(n)).unwrap();
        assert_eq!(records.len(), n);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.len(), 2);
            assert_eq!(r.energy(), Some(i as f64 / n as f64), "n={n} i={i}");
            assert_eq!(r.labels().energy_uncertainty, Some(i as f64 + 2.0));
            let sigma = r.labels().forces_uncertainty.as_ref().unwrap();
            assert_eq!(sigma.len(), 2);
            assert!(sigma.iter().flatten().all(|v| *v == 2.0 + i as f64));
            let forces = r.forces().unwrap();
            assert_eq!(forces.len(), 2);
            assert!(forces.iter().flatten().all(|f| f.is_finite()));
            assert_eq!(r.structure().chemical_formula(), "CO");
        }
        // energías estrictamente crecientes
        assert!(records.windows(2).all(|w| w[0].energy() < w[1].energy()), "n={n}");
    }
}

#[test]
fn test_generator_same_seed_same_labels() {
    let a = generate(&SyntheticConfig::default()).unwrap();
    let b = generate(&SyntheticConfig::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_extxyz_file_roundtrip_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.extxyz");
    let records = generate(&SyntheticConfig::default()).unwrap();
    extxyz::write_path(&path, &records).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("pbc=\"T T T\""));
    assert!(text.contains("Properties=species:S:1:pos:R:3:forces:R:3:forces_uncertainty:R:3"));

    let back = extxyz::read_path(&path).unwrap();
    assert_eq!(back, records);
}

#[test]
fn test_extxyz_files_are_write_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.extxyz");
    let records = generate(&SyntheticConfig::default().with_n(2)).unwrap();
    extxyz::write_path(&path, &records).unwrap();
    assert!(extxyz::write_path(&path, &records).is_err());
}

#[test]
fn test_train_and_validation_selections_are_disjoint() {
    // 21 -> 10 para entrenamiento, 8 de los 11 restantes para validación
    let records = generate(&SyntheticConfig::default()).unwrap();
    let train = uniform_energetic(&records, 10).unwrap();
    assert_eq!(train.selected.len(), 10);
    assert_eq!(train.excluded.len(), 11);

    let (_, rest) = train.split(&records);
    let validation = uniform_energetic(&rest, 8).unwrap();
    assert_eq!(validation.selected.len(), 8);

    let (train_set, _) = train.split(&records);
    let (validation_set, _) = validation.split(&rest);
    for v in &validation_set {
        assert!(!train_set.contains(v));
    }
}

#[test]
fn test_single_point_calculator_returns_stored_labels() {
    let records = generate(&SyntheticConfig::default().with_n(3)).unwrap();
    let calc = SinglePointCalculator::from_record(&records[1]).unwrap();
    let s = records[1].structure();
    assert_eq!(calc.potential_energy(s).unwrap(), 1.0 / 3.0);
    assert_eq!(calc.forces(s).unwrap(), records[1].forces().unwrap().to_vec());
}
