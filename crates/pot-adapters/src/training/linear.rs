//! Entrenador lineal por mínimos cuadrados regularizados (ridge).

use pot_domain::{Element, StructureRecord};

use super::basis::Basis;
use super::deployed::{evaluate, DeployedModel, MODEL_FORMAT, MODEL_FORMAT_VERSION};
use super::solve::cholesky_solve;
use super::{PotentialTrainer, TrainerConfig, TrainerError};
use crate::artifacts::TrainingMetrics;

/// Ajusta la base de `basis.rs` a energías y fuerzas de referencia.
///
/// Cada estructura aporta una fila de energía (peso `total_energy`) y `3n`
/// filas de fuerza (peso `forces`); se resuelven las ecuaciones normales con
/// un término `l2_regularization` escalado por la diagonal media.
#[derive(Debug, Clone, Default)]
pub struct LinearPotentialTrainer;

impl PotentialTrainer for LinearPotentialTrainer {
    fn train(&self,
             config: &TrainerConfig,
             device: &str,
             train: &[StructureRecord],
             validation: &[StructureRecord])
             -> Result<DeployedModel, TrainerError> {
        if device != "cpu" {
            return Err(TrainerError::UnsupportedDevice(device.to_string()));
        }
        if train.is_empty() {
            return Err(TrainerError::EmptyTrainingSet);
        }
        let species = model_species(config, train)?;
        let basis = Basis::new(species.clone(), config.r_max, config.num_basis, config.site_harmonics)?;
        let p = basis.len();

        let energy_coeff = &config.loss_coeffs.total_energy;
        let w_energy = energy_coeff.weight().max(0.0).sqrt();
        let w_forces = config.loss_coeffs.forces.weight().max(0.0).sqrt();

        let mut gram = vec![vec![0.0; p]; p];
        let mut rhs = vec![0.0; p];
        let mut accumulate = |row: &[f64], target: f64| {
            for a in 0..p {
                if row[a] == 0.0 {
                    continue;
                }
                rhs[a] += row[a] * target;
                for b in 0..p {
                    gram[a][b] += row[a] * row[b];
                }
            }
        };

        for (index, record) in train.iter().enumerate() {
            let (energy, forces) = labels_of(index, record)?;
            let features = basis.evaluate(record.structure())?;
            let scale = if energy_coeff.per_atom() {
                w_energy / record.len().max(1) as f64
            } else {
                w_energy
            };
            let row: Vec<f64> = features.values.iter().map(|v| v * scale).collect();
            accumulate(&row, energy * scale);

            for (i, f) in forces.iter().enumerate() {
                for axis in 0..3 {
                    let row: Vec<f64> = features.gradients.iter().map(|g| -g[i][axis] * w_forces).collect();
                    accumulate(&row, f[axis] * w_forces);
                }
            }
        }

        let mean_diag = (0..p).map(|a| gram[a][a]).sum::<f64>() / p as f64;
        let lambda = config.l2_regularization * mean_diag.max(1.0);
        for (a, row) in gram.iter_mut().enumerate() {
            row[a] += lambda;
        }
        let weights = cholesky_solve(&gram, &rhs)?;

        let (train_energy_rmse, train_forces_rmse) = rmse(&basis, &weights, train)?;
        let (validation_energy_rmse, validation_forces_rmse) = if validation.is_empty() {
            (None, None)
        } else {
            let (e, f) = rmse(&basis, &weights, validation)?;
            (Some(e), Some(f))
        };
        let metrics = TrainingMetrics { train_energy_rmse,
                                        train_forces_rmse,
                                        validation_energy_rmse,
                                        validation_forces_rmse,
                                        n_train: train.len(),
                                        n_validation: validation.len() };
        log::info!("trained linear potential (seed {}): {} weights, train rmse E={:.4e} F={:.4e}",
                   config.seed,
                   p,
                   train_energy_rmse,
                   train_forces_rmse);

        Ok(DeployedModel { format: MODEL_FORMAT.to_string(),
                           format_version: MODEL_FORMAT_VERSION,
                           pair_style: config.pair_style().to_string(),
                           species: species.iter().map(|e| e.symbol().to_string()).collect(),
                           r_max: config.r_max,
                           num_basis: config.num_basis,
                           site_harmonics: config.site_harmonics,
                           weights,
                           metrics })
    }
}

/// Especies del modelo: las de la configuración o, si no hay, las de los
/// datos en orden de primera aparición.
pub fn model_species(config: &TrainerConfig, train: &[StructureRecord]) -> Result<Vec<Element>, TrainerError> {
    if let Some(symbols) = &config.chemical_symbols {
        return Ok(symbols.iter()
                         .map(|s| Element::from_symbol(s))
                         .collect::<Result<Vec<_>, _>>()?);
    }
    let mut out: Vec<Element> = Vec::new();
    for record in train {
        for e in record.structure().distinct_elements() {
            if !out.contains(&e) {
                out.push(e);
            }
        }
    }
    Ok(out)
}

fn labels_of(index: usize, record: &StructureRecord) -> Result<(f64, &[pot_domain::Vec3]), TrainerError> {
    let energy = record.energy()
                       .ok_or(TrainerError::MissingLabel { index, label: "energy" })?;
    let forces = record.forces()
                       .ok_or(TrainerError::MissingLabel { index, label: "forces" })?;
    Ok((energy, forces))
}

fn rmse(basis: &Basis, weights: &[f64], records: &[StructureRecord]) -> Result<(f64, f64), TrainerError> {
    let (mut se, mut sf, mut nf) = (0.0, 0.0, 0usize);
    for (index, record) in records.iter().enumerate() {
        let (energy, forces) = labels_of(index, record)?;
        let pred = evaluate(basis, weights, record.structure())?;
        se += (pred.energy - energy).powi(2);
        for (p, f) in pred.forces.iter().zip(forces) {
            for axis in 0..3 {
                sf += (p[axis] - f[axis]).powi(2);
                nf += 1;
            }
        }
    }
    let e = (se / records.len().max(1) as f64).sqrt();
    let f = (sf / nf.max(1) as f64).sqrt();
    Ok((e, f))
}
