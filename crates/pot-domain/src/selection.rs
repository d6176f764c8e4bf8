//! Selección de configuraciones uniforme en energía.

use serde::{Deserialize, Serialize};

use crate::{DomainError, StructureRecord};

/// Índices (en el orden original) de la partición elegida/descartada.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub selected: Vec<usize>,
    pub excluded: Vec<usize>,
}

impl Selection {
    /// Aplica la partición a `records`, devolviendo (elegidos, descartados).
    pub fn split(&self, records: &[StructureRecord]) -> (Vec<StructureRecord>, Vec<StructureRecord>) {
        let pick = |idx: &[usize]| idx.iter().filter_map(|i| records.get(*i).cloned()).collect();
        (pick(&self.selected), pick(&self.excluded))
    }
}

/// Elige `n` registros cuyas energías cubren uniformemente `[min, max]`.
///
/// Se construye una rejilla de `n` energías equiespaciadas entre el mínimo y
/// el máximo; para cada punto se toma el registro aún no elegido más cercano
/// (empate: índice menor). Todos los registros deben tener energía.
pub fn uniform_energetic(records: &[StructureRecord], n: usize) -> Result<Selection, DomainError> {
    if n > records.len() {
        return Err(DomainError::NotEnoughStructures { requested: n,
                                                      available: records.len() });
    }
    let energies = records.iter()
                          .enumerate()
                          .map(|(index, r)| {
                              r.energy()
                               .ok_or(DomainError::MissingLabel { index,
                                                                  label: "energy" })
                          })
                          .collect::<Result<Vec<f64>, _>>()?;
    if n == 0 {
        return Ok(Selection { selected: Vec::new(),
                              excluded: (0..records.len()).collect() });
    }

    let lo = energies.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = energies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut taken = vec![false; records.len()];
    for k in 0..n {
        let target = if n == 1 { lo } else { lo + (hi - lo) * k as f64 / (n - 1) as f64 };
        let mut best: Option<(usize, f64)> = None;
        for (i, e) in energies.iter().enumerate() {
            if taken[i] {
                continue;
            }
            let d = (e - target).abs();
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        if let Some((i, _)) = best {
            taken[i] = true;
        }
    }

    let (selected, excluded): (Vec<usize>, Vec<usize>) = (0..records.len()).partition(|i| taken[*i]);
    log::debug!("uniform energetic selection: {} of {} structures", selected.len(), records.len());
    Ok(Selection { selected, excluded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Labels, Structure};

    fn records(energies: &[f64]) -> Vec<StructureRecord> {
        energies.iter()
                .map(|e| {
                    let s = Structure::from_symbols(&["H"], vec![[0.0; 3]], [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], [true; 3]).unwrap();
                    StructureRecord::new(s, Labels::new(*e, vec![[0.0; 3]])).unwrap()
                })
                .collect()
    }

    #[test]
    fn picks_extremes_and_midpoint() {
        let sel = uniform_energetic(&records(&[0.0, 0.1, 0.25, 0.75, 0.9, 1.0]), 3).unwrap();
        // rejilla 0.0, 0.5, 1.0 ; 0.25 y 0.75 empatan -> índice menor
        assert_eq!(sel.selected, vec![0, 2, 5]);
        assert_eq!(sel.excluded, vec![1, 3, 4]);
    }

    #[test]
    fn duplicated_energies_are_not_picked_twice() {
        let sel = uniform_energetic(&records(&[0.5, 0.5, 0.5]), 2).unwrap();
        assert_eq!(sel.selected, vec![0, 1]);
        assert_eq!(sel.excluded, vec![2]);
    }

    #[test]
    fn too_many_requested() {
        let err = uniform_energetic(&records(&[0.0, 1.0]), 3).unwrap_err();
        assert_eq!(err, DomainError::NotEnoughStructures { requested: 3, available: 2 });
    }

    #[test]
    fn zero_requested_excludes_everything() {
        let sel = uniform_energetic(&records(&[0.0, 1.0]), 0).unwrap();
        assert!(sel.selected.is_empty());
        assert_eq!(sel.excluded, vec![0, 1]);
    }

    #[test]
    fn missing_energy_is_reported_with_index() {
        let mut recs = records(&[0.0]);
        let s = recs[0].structure().clone();
        recs.push(StructureRecord::unlabeled(s));
        let err = uniform_energetic(&recs, 1).unwrap_err();
        assert_eq!(err, DomainError::MissingLabel { index: 1, label: "energy" });
    }
}
