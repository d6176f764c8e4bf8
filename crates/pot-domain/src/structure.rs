//! Estructuras atómicas periódicas y sus etiquetas.
//!
//! Convenciones: la celda guarda los vectores de red por filas
//! (`r = f · cell`), posiciones cartesianas en Å, energía en eV y fuerzas en
//! eV/Å. Una `StructureRecord` es inmutable una vez construida.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DomainError, Element};

pub type Vec3 = [f64; 3];
pub type Cell = [[f64; 3]; 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStructure")]
pub struct Structure {
    elements: Vec<Element>,
    positions: Vec<Vec3>,
    cell: Cell,
    pbc: [bool; 3],
}

/// Forma serializada de `Structure`; se valida con `Structure::new`.
#[derive(Deserialize)]
struct RawStructure {
    elements: Vec<Element>,
    positions: Vec<Vec3>,
    cell: Cell,
    pbc: [bool; 3],
}

impl TryFrom<RawStructure> for Structure {
    type Error = DomainError;

    fn try_from(raw: RawStructure) -> Result<Self, Self::Error> {
        Self::new(raw.elements, raw.positions, raw.cell, raw.pbc)
    }
}

impl Structure {
    pub fn new(elements: Vec<Element>, positions: Vec<Vec3>, cell: Cell, pbc: [bool; 3]) -> Result<Self, DomainError> {
        if elements.len() != positions.len() {
            return Err(DomainError::LengthMismatch { symbols: elements.len(),
                                                     positions: positions.len() });
        }
        if positions.iter().flatten().chain(cell.iter().flatten()).any(|v| !v.is_finite()) {
            return Err(DomainError::NonFinite("positions"));
        }
        Ok(Self { elements,
                  positions,
                  cell,
                  pbc })
    }

    /// Atajo con símbolos químicos.
    pub fn from_symbols(symbols: &[&str], positions: Vec<Vec3>, cell: Cell, pbc: [bool; 3]) -> Result<Self, DomainError> {
        let elements = symbols.iter()
                              .map(|s| Element::from_symbol(s))
                              .collect::<Result<Vec<_>, _>>()?;
        Self::new(elements, positions, cell, pbc)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn symbols(&self) -> Vec<&'static str> {
        self.elements.iter().map(|e| e.symbol()).collect()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    /// Copia con otras posiciones (misma composición y celda).
    pub fn with_positions(&self, positions: Vec<Vec3>) -> Result<Self, DomainError> {
        Self::new(self.elements.clone(), positions, self.cell, self.pbc)
    }

    /// Elementos distintos en orden de primera aparición.
    pub fn distinct_elements(&self) -> Vec<Element> {
        let mut out: Vec<Element> = Vec::new();
        for e in &self.elements {
            if !out.contains(e) {
                out.push(*e);
            }
        }
        out
    }

    pub fn distinct_symbols(&self) -> Vec<&'static str> {
        self.distinct_elements().into_iter().map(|e| e.symbol()).collect()
    }

    /// Fórmula en orden de Hill (C, H, resto alfabético).
    pub fn chemical_formula(&self) -> String {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for e in &self.elements {
            *counts.entry(e.symbol()).or_default() += 1;
        }
        let mut out = String::new();
        let mut push = |sym: &str, n: usize| {
            out.push_str(sym);
            if n > 1 {
                out.push_str(&n.to_string());
            }
        };
        let has_carbon = counts.contains_key("C");
        if has_carbon {
            for first in ["C", "H"] {
                if let Some(n) = counts.remove(first) {
                    push(first, n);
                }
            }
        }
        for (sym, n) in counts {
            push(sym, n);
        }
        out
    }

    pub fn volume(&self) -> f64 {
        determinant(&self.cell).abs()
    }

    /// Inversa de la celda (filas = vectores de red).
    pub fn inverse_cell(&self) -> Result<Cell, DomainError> {
        let c = &self.cell;
        let det = determinant(c);
        if det.abs() < 1e-12 {
            return Err(DomainError::SingularCell(det));
        }
        let inv = [[(c[1][1] * c[2][2] - c[1][2] * c[2][1]) / det,
                     (c[0][2] * c[2][1] - c[0][1] * c[2][2]) / det,
                     (c[0][1] * c[1][2] - c[0][2] * c[1][1]) / det],
                   [(c[1][2] * c[2][0] - c[1][0] * c[2][2]) / det,
                    (c[0][0] * c[2][2] - c[0][2] * c[2][0]) / det,
                    (c[0][2] * c[1][0] - c[0][0] * c[1][2]) / det],
                   [(c[1][0] * c[2][1] - c[1][1] * c[2][0]) / det,
                    (c[0][1] * c[2][0] - c[0][0] * c[2][1]) / det,
                    (c[0][0] * c[1][1] - c[0][1] * c[1][0]) / det]];
        Ok(inv)
    }

    /// Coordenadas fraccionarias de todas las posiciones.
    pub fn fractional_positions(&self) -> Result<Vec<Vec3>, DomainError> {
        let inv = self.inverse_cell()?;
        Ok(self.positions
               .iter()
               .map(|r| {
                   let mut f = [0.0; 3];
                   for (a, fa) in f.iter_mut().enumerate() {
                       *fa = (0..3).map(|b| r[b] * inv[b][a]).sum();
                   }
                   f
               })
               .collect())
    }
}

fn determinant(c: &Cell) -> f64 {
    c[0][0] * (c[1][1] * c[2][2] - c[1][2] * c[2][1]) - c[0][1] * (c[1][0] * c[2][2] - c[1][2] * c[2][0])
    + c[0][2] * (c[1][0] * c[2][1] - c[1][1] * c[2][0])
}

/// Etiquetas de referencia (o predichas) de una estructura.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    pub energy: Option<f64>,
    pub forces: Option<Vec<Vec3>>,
    pub energy_uncertainty: Option<f64>,
    pub forces_uncertainty: Option<Vec<Vec3>>,
}

impl Labels {
    pub fn new(energy: f64, forces: Vec<Vec3>) -> Self {
        Self { energy: Some(energy),
               forces: Some(forces),
               ..Self::default() }
    }

    pub fn with_energy_uncertainty(mut self, value: f64) -> Self {
        self.energy_uncertainty = Some(value);
        self
    }

    pub fn with_forces_uncertainty(mut self, value: Vec<Vec3>) -> Self {
        self.forces_uncertainty = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Estructura + etiquetas. Inmutable tras `new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStructureRecord")]
pub struct StructureRecord {
    structure: Structure,
    labels: Labels,
}

#[derive(Deserialize)]
struct RawStructureRecord {
    structure: Structure,
    #[serde(default)]
    labels: Labels,
}

impl TryFrom<RawStructureRecord> for StructureRecord {
    type Error = DomainError;

    fn try_from(raw: RawStructureRecord) -> Result<Self, Self::Error> {
        Self::new(raw.structure, raw.labels)
    }
}

impl StructureRecord {
    /// Valida que las etiquetas por átomo tengan una fila por átomo.
    pub fn new(structure: Structure, labels: Labels) -> Result<Self, DomainError> {
        let n = structure.len();
        for (label, rows) in [("forces", &labels.forces), ("forces_uncertainty", &labels.forces_uncertainty)] {
            if let Some(rows) = rows {
                if rows.len() != n {
                    return Err(DomainError::LabelShape { label,
                                                         expected: n,
                                                         found: rows.len() });
                }
            }
        }
        Ok(Self { structure, labels })
    }

    pub fn unlabeled(structure: Structure) -> Self {
        Self { structure,
               labels: Labels::default() }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn energy(&self) -> Option<f64> {
        self.labels.energy
    }

    pub fn forces(&self) -> Option<&[Vec3]> {
        self.labels.forces.as_deref()
    }

    pub fn len(&self) -> usize {
        self.structure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: Cell = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    #[test]
    fn hill_formula_puts_carbon_first() {
        let s = Structure::from_symbols(&["O", "H", "C", "H"], vec![[0.0; 3]; 4], UNIT, [true; 3]).unwrap();
        assert_eq!(s.chemical_formula(), "CH2O");
        let w = Structure::from_symbols(&["O", "H", "H"], vec![[0.0; 3]; 3], UNIT, [true; 3]).unwrap();
        assert_eq!(w.chemical_formula(), "H2O");
    }

    #[test]
    fn fractional_positions_use_inverse_cell() {
        let cell = [[2.0, 0.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 4.0]];
        let s = Structure::from_symbols(&["C"], vec![[2.0, 2.0, 1.0]], cell, [true; 3]).unwrap();
        let f = s.fractional_positions().unwrap()[0];
        // r = f · cell  =>  (0.5, 1.0, 0.25)
        assert!((f[0] - 0.5).abs() < 1e-12);
        assert!((f[1] - 1.0).abs() < 1e-12);
        assert!((f[2] - 0.25).abs() < 1e-12);
        assert!((s.volume() - 16.0).abs() < 1e-12);
    }

    #[test]
    fn label_rows_must_match_atoms() {
        let s = Structure::from_symbols(&["C", "O"], vec![[0.0; 3]; 2], UNIT, [true; 3]).unwrap();
        let err = StructureRecord::new(s, Labels::new(0.0, vec![[0.0; 3]])).unwrap_err();
        assert_eq!(err, DomainError::LabelShape { label: "forces", expected: 2, found: 1 });
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let s = Structure::from_symbols(&["C", "O"], vec![[0.0; 3], [0.0, 0.0, 1.1]], UNIT, [true; 3]).unwrap();
        let record = StructureRecord::new(s, Labels::new(0.5, vec![[0.1; 3]; 2])).unwrap();
        let mut value = serde_json::to_value(&record).unwrap();
        let back: StructureRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back, record);

        value["labels"]["forces"] = serde_json::json!([[0.1, 0.1, 0.1]]);
        let err = serde_json::from_value::<StructureRecord>(value.clone()).unwrap_err();
        assert!(err.to_string().contains("forces"), "{err}");

        value["labels"]["forces"] = serde_json::Value::Null;
        value["structure"]["positions"] = serde_json::json!([[0.0, 0.0, 0.0]]);
        assert!(serde_json::from_value::<StructureRecord>(value).is_err());
    }

    #[test]
    fn singular_cell_is_rejected() {
        let s = Structure::from_symbols(&["C"], vec![[0.0; 3]], [[0.0; 3]; 3], [false; 3]).unwrap();
        assert!(matches!(s.inverse_cell(), Err(DomainError::SingularCell(_))));
    }
}
