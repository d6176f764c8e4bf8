//! Base lineal de descriptores para el potencial.
//!
//! Bloques, en este orden dentro del vector de pesos:
//! 1. energía de referencia por especie (`n_species`);
//! 2. gaussianas radiales con corte coseno por par de especies no ordenado
//!    (`n_pairs * num_basis`), sumadas sobre imágenes periódicas;
//! 3. armónicos de sitio `sin/cos(2π m f_α)` por especie, orden `m` y eje
//!    (`n_species * site_harmonics * 3 * 2`), sobre coordenadas fraccionarias.
//!
//! La energía es `E = w · φ` y las fuerzas `F_i = -Σ_p w_p ∂φ_p/∂r_i`.

use std::f64::consts::PI;

use pot_domain::{Element, Structure, Vec3};
use serde::{Deserialize, Serialize};

use super::TrainerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basis {
    pub species: Vec<Element>,
    pub r_max: f64,
    pub num_basis: usize,
    pub site_harmonics: usize,
}

/// Descriptores de una estructura y su gradiente respecto de cada posición.
#[derive(Debug, Clone)]
pub struct Features {
    pub values: Vec<f64>,
    /// `gradients[p][i]` = ∂φ_p/∂r_i.
    pub gradients: Vec<Vec<Vec3>>,
}

impl Basis {
    pub fn new(species: Vec<Element>, r_max: f64, num_basis: usize, site_harmonics: usize) -> Result<Self, TrainerError> {
        if species.is_empty() {
            return Err(TrainerError::InvalidConfig("no chemical species".into()));
        }
        if !(r_max.is_finite() && r_max > 0.0) {
            return Err(TrainerError::InvalidConfig(format!("r_max must be positive, got {r_max}")));
        }
        if num_basis == 0 {
            return Err(TrainerError::InvalidConfig("num_basis must be at least 1".into()));
        }
        Ok(Self { species,
                  r_max,
                  num_basis,
                  site_harmonics })
    }

    fn n_pairs(&self) -> usize {
        let s = self.species.len();
        s * (s + 1) / 2
    }

    pub fn len(&self) -> usize {
        let s = self.species.len();
        s + self.n_pairs() * self.num_basis + s * self.site_harmonics * 6
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn species_index(&self, e: Element) -> Result<usize, TrainerError> {
        self.species
            .iter()
            .position(|s| *s == e)
            .ok_or_else(|| TrainerError::UnknownSpecies(e.symbol().to_string()))
    }

    fn pair_index(&self, a: usize, b: usize) -> usize {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        let s = self.species.len();
        // filas del triángulo superior antes de `a`
        a * s - a * (a.saturating_sub(1)) / 2 + (b - a)
    }

    /// Gaussiana `k` por corte coseno y su derivada respecto de `d`.
    fn radial(&self, k: usize, d: f64) -> (f64, f64) {
        if d >= self.r_max {
            return (0.0, 0.0);
        }
        let width = self.r_max / self.num_basis as f64;
        let center = if self.num_basis == 1 {
            0.0
        } else {
            self.r_max * k as f64 / (self.num_basis - 1) as f64
        };
        let x = (d - center) / width;
        let g = (-0.5 * x * x).exp();
        let dg = -x / width * g;
        let fc = 0.5 * ((PI * d / self.r_max).cos() + 1.0);
        let dfc = -0.5 * PI / self.r_max * (PI * d / self.r_max).sin();
        (g * fc, dg * fc + g * dfc)
    }

    /// Rango de imágenes por eje para cubrir `r_max`.
    fn image_range(&self, structure: &Structure) -> [i64; 3] {
        let c = structure.cell();
        let volume = structure.volume();
        let mut out = [0; 3];
        for (a, slot) in out.iter_mut().enumerate() {
            if !structure.pbc()[a] || volume <= 0.0 {
                continue;
            }
            let (u, v) = (c[(a + 1) % 3], c[(a + 2) % 3]);
            let cross = [u[1] * v[2] - u[2] * v[1], u[2] * v[0] - u[0] * v[2], u[0] * v[1] - u[1] * v[0]];
            let area = (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
            let height = volume / area;
            // +1: las posiciones no tienen por qué estar dentro de la celda
            *slot = (self.r_max / height).ceil() as i64 + 1;
        }
        out
    }

    pub fn evaluate(&self, structure: &Structure) -> Result<Features, TrainerError> {
        let n = structure.len();
        let kinds = structure.elements()
                             .iter()
                             .map(|e| self.species_index(*e))
                             .collect::<Result<Vec<_>, _>>()?;
        let mut values = vec![0.0; self.len()];
        let mut gradients = vec![vec![[0.0; 3]; n]; self.len()];

        for k in &kinds {
            values[*k] += 1.0;
        }

        // pares sobre imágenes periódicas
        let pair_offset = self.species.len();
        let cell = structure.cell();
        let range = self.image_range(structure);
        let pos = structure.positions();
        for t0 in -range[0]..=range[0] {
            for t1 in -range[1]..=range[1] {
                for t2 in -range[2]..=range[2] {
                    let shift: Vec3 = std::array::from_fn(|b| {
                        t0 as f64 * cell[0][b] + t1 as f64 * cell[1][b] + t2 as f64 * cell[2][b]
                    });
                    let home = t0 == 0 && t1 == 0 && t2 == 0;
                    for i in 0..n {
                        for j in 0..n {
                            if home && i == j {
                                continue;
                            }
                            let delta: Vec3 = std::array::from_fn(|b| pos[i][b] - pos[j][b] - shift[b]);
                            let d = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]).sqrt();
                            if d >= self.r_max || d < 1e-12 {
                                continue;
                            }
                            let base = pair_offset + self.pair_index(kinds[i], kinds[j]) * self.num_basis;
                            for kb in 0..self.num_basis {
                                let (h, dh) = self.radial(kb, d);
                                values[base + kb] += 0.5 * h;
                                // la imagen de sí mismo no aporta fuerza
                                if i != j {
                                    for b in 0..3 {
                                        gradients[base + kb][i][b] += dh * delta[b] / d;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        // armónicos de sitio: sólo con celda invertible
        if self.site_harmonics > 0 {
            if let Ok(inv) = structure.inverse_cell() {
                let frac = structure.fractional_positions()?;
                let site_offset = pair_offset + self.n_pairs() * self.num_basis;
                for (i, f) in frac.iter().enumerate() {
                    for m in 1..=self.site_harmonics {
                        for axis in 0..3 {
                            let w = 2.0 * PI * m as f64;
                            let phase = w * f[axis];
                            let p = site_offset + ((kinds[i] * self.site_harmonics + (m - 1)) * 3 + axis) * 2;
                            values[p] += phase.sin();
                            values[p + 1] += phase.cos();
                            for b in 0..3 {
                                gradients[p][i][b] += w * phase.cos() * inv[b][axis];
                                gradients[p + 1][i][b] -= w * phase.sin() * inv[b][axis];
                            }
                        }
                    }
                }
            }
        }

        Ok(Features { values, gradients })
    }
}
