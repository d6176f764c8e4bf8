use super::TrainerError;

/// Resuelve `A x = b` con `A` simétrica definida positiva (Cholesky).
pub(crate) fn cholesky_solve(a: &[Vec<f64>], b: &[f64]) -> Result<Vec<f64>, TrainerError> {
    let n = b.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            if i == j {
                let pivot = a[i][i] - sum;
                if pivot <= 0.0 || !pivot.is_finite() {
                    return Err(TrainerError::NotPositiveDefinite { row: i, pivot });
                }
                l[i][i] = pivot.sqrt();
            } else {
                l[i][j] = (a[i][j] - sum) / l[j][j];
            }
        }
    }
    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let sum: f64 = (0..i).map(|k| l[i][k] * y[k]).sum();
        y[i] = (b[i] - sum) / l[i][i];
    }
    // Lᵀ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|k| l[k][i] * x[k]).sum();
        x[i] = (y[i] - sum) / l[i][i];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_spd_system() {
        let a = vec![vec![4.0, 2.0, 0.0], vec![2.0, 5.0, 1.0], vec![0.0, 1.0, 3.0]];
        let x = cholesky_solve(&a, &[2.0, 9.0, 7.0]).unwrap();
        // residuo nulo
        for (row, rhs) in a.iter().zip([2.0, 9.0, 7.0]) {
            let lhs: f64 = row.iter().zip(&x).map(|(r, v)| r * v).sum();
            assert!((lhs - rhs).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_indefinite_matrix() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        assert!(matches!(cholesky_solve(&a, &[1.0, 1.0]), Err(TrainerError::NotPositiveDefinite { row: 1, .. })));
    }
}
