//! Baseline correction by least-squares polynomial removal.
//!
//! The fit solves the normal equations `AᵗA·c = Aᵗy` (A the Vandermonde
//! matrix of the time axis) with Gaussian elimination and partial pivoting,
//! then subtracts the fitted polynomial from the amplitudes. Long records
//! with high orders make the moment matrix ill-conditioned; that matches
//! the documented behavior, and an unusable pivot surfaces as
//! `SingularSystem` instead of garbage coefficients.

use crate::data::waveform::Waveform;
use crate::error::{EngineError, Result};

/// Fit and remove a polynomial baseline of the given order.
pub fn correct_baseline(waveform: &Waveform, order: usize) -> Result<Waveform> {
    let coefficients = fit_polynomial(&waveform.time, &waveform.amplitude, order)?;

    let corrected: Vec<f64> = waveform
        .time
        .iter()
        .zip(waveform.amplitude.iter())
        .map(|(&t, &a)| a - evaluate_polynomial(&coefficients, t))
        .collect();

    Ok(waveform.derived(
        corrected,
        waveform.metadata.units.clone(),
        &format!("Baseline correction (order {})", order),
    ))
}

/// Least-squares polynomial fit via the normal equations.
///
/// Returns coefficients in ascending power order (`c[0] + c[1]·t + …`).
pub fn fit_polynomial(time: &[f64], values: &[f64], order: usize) -> Result<Vec<f64>> {
    let terms = order + 1;
    if time.len() < terms {
        return Err(EngineError::SingularSystem(format!(
            "{} samples cannot determine an order-{} polynomial",
            time.len(),
            order
        )));
    }

    // Normal equations: M[j][k] = Σ t^(j+k), rhs[j] = Σ y·t^j
    let mut matrix = vec![vec![0.0f64; terms]; terms];
    let mut rhs = vec![0.0f64; terms];
    for (&t, &y) in time.iter().zip(values.iter()) {
        let mut power_j = 1.0;
        for j in 0..terms {
            rhs[j] += y * power_j;
            let mut power_jk = power_j;
            for k in 0..terms {
                matrix[j][k] += power_jk;
                power_jk *= t;
            }
            power_j *= t;
        }
    }

    solve_linear_system(matrix, rhs)
}

/// Gaussian elimination with partial pivoting.
///
/// Consumes the augmented system; fails with `SingularSystem` when the best
/// available pivot is negligible relative to the matrix scale.
pub fn solve_linear_system(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>> {
    let n = rhs.len();
    let scale = matrix
        .iter()
        .flat_map(|row| row.iter())
        .map(|v| v.abs())
        .fold(0.0f64, f64::max);
    let tolerance = if scale > 0.0 { scale * 1e-12 } else { 1e-12 };

    for col in 0..n {
        // Partial pivoting: move the largest remaining entry into place
        let mut pivot_row = col;
        for row in col + 1..n {
            if matrix[row][col].abs() > matrix[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if matrix[pivot_row][col].abs() < tolerance {
            return Err(EngineError::SingularSystem(format!(
                "pivot {:.3e} below tolerance at column {}",
                matrix[pivot_row][col], col
            )));
        }
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    // Back substitution
    let mut solution = vec![0.0f64; n];
    for row in (0..n).rev() {
        let mut sum = rhs[row];
        for k in row + 1..n {
            sum -= matrix[row][k] * solution[k];
        }
        solution[row] = sum / matrix[row][row];
    }
    Ok(solution)
}

/// Horner evaluation; coefficients in ascending power order.
fn evaluate_polynomial(coefficients: &[f64], t: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * t + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_solve_known_system() {
        // x + y = 3, 2x - y = 0  →  x = 1, y = 2
        let matrix = vec![vec![1.0, 1.0], vec![2.0, -1.0]];
        let solution = solve_linear_system(matrix, vec![3.0, 0.0]).unwrap();
        assert!((solution[0] - 1.0).abs() < 1e-12);
        assert!((solution[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_needs_pivoting() {
        // Leading zero forces a row swap
        let matrix = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let solution = solve_linear_system(matrix, vec![2.0, 5.0]).unwrap();
        assert!((solution[0] - 5.0).abs() < 1e-12);
        assert!((solution[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_system_detected() {
        let matrix = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let err = solve_linear_system(matrix, vec![1.0, 2.0]);
        assert!(matches!(err, Err(EngineError::SingularSystem(_))));
    }

    #[test]
    fn test_fit_recovers_exact_polynomial() {
        let time: Vec<f64> = (0..50).map(|i| i as f64 * 0.02).collect();
        let values: Vec<f64> = time.iter().map(|&t| 2.0 + 3.0 * t - 1.5 * t * t).collect();
        let c = fit_polynomial(&time, &values, 2).unwrap();
        assert!((c[0] - 2.0).abs() < 1e-6);
        assert!((c[1] - 3.0).abs() < 1e-6);
        assert!((c[2] + 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_correction_removes_drift() {
        let time: Vec<f64> = (0..500).map(|i| i as f64 * 0.01).collect();
        let amplitude: Vec<f64> = time
            .iter()
            .map(|&t| (2.0 * PI * 2.0 * t).sin() + 0.4 * t + 0.1)
            .collect();
        let w = Waveform::from_series(time, amplitude).unwrap();
        let corrected = correct_baseline(&w, 3).unwrap();

        // The linear drift is gone: the mean drops to near zero
        let mean: f64 = corrected.amplitude.iter().sum::<f64>() / corrected.len() as f64;
        assert!(mean.abs() < 0.02);
        // And the oscillation survives
        assert!(corrected.peak_abs() > 0.8);
    }

    #[test]
    fn test_short_record_vs_high_order() {
        let w = Waveform::from_series(vec![0.0, 0.01, 0.02], vec![1.0, 2.0, 3.0]).unwrap();
        let err = correct_baseline(&w, 5);
        assert!(matches!(err, Err(EngineError::SingularSystem(_))));
    }
}
