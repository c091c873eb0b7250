// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Least-Squares Fitting
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use coreopt_types::error::{CoreOptError, CoreOptResult};
use ndarray::{Array1, Array2};

/// Least-squares polynomial of degree `degree`.
///
/// Coefficients are returned highest power first, so `p[0]·x^deg + … + p[deg]`.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> CoreOptResult<Vec<f64>> {
    if x.len() != y.len() {
        return Err(CoreOptError::Domain(format!(
            "polyfit length mismatch: {} x vs {} y",
            x.len(),
            y.len()
        )));
    }
    let n_coef = degree + 1;
    if x.len() < n_coef {
        return Err(CoreOptError::Domain(format!(
            "polyfit of degree {degree} needs at least {n_coef} points, got {}",
            x.len()
        )));
    }

    // Normal equations in ascending powers: (VᵀV) c = Vᵀy.
    let mut ata = Array2::<f64>::zeros((n_coef, n_coef));
    let mut aty = Array1::<f64>::zeros(n_coef);
    for (&xi, &yi) in x.iter().zip(y) {
        let powers: Vec<f64> = (0..n_coef).map(|k| xi.powi(k as i32)).collect();
        for r in 0..n_coef {
            aty[r] += powers[r] * yi;
            for c in 0..n_coef {
                ata[[r, c]] += powers[r] * powers[c];
            }
        }
    }

    let mut ascending = solve_dense(ata, aty)?;
    ascending.reverse();
    Ok(ascending)
}

/// Evaluate a highest-power-first polynomial with Horner's rule.
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Fit `y = a · x^b` by least squares in log-log space. Returns `(a, b)`.
pub fn fit_power_law(x: &[f64], y: &[f64]) -> CoreOptResult<(f64, f64)> {
    if x.iter().chain(y).any(|&v| !(v.is_finite() && v > 0.0)) {
        return Err(CoreOptError::Domain(
            "power-law fit needs finite positive data".to_string(),
        ));
    }
    let lx: Vec<f64> = x.iter().map(|v| v.ln()).collect();
    let ly: Vec<f64> = y.iter().map(|v| v.ln()).collect();
    let line = polyfit(&lx, &ly, 1)?;
    Ok((line[1].exp(), line[0]))
}

/// Gaussian elimination with partial pivoting.
fn solve_dense(mut a: Array2<f64>, mut b: Array1<f64>) -> CoreOptResult<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot, col]].abs() < 1e-300 {
            return Err(CoreOptError::Domain(
                "singular least-squares system (degenerate abscissae)".to_string(),
            ));
        }
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }
        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyfit_recovers_quadratic() {
        let x: Vec<f64> = (0..12).map(|i| i as f64 * 0.05).collect();
        let y: Vec<f64> = x.iter().map(|&v| 3.0 * v * v - 2.0 * v + 0.5).collect();
        let p = polyfit(&x, &y, 2).unwrap();
        assert!((p[0] - 3.0).abs() < 1e-8, "p = {p:?}");
        assert!((p[1] + 2.0).abs() < 1e-8, "p = {p:?}");
        assert!((p[2] - 0.5).abs() < 1e-8, "p = {p:?}");
        assert!((polyval(&p, 0.2) - (0.12 - 0.4 + 0.5)).abs() < 1e-8);
    }

    #[test]
    fn test_power_law_exact() {
        let x = [0.3, 0.5, 0.7, 0.9];
        let y: Vec<f64> = x.iter().map(|&f: &f64| 0.16271 * f.powf(-0.8515)).collect();
        let (a, b) = fit_power_law(&x, &y).unwrap();
        assert!((a - 0.16271).abs() < 1e-10, "a = {a}");
        assert!((b + 0.8515).abs() < 1e-10, "b = {b}");
    }

    #[test]
    fn test_degenerate_abscissae_rejected() {
        let x = [1.0, 1.0, 1.0];
        let y = [1.0, 2.0, 3.0];
        assert!(polyfit(&x, &y, 1).is_err());
    }

    #[test]
    fn test_too_few_points_rejected() {
        assert!(polyfit(&[1.0, 2.0], &[1.0, 2.0], 2).is_err());
        assert!(fit_power_law(&[1.0, -2.0], &[1.0, 2.0]).is_err());
    }
}
