// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Bounded Scalar Minimization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Brent's bounded minimizer and sign-change bracketing.
//!
//! The minimizer combines golden-section steps with parabolic interpolation
//! on a closed interval and never evaluates outside it.

use coreopt_types::error::{CoreOptError, CoreOptResult};

const SQRT_EPS: f64 = 1.490_116_119_384_765_6e-8;
const GOLDEN: f64 = 0.381_966_011_250_105_1; // (3 − √5)/2

/// Outcome of a bounded minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedMinimum {
    pub x: f64,
    pub fx: f64,
    pub evaluations: usize,
    /// `false` when the evaluation cap stopped the search.
    pub converged: bool,
}

/// Minimize `f` on `[lower, upper]` to absolute tolerance `xatol`.
pub fn minimize_bounded<F>(
    mut f: F,
    lower: f64,
    upper: f64,
    xatol: f64,
    max_evaluations: usize,
) -> CoreOptResult<BoundedMinimum>
where
    F: FnMut(f64) -> f64,
{
    if !(lower.is_finite() && upper.is_finite()) || lower > upper {
        return Err(CoreOptError::Domain(format!(
            "invalid bounds [{lower}, {upper}]"
        )));
    }
    if !(xatol > 0.0) || max_evaluations == 0 {
        return Err(CoreOptError::Domain(
            "xatol must be > 0 and max_evaluations >= 1".to_string(),
        ));
    }

    let (mut a, mut b) = (lower, upper);
    let mut fulc = a + GOLDEN * (b - a);
    let mut nfc = fulc;
    let mut xf = fulc;
    let mut rat = 0.0_f64;
    let mut e = 0.0_f64;
    let mut fx = f(xf);
    let mut evaluations = 1;
    let mut ffulc = fx;
    let mut fnfc = fx;

    let mut xm = 0.5 * (a + b);
    let mut tol1 = SQRT_EPS * xf.abs() + xatol / 3.0;
    let mut tol2 = 2.0 * tol1;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden_step = true;

        if e.abs() > tol1 {
            // Parabolic fit through the three best points.
            golden_step = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = if xm - xf >= 0.0 { tol1 } else { -tol1 };
                }
            } else {
                golden_step = true;
            }
        }

        if golden_step {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = GOLDEN * e;
        }

        let step = rat.abs().max(tol1);
        let x = if rat >= 0.0 { xf + step } else { xf - step };
        let fu = f(x);
        evaluations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = SQRT_EPS * xf.abs() + xatol / 3.0;
        tol2 = 2.0 * tol1;

        if evaluations >= max_evaluations {
            return Ok(BoundedMinimum {
                x: xf,
                fx,
                evaluations,
                converged: false,
            });
        }
    }

    Ok(BoundedMinimum {
        x: xf,
        fx,
        evaluations,
        converged: true,
    })
}

/// `n` trial points spanning `[lower, upper]` inclusive, linear or logarithmic.
pub fn trial_points(lower: f64, upper: f64, n: usize, log_scale: bool) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lower],
        _ => {
            let last = (n - 1) as f64;
            if log_scale {
                let (l0, l1) = (lower.ln(), upper.ln());
                (0..n)
                    .map(|k| (l0 + (l1 - l0) * k as f64 / last).exp())
                    .collect()
            } else {
                (0..n)
                    .map(|k| lower + (upper - lower) * k as f64 / last)
                    .collect()
            }
        }
    }
}

/// First adjacent pair of `points` across which `g` changes sign.
///
/// Points where `g` errors or is not finite are skipped. An exact zero
/// collapses the bracket onto that point. Returns `None` when no sign
/// change is found.
pub fn bracket_sign_change<G>(mut g: G, points: &[f64]) -> Option<(f64, f64)>
where
    G: FnMut(f64) -> CoreOptResult<f64>,
{
    let mut prev: Option<(f64, f64)> = None;
    for &x in points {
        let value = match g(x) {
            Ok(v) if v.is_finite() => v,
            _ => {
                prev = None;
                continue;
            }
        };
        if value == 0.0 {
            return Some((x, x));
        }
        if let Some((px, pv)) = prev {
            if pv * value < 0.0 {
                return Some((px, x));
            }
        }
        prev = Some((x, value));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_minimum() {
        let res = minimize_bounded(|x| (x - 2.0).powi(2), 0.0, 5.0, 1e-5, 500).unwrap();
        assert!(res.converged);
        assert!((res.x - 2.0).abs() < 1e-4, "x = {}", res.x);
        assert!(res.fx < 1e-8);
    }

    #[test]
    fn test_minimum_on_boundary() {
        // Monotone increasing: minimum at the lower bound.
        let res = minimize_bounded(|x| x, 1.0, 3.0, 1e-5, 500).unwrap();
        assert!(res.converged);
        assert!((res.x - 1.0).abs() < 1e-4, "x = {}", res.x);
    }

    #[test]
    fn test_never_leaves_interval() {
        let mut seen = Vec::new();
        let _ = minimize_bounded(
            |x| {
                seen.push(x);
                (x + 10.0).powi(2)
            },
            -1.0,
            1.0,
            1e-6,
            500,
        )
        .unwrap();
        assert!(seen.iter().all(|&x| (-1.0..=1.0).contains(&x)));
    }

    #[test]
    fn test_evaluation_cap_reports_nonconvergence() {
        let res = minimize_bounded(|x| (x - 0.3).abs(), 0.0, 1.0, 1e-12, 3).unwrap();
        assert!(!res.converged);
        assert_eq!(res.evaluations, 3);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(minimize_bounded(|x| x, 2.0, 1.0, 1e-3, 10).is_err());
        assert!(minimize_bounded(|x| x, 0.0, 1.0, 0.0, 10).is_err());
    }

    #[test]
    fn test_trial_points_log_endpoints() {
        let pts = trial_points(1.0, 1e5, 6, true);
        assert_eq!(pts.len(), 6);
        assert!((pts[0] - 1.0).abs() < 1e-12);
        assert!((pts[1] - 10.0).abs() < 1e-9);
        assert!((pts[5] - 1e5).abs() < 1e-6);
    }

    #[test]
    fn test_bracket_finds_first_crossing() {
        let pts = trial_points(0.0, 10.0, 11, false);
        // Roots at 2.5 and 7.5; the first one wins.
        let br = bracket_sign_change(|x| Ok((x - 2.5) * (x - 7.5)), &pts).unwrap();
        assert_eq!(br, (2.0, 3.0));
    }

    #[test]
    fn test_bracket_skips_errors() {
        let pts = trial_points(0.0, 4.0, 5, false);
        let br = bracket_sign_change(
            |x| {
                if x < 1.5 {
                    Err(CoreOptError::Domain("negative area".into()))
                } else {
                    Ok(x - 2.5)
                }
            },
            &pts,
        )
        .unwrap();
        assert_eq!(br, (2.0, 3.0));
    }

    #[test]
    fn test_bracket_none_without_sign_change() {
        let pts = trial_points(0.0, 1.0, 10, false);
        assert!(bracket_sign_change(|x| Ok(x + 1.0), &pts).is_none());
    }
}
