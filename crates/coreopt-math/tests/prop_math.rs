// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Property-Based Tests (proptest) for coreopt-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for coreopt-math using proptest.
//!
//! Covers: bounded minimizer, sign-change bracketing, trilinear
//! interpolation, least-squares fitting, Latin hypercube sampling.

use coreopt_math::fit::{fit_power_law, polyfit};
use coreopt_math::interp::GridInterpolator;
use coreopt_math::optimize::{bracket_sign_change, minimize_bounded, trial_points};
use coreopt_math::sampling::{grid_product, latin_hypercube};
use ndarray::{Array1, Array3};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Bounded Minimizer Properties ─────────────────────────────────────

proptest! {
    /// Interior minimum of a parabola is found within tolerance.
    #[test]
    fn minimizer_finds_parabola_vertex(
        lo in -10.0f64..0.0,
        width in 1.0f64..20.0,
        frac in 0.05f64..0.95,
    ) {
        let hi = lo + width;
        let x0 = lo + frac * width;
        let res = minimize_bounded(|x| (x - x0).powi(2) + 1.0, lo, hi, 1e-6, 500).unwrap();
        prop_assert!(res.converged);
        prop_assert!((res.x - x0).abs() < 1e-4, "x = {}, x0 = {}", res.x, x0);
    }

    /// Every evaluation lies inside the bounds.
    #[test]
    fn minimizer_respects_bounds(
        lo in 0.5f64..10.0,
        width in 0.1f64..100.0,
        target in -50.0f64..150.0,
    ) {
        let hi = lo + width;
        let mut inside = true;
        let _ = minimize_bounded(
            |x| {
                inside &= x >= lo && x <= hi;
                (x - target).abs()
            },
            lo, hi, 1e-3, 500,
        ).unwrap();
        prop_assert!(inside);
    }

    /// Bracketing a monotone function around its root yields a straddling pair.
    #[test]
    fn bracket_straddles_root(root in 1.5f64..9.5, n in 5usize..60) {
        let pts = trial_points(1.0, 10.0, n, false);
        if let Some((a, b)) = bracket_sign_change(|x| Ok(x - root), &pts) {
            prop_assert!(a <= root && root <= b, "[{}, {}] misses {}", a, b, root);
        } else {
            prop_assert!(false, "no bracket for root {}", root);
        }
    }

    /// Log-spaced trial points are increasing and hit both bounds.
    #[test]
    fn log_trial_points_monotone(n in 2usize..80) {
        let pts = trial_points(1.0, 1e5, n, true);
        prop_assert_eq!(pts.len(), n);
        prop_assert!((pts[0] - 1.0).abs() < 1e-9);
        prop_assert!((pts[n - 1] - 1e5).abs() < 1e-6);
        for w in pts.windows(2) {
            prop_assert!(w[1] > w[0]);
        }
    }
}

// ── Interpolation Properties ─────────────────────────────────────────

proptest! {
    /// Trilinear interpolation reproduces affine fields anywhere inside.
    #[test]
    fn trilinear_exact_for_affine(
        a in -2.0f64..2.0,
        b in -2.0f64..2.0,
        c in -2.0f64..2.0,
        px in 10.0f64..50.0,
        py in 0.2f64..0.95,
        pz in 0.001f64..0.15,
    ) {
        let x = Array1::linspace(10.0, 50.0, 9);
        let y = Array1::linspace(0.2, 0.95, 4);
        let z = Array1::linspace(0.001, 0.15, 6);
        let values = Array3::from_shape_fn((9, 4, 6), |(i, j, k)| a * x[i] + b * y[j] + c * z[k]);
        let table = GridInterpolator::new(x, y, z, values).unwrap();
        let expected = a * px + b * py + c * pz;
        prop_assert!((table.eval(px, py, pz) - expected).abs() < 1e-9);
    }

    /// Interpolated values stay within the table's range.
    #[test]
    fn trilinear_bounded_by_data(seed in 0u64..1000, px in 0.0f64..1.0, py in 0.0f64..1.0, pz in 0.0f64..1.0) {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = latin_hypercube(27, 1, &mut rng).into_shape_with_order((3, 3, 3)).unwrap();
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let axis = Array1::linspace(0.0, 1.0, 3);
        let table = GridInterpolator::new(axis.clone(), axis.clone(), axis, values).unwrap();
        let v = table.eval(px, py, pz);
        prop_assert!(v >= lo - 1e-12 && v <= hi + 1e-12);
    }
}

// ── Fitting Properties ───────────────────────────────────────────────

proptest! {
    /// Power-law fit recovers exact power-law data.
    #[test]
    fn power_law_recovered(a in 0.05f64..0.5, b in -1.5f64..-0.2) {
        let x: Vec<f64> = (0..10).map(|i| 0.3 + 0.065 * i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&f| a * f.powf(b)).collect();
        let (fa, fb) = fit_power_law(&x, &y).unwrap();
        prop_assert!((fa - a).abs() / a < 1e-8);
        prop_assert!((fb - b).abs() < 1e-8);
    }

    /// A linear fit to linear data has zero residual.
    #[test]
    fn linear_fit_exact(m in -5.0f64..5.0, q in -5.0f64..5.0) {
        let x: Vec<f64> = (0..7).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| m * v + q).collect();
        let p = polyfit(&x, &y, 1).unwrap();
        prop_assert!((p[0] - m).abs() < 1e-9);
        prop_assert!((p[1] - q).abs() < 1e-9);
    }
}

// ── Sampling Properties ──────────────────────────────────────────────

proptest! {
    /// Grid product size is the product of axis lengths.
    #[test]
    fn grid_product_size(n1 in 1usize..8, n2 in 1usize..8, n3 in 1usize..8) {
        let axes = [
            Array1::linspace(0.0, 1.0, n1),
            Array1::linspace(0.0, 1.0, n2),
            Array1::linspace(0.0, 1.0, n3),
        ];
        let pts = grid_product(&axes);
        prop_assert_eq!(pts.len(), n1 * n2 * n3);
        prop_assert!(pts.iter().all(|p| p.len() == 3));
    }

    /// Column means of a Latin hypercube are close to one half.
    #[test]
    fn hypercube_columns_centered(seed in 0u64..10_000, samples in 10usize..200) {
        let cube = latin_hypercube(samples, 3, &mut StdRng::seed_from_u64(seed));
        for d in 0..3 {
            let mean = cube.column(d).sum() / samples as f64;
            // Stratification bounds the mean within half a stratum width.
            prop_assert!((mean - 0.5).abs() <= 0.5 / samples as f64 + 1e-12);
        }
    }
}
