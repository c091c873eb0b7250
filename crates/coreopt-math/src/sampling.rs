// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Design-Space Sampling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::Rng;

/// Latin hypercube on the unit cube, shape `[samples, dims]`.
///
/// Each column has exactly one point in every stratum
/// `[k/samples, (k+1)/samples)`, placed uniformly inside it, with strata
/// shuffled independently per column.
pub fn latin_hypercube<R: Rng>(samples: usize, dims: usize, rng: &mut R) -> Array2<f64> {
    let mut cube = Array2::zeros((samples, dims));
    if samples == 0 {
        return cube;
    }
    let width = 1.0 / samples as f64;
    for d in 0..dims {
        let mut column: Vec<f64> = (0..samples)
            .map(|k| (k as f64 + rng.gen::<f64>()) * width)
            .collect();
        column.shuffle(rng);
        for (s, value) in column.into_iter().enumerate() {
            cube[[s, d]] = value;
        }
    }
    cube
}

/// Cartesian product of axes, last axis varying fastest.
pub fn grid_product(axes: &[Array1<f64>]) -> Vec<Vec<f64>> {
    let mut points: Vec<Vec<f64>> = vec![Vec::with_capacity(axes.len())];
    for axis in axes {
        let mut next = Vec::with_capacity(points.len() * axis.len());
        for prefix in &points {
            for &v in axis.iter() {
                let mut p = prefix.clone();
                p.push(v);
                next.push(p);
            }
        }
        points = next;
    }
    points
}
