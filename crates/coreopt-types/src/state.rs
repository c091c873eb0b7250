// ─────────────────────────────────────────────────────────────────────
// CoreOpt — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::config::ParamRange;
use ndarray::{Array1, Array2};

/// Half-open axis `lower + k·(upper − lower)/n` for `k = 0..n`.
/// The upper bound itself is not sampled.
pub fn arange_axis(range: &ParamRange, n: usize) -> Array1<f64> {
    if n == 0 {
        return Array1::zeros(0);
    }
    let step = (range.upper - range.lower) / n as f64;
    Array1::from_shape_fn(n, |k| range.lower + k as f64 * step)
}

/// Square design grid over channel radius × second axis.
///
/// Cell `(i, j)` pairs `radius[i]` with `second[j]`; its flat index is
/// `i·n + j`, so flat order is radius-major.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    pub n: usize,
    pub radius: Array1<f64>,
    pub second: Array1<f64>,
    /// Meshgrid of radius values [n, n].
    pub rr: Array2<f64>,
    /// Meshgrid of second-axis values [n, n].
    pub ss: Array2<f64>,
}

impl SweepGrid {
    pub fn new(n: usize, radius: &ParamRange, second: &ParamRange) -> Self {
        let r = arange_axis(radius, n);
        let s = arange_axis(second, n);
        let mut rr = Array2::zeros((n, n));
        let mut ss = Array2::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                rr[[i, j]] = r[i];
                ss[[i, j]] = s[j];
            }
        }

        SweepGrid {
            n,
            radius: r,
            second: s,
            rr,
            ss,
        }
    }

    pub fn len(&self) -> usize {
        self.n * self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn flat_index(&self, i_radius: usize, i_second: usize) -> usize {
        i_radius * self.n + i_second
    }

    pub fn cell_indices(&self, flat: usize) -> (usize, usize) {
        (flat / self.n, flat % self.n)
    }

    /// `(radius, second)` coordinates of a flat cell index.
    pub fn point(&self, flat: usize) -> (f64, f64) {
        let (i, j) = self.cell_indices(flat);
        (self.rr[[i, j]], self.ss[[i, j]])
    }
}
