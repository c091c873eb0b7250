//! Trilinear interpolation on rectilinear grids.
//!
//! Used to query tabulated k-effective data between sample points.

use coreopt_types::error::{CoreOptError, CoreOptResult};
use ndarray::{Array1, Array3};

/// Rectilinear 3-D table with strictly increasing axes.
#[derive(Debug, Clone)]
pub struct GridInterpolator {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub z: Array1<f64>,
    /// Values indexed `[ix, iy, iz]`.
    pub values: Array3<f64>,
}

impl GridInterpolator {
    pub fn new(
        x: Array1<f64>,
        y: Array1<f64>,
        z: Array1<f64>,
        values: Array3<f64>,
    ) -> CoreOptResult<Self> {
        for (name, axis) in [("x", &x), ("y", &y), ("z", &z)] {
            if axis.is_empty() {
                return Err(CoreOptError::Domain(format!("{name} axis is empty")));
            }
            if axis.windows(2).into_iter().any(|w| !(w[1] > w[0])) {
                return Err(CoreOptError::Domain(format!(
                    "{name} axis must be strictly increasing"
                )));
            }
        }
        if values.dim() != (x.len(), y.len(), z.len()) {
            return Err(CoreOptError::Domain(format!(
                "value table shape {:?} does not match axes ({}, {}, {})",
                values.dim(),
                x.len(),
                y.len(),
                z.len()
            )));
        }
        Ok(GridInterpolator { x, y, z, values })
    }

    /// Interpolated value at `(x, y, z)`. Clamps to the grid boundary if outside.
    pub fn eval(&self, x: f64, y: f64, z: f64) -> f64 {
        let (ix0, ix1, tx) = locate(&self.x, x);
        let (iy0, iy1, ty) = locate(&self.y, y);
        let (iz0, iz1, tz) = locate(&self.z, z);

        let v = &self.values;
        let c00 = v[[ix0, iy0, iz0]] * (1.0 - tx) + v[[ix1, iy0, iz0]] * tx;
        let c10 = v[[ix0, iy1, iz0]] * (1.0 - tx) + v[[ix1, iy1, iz0]] * tx;
        let c01 = v[[ix0, iy0, iz1]] * (1.0 - tx) + v[[ix1, iy0, iz1]] * tx;
        let c11 = v[[ix0, iy1, iz1]] * (1.0 - tx) + v[[ix1, iy1, iz1]] * tx;

        let c0 = c00 * (1.0 - ty) + c10 * ty;
        let c1 = c01 * (1.0 - ty) + c11 * ty;
        c0 * (1.0 - tz) + c1 * tz
    }
}

/// Bracketing indices and fractional position of `value` on `axis`.
fn locate(axis: &Array1<f64>, value: f64) -> (usize, usize, f64) {
    let n = axis.len();
    if n == 1 || value <= axis[0] {
        return (0, n.min(2) - 1, 0.0);
    }
    if value >= axis[n - 1] {
        return (n - 2, n - 1, 1.0);
    }
    // First index with axis[i] > value; value lies in [axis[i-1], axis[i]).
    let hi = axis
        .as_slice()
        .map(|s| s.partition_point(|&a| a <= value))
        .unwrap_or_else(|| axis.iter().take_while(|&&a| a <= value).count());
    let lo = hi - 1;
    let t = (value - axis[lo]) / (axis[hi] - axis[lo]);
    (lo, hi, t)
}
