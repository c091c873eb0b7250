// ─────────────────────────────────────────────────────────────────────
// CoreOpt — k-effective Models
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! k-effective as a function of core radius, fuel fraction and reflector
//! multiplier.
//!
//! The tabulated model wraps Monte Carlo results on a full tensor grid
//! `core_r × fuel_frac × ref_mult` and interpolates trilinearly between
//! them, clamping outside the sampled box.

use coreopt_math::interp::GridInterpolator;
use coreopt_types::error::{CoreOptError, CoreOptResult};
use ndarray::{Array1, Array3};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Column header of a k-effective results file.
pub const KEFF_CSV_HEADER: &str = "core_r,fuel_frac,ref_mult,keff";

/// Anything that predicts k-effective for a homogeneous core.
pub trait KeffModel {
    /// k-effective at core radius [cm], fuel volume fraction [-] and
    /// reflector thickness as a multiple of the core radius [-].
    fn keff(&self, core_radius_cm: f64, fuel_frac: f64, ref_mult: f64) -> f64;
}

impl<F> KeffModel for F
where
    F: Fn(f64, f64, f64) -> f64,
{
    fn keff(&self, core_radius_cm: f64, fuel_frac: f64, ref_mult: f64) -> f64 {
        self(core_radius_cm, fuel_frac, ref_mult)
    }
}

/// One transport result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeffPoint {
    pub core_r: f64,
    pub fuel_frac: f64,
    pub ref_mult: f64,
    pub keff: f64,
}

/// Trilinear interpolant over tabulated transport results.
#[derive(Debug, Clone)]
pub struct GridKeff {
    table: GridInterpolator,
}

impl GridKeff {
    /// Build from scattered points that must cover every grid node exactly once.
    pub fn from_points(points: &[KeffPoint]) -> CoreOptResult<Self> {
        if points.is_empty() {
            return Err(CoreOptError::Config("k-eff table has no data rows".to_string()));
        }
        let radii = unique_sorted(points.iter().map(|p| p.core_r));
        let fracs = unique_sorted(points.iter().map(|p| p.fuel_frac));
        let mults = unique_sorted(points.iter().map(|p| p.ref_mult));

        let expected = radii.len() * fracs.len() * mults.len();
        if points.len() != expected {
            return Err(CoreOptError::Config(format!(
                "k-eff table is not a full grid: {} rows for {}×{}×{} = {} nodes",
                points.len(),
                radii.len(),
                fracs.len(),
                mults.len(),
                expected
            )));
        }

        let mut values = Array3::from_elem((radii.len(), fracs.len(), mults.len()), f64::NAN);
        for p in points {
            let idx = [
                index_of(&radii, p.core_r),
                index_of(&fracs, p.fuel_frac),
                index_of(&mults, p.ref_mult),
            ];
            if !values[idx].is_nan() {
                return Err(CoreOptError::Config(format!(
                    "duplicate k-eff entry at core_r={}, fuel_frac={}, ref_mult={}",
                    p.core_r, p.fuel_frac, p.ref_mult
                )));
            }
            values[idx] = p.keff;
        }

        let table = GridInterpolator::new(
            Array1::from(radii),
            Array1::from(fracs),
            Array1::from(mults),
            values,
        )
        .map_err(|e| CoreOptError::Config(format!("k-eff grid rejected: {e}")))?;
        Ok(GridKeff { table })
    }

    /// Parse `core_r,fuel_frac,ref_mult,keff` rows (header required).
    pub fn parse_csv(text: &str) -> CoreOptResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());
        match lines.next() {
            Some((_, header)) if header.trim().replace(' ', "") == KEFF_CSV_HEADER => {}
            Some((_, header)) => {
                return Err(CoreOptError::Config(format!(
                    "k-eff header '{}' should be '{KEFF_CSV_HEADER}'",
                    header.trim()
                )))
            }
            None => return Err(CoreOptError::Config("k-eff file is empty".to_string())),
        }

        let mut points = Vec::new();
        for (lineno, line) in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 4 {
                return Err(CoreOptError::Config(format!(
                    "line {}: expected 4 columns, got {}",
                    lineno + 1,
                    fields.len()
                )));
            }
            let mut parsed = [0.0; 4];
            for (slot, field) in parsed.iter_mut().zip(&fields) {
                *slot = field.parse::<f64>().map_err(|e| {
                    CoreOptError::Config(format!("line {}: '{field}': {e}", lineno + 1))
                })?;
            }
            points.push(KeffPoint {
                core_r: parsed[0],
                fuel_frac: parsed[1],
                ref_mult: parsed[2],
                keff: parsed[3],
            });
        }
        debug!(rows = points.len(), "parsed k-eff table");
        Self::from_points(&points)
    }

    pub fn from_csv(path: &Path) -> CoreOptResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse_csv(&text)
    }

    /// Sampled reflector multipliers, for marking the grid on scans.
    pub fn ref_mult_axis(&self) -> &Array1<f64> {
        &self.table.z
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.table.values.dim()
    }
}

impl KeffModel for GridKeff {
    fn keff(&self, core_radius_cm: f64, fuel_frac: f64, ref_mult: f64) -> f64 {
        self.table.eval(core_radius_cm, fuel_frac, ref_mult)
    }
}

fn unique_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    v.dedup();
    v
}

fn index_of(axis: &[f64], value: f64) -> usize {
    axis.partition_point(|&a| a < value)
}
