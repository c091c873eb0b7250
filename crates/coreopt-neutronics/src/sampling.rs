// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Transport Case Sampling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Design points handed to the external Monte Carlo transport runs.

use coreopt_math::sampling::{grid_product, latin_hypercube};
use coreopt_types::error::{CoreOptError, CoreOptResult};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Seed of the reference hypercube.
pub const HYPERCUBE_SEED: u64 = 4654562;

pub const DEFAULT_HYPERCUBE_SAMPLES: usize = 500;

/// `(lower, upper, points)` of one sampled parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    pub lower: f64,
    pub upper: f64,
    pub points: usize,
}

impl AxisSpec {
    pub const fn new(lower: f64, upper: f64, points: usize) -> Self {
        AxisSpec {
            lower,
            upper,
            points,
        }
    }

    pub fn linspace(&self) -> Array1<f64> {
        Array1::linspace(self.lower, self.upper, self.points)
    }

    fn scale(&self, unit: f64) -> f64 {
        self.lower + unit * (self.upper - self.lower)
    }
}

/// Parameter space of the k-effective tables. Field order is the sorted
/// parameter-name order used in every output header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpace {
    /// Core radius [cm].
    pub core_r: AxisSpec,
    pub fuel_frac: AxisSpec,
    pub ref_mult: AxisSpec,
}

impl Default for ParameterSpace {
    fn default() -> Self {
        ParameterSpace {
            core_r: AxisSpec::new(10.0, 50.0, 30),
            fuel_frac: AxisSpec::new(0.2, 0.95, 10),
            ref_mult: AxisSpec::new(0.001, 0.15, 33),
        }
    }
}

impl ParameterSpace {
    pub const NAMES: [&'static str; 3] = ["core_r", "fuel_frac", "ref_mult"];

    fn axes(&self) -> [AxisSpec; 3] {
        [self.core_r, self.fuel_frac, self.ref_mult]
    }

    pub fn validate(&self) -> CoreOptResult<()> {
        for (name, axis) in Self::NAMES.iter().zip(self.axes()) {
            if !(axis.lower.is_finite() && axis.upper.is_finite() && axis.lower < axis.upper) {
                return Err(CoreOptError::Config(format!(
                    "{name}: lower {} must be < upper {}",
                    axis.lower, axis.upper
                )));
            }
            if axis.points == 0 {
                return Err(CoreOptError::Config(format!("{name}: zero grid points")));
            }
        }
        Ok(())
    }

    /// Every combination of the axis linspaces, `ref_mult` fastest.
    pub fn grid_cases(&self) -> Vec<TransportCase> {
        let axes: Vec<Array1<f64>> = self.axes().iter().map(AxisSpec::linspace).collect();
        grid_product(&axes)
            .into_iter()
            .map(|p| TransportCase::from_slice(&p))
            .collect()
    }

    /// Latin hypercube scaled uniformly into the parameter bounds.
    pub fn hypercube_cases(&self, samples: usize, seed: u64) -> Vec<TransportCase> {
        let mut rng = StdRng::seed_from_u64(seed);
        let cube = latin_hypercube(samples, 3, &mut rng);
        let axes = self.axes();
        cube.rows()
            .into_iter()
            .map(|u| {
                let scaled: Vec<f64> = axes.iter().zip(u.iter()).map(|(a, &x)| a.scale(x)).collect();
                TransportCase::from_slice(&scaled)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportCase {
    pub core_r: f64,
    pub fuel_frac: f64,
    pub ref_mult: f64,
}

impl TransportCase {
    fn from_slice(v: &[f64]) -> Self {
        TransportCase {
            core_r: v[0],
            fuel_frac: v[1],
            ref_mult: v[2],
        }
    }
}

fn round5(v: f64) -> f64 {
    (v * 1e5).round() / 1e5
}

/// Numbered case list, parameters rounded to 5 decimals.
pub fn write_cases(path: &Path, cases: &[TransportCase]) -> CoreOptResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "case,{}", ParameterSpace::NAMES.join(","))?;
    for (num, c) in cases.iter().enumerate() {
        writeln!(
            writer,
            "{num},{},{},{}",
            round5(c.core_r),
            round5(c.fuel_frac),
            round5(c.ref_mult)
        )?;
    }
    writer.flush()?;
    info!(cases = cases.len(), path = %path.display(), "wrote transport cases");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_size_and_order() {
        let space = ParameterSpace::default();
        let cases = space.grid_cases();
        assert_eq!(cases.len(), 30 * 10 * 33);
        assert_eq!(cases[0], TransportCase { core_r: 10.0, fuel_frac: 0.2, ref_mult: 0.001 });
        assert!((cases[1].ref_mult - (0.001 + 0.149 / 32.0)).abs() < 1e-12);
        assert!((cases[33].fuel_frac - (0.2 + 0.75 / 9.0)).abs() < 1e-12);
        let last = cases[cases.len() - 1];
        assert!((last.core_r - 50.0).abs() < 1e-12);
        assert!((last.ref_mult - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_hypercube_seeded_and_bounded() {
        let space = ParameterSpace::default();
        let a = space.hypercube_cases(64, HYPERCUBE_SEED);
        let b = space.hypercube_cases(64, HYPERCUBE_SEED);
        assert_eq!(a, b);
        assert_ne!(a, space.hypercube_cases(64, HYPERCUBE_SEED + 1));
        for c in &a {
            assert!((10.0..=50.0).contains(&c.core_r));
            assert!((0.2..=0.95).contains(&c.fuel_frac));
            assert!((0.001..=0.15).contains(&c.ref_mult));
        }
    }

    #[test]
    fn test_validate_rejects_inverted_axis() {
        let mut space = ParameterSpace::default();
        assert!(space.validate().is_ok());
        space.fuel_frac = AxisSpec::new(0.9, 0.2, 10);
        assert!(matches!(space.validate(), Err(CoreOptError::Config(_))));
    }

    #[test]
    fn test_write_cases_header_and_rounding() {
        let path = std::env::temp_dir().join(format!("coreopt_cases_{}.csv", std::process::id()));
        let cases = [TransportCase { core_r: 12.3456789, fuel_frac: 0.5, ref_mult: 0.001 }];
        write_cases(&path, &cases).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text, "case,core_r,fuel_frac,ref_mult\n0,12.34568,0.5,0.001\n");
    }
}
