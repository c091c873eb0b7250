// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Critical Radius and Reflector Optimization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Critical core radius from a k-effective model, mass-optimal reflector
//! thickness and the fuel-fraction → critical radius correlation used by
//! the CO2-cooled thermal profile.
//!
//! Lengths are in cm and densities in g/cc inside this module, matching the
//! transport tables. Masses are reported in kg.

use crate::keff::KeffModel;
use coreopt_math::fit::{fit_power_law, polyfit};
use coreopt_math::optimize::minimize_bounded;
use coreopt_types::config::ParamRange;
use coreopt_types::constants::{CM_TO_M, G_TO_KG, TARGET_KEFF};
use coreopt_types::error::{CoreOptError, CoreOptResult};
use coreopt_types::materials::{CoolantProperties, CoreRadiusCorrelation, FuelProperties};
use ndarray::Array1;
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Reflector (graphite) density [g/cc].
const REFLECTOR_DENSITY_GCC: f64 = 1.7;

/// Pressure vessel steel density [g/cc].
const VESSEL_DENSITY_GCC: f64 = 8.0;

/// Pressure vessel wall thickness [cm].
const VESSEL_THICKNESS_CM: f64 = 1.0;

/// kg/m³ → g/cc.
const KG_M3_TO_G_CC: f64 = 1e-3;

/// Fuel fractions scanned by [`fuel_fraction_sweep`].
pub const FUEL_FRACTION_SCAN: (f64, f64, usize) = (0.3, 0.95, 10);

/// Reflector multipliers scanned by [`reflector_scan`].
pub const REFLECTOR_SCAN: (f64, f64, usize) = (0.001, 0.6, 100);

/// Header of the fuel-fraction results file.
pub const FRACTION_CSV_HEADER: &str = "fuel_frac,crit_radius,ref_mult";

/// Bounded search for the radius where k-eff hits the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalSearch {
    /// Core radius bounds [cm].
    pub radius: ParamRange,
    pub target_keff: f64,
    /// Allowed |k − target| at the returned radius.
    pub keff_tolerance: f64,
    pub xatol: f64,
    pub max_evaluations: usize,
}

impl Default for CriticalSearch {
    fn default() -> Self {
        CriticalSearch {
            radius: ParamRange::new(10.0, 50.0),
            target_keff: TARGET_KEFF,
            keff_tolerance: 1e-3,
            xatol: 1e-5,
            max_evaluations: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPoint {
    /// Critical core radius [cm].
    pub radius_cm: f64,
    pub keff: f64,
    pub evaluations: usize,
}

/// Radius in the search bounds minimizing `(keff(r) − target)²`.
pub fn critical_radius<K: KeffModel + ?Sized>(
    model: &K,
    fuel_frac: f64,
    ref_mult: f64,
    search: &CriticalSearch,
) -> CoreOptResult<CriticalPoint> {
    let target = search.target_keff;
    let min = minimize_bounded(
        |r| (model.keff(r, fuel_frac, ref_mult) - target).powi(2),
        search.radius.lower,
        search.radius.upper,
        search.xatol,
        search.max_evaluations,
    )?;
    let keff = model.keff(min.x, fuel_frac, ref_mult);
    if !min.converged || !((keff - target).abs() <= search.keff_tolerance) {
        return Err(CoreOptError::Convergence {
            evaluations: min.evaluations,
            residual: keff - target,
            message: format!(
                "k-eff {keff:.4} at r = {:.3} cm misses target {target} (fuel_frac {fuel_frac}, ref_mult {ref_mult})",
                min.x
            ),
        });
    }
    Ok(CriticalPoint {
        radius_cm: min.x,
        keff,
        evaluations: min.evaluations,
    })
}

/// Component masses of a reactor [kg].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReactorMass {
    pub core: f64,
    pub reflector: f64,
    pub vessel: f64,
}

impl ReactorMass {
    pub fn total(&self) -> f64 {
        self.core + self.reflector + self.vessel
    }
}

/// Mass of a reactor built around a critical core.
pub trait MassModel {
    fn masses(&self, core_radius_cm: f64, fuel_frac: f64, ref_mult: f64) -> ReactorMass;

    fn total_mass(&self, core_radius_cm: f64, fuel_frac: f64, ref_mult: f64) -> f64 {
        self.masses(core_radius_cm, fuel_frac, ref_mult).total()
    }
}

/// Homogenized cylindrical core (L = 2r) in a reflector shell of thickness
/// `ref_mult · r` on every face, inside a thin steel vessel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomogeneousCore {
    /// [g/cc]
    pub fuel_density: f64,
    /// [g/cc]
    pub coolant_density: f64,
    /// [g/cc]
    pub reflector_density: f64,
    /// [g/cc]
    pub vessel_density: f64,
    /// [cm]
    pub vessel_thickness: f64,
}

impl HomogeneousCore {
    pub fn from_materials(fuel: &FuelProperties, coolant: &CoolantProperties) -> Self {
        HomogeneousCore {
            fuel_density: fuel.density * KG_M3_TO_G_CC,
            coolant_density: coolant.density * KG_M3_TO_G_CC,
            reflector_density: REFLECTOR_DENSITY_GCC,
            vessel_density: VESSEL_DENSITY_GCC,
            vessel_thickness: VESSEL_THICKNESS_CM,
        }
    }

    /// Volume-weighted fuel/coolant mixture density [g/cc].
    pub fn core_density(&self, fuel_frac: f64) -> f64 {
        fuel_frac * self.fuel_density + (1.0 - fuel_frac) * self.coolant_density
    }
}

fn cylinder(radius: f64, height: f64) -> f64 {
    PI * radius * radius * height
}

impl MassModel for HomogeneousCore {
    fn masses(&self, core_radius_cm: f64, fuel_frac: f64, ref_mult: f64) -> ReactorMass {
        let r = core_radius_cm;
        let l = 2.0 * r;
        let t = ref_mult * r;
        let (rr, lr) = (r + t, l + 2.0 * t);
        let tv = self.vessel_thickness;

        let core = cylinder(r, l);
        let reflector = cylinder(rr, lr) - core;
        let vessel = cylinder(rr + tv, lr + 2.0 * tv) - cylinder(rr, lr);
        ReactorMass {
            core: core * self.core_density(fuel_frac) * G_TO_KG,
            reflector: reflector * self.reflector_density * G_TO_KG,
            vessel: vessel * self.vessel_density * G_TO_KG,
        }
    }
}

/// Lightest critical configuration at one fuel fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectorOptimum {
    pub fuel_frac: f64,
    pub ref_mult: f64,
    /// [cm]
    pub crit_radius: f64,
    /// [kg]
    pub mass: f64,
}

/// Minimize total mass over the reflector multiplier, re-solving the
/// critical radius at every trial.
pub fn optimal_reflector<K, M>(
    model: &K,
    masses: &M,
    fuel_frac: f64,
    bounds: &ParamRange,
    search: &CriticalSearch,
) -> CoreOptResult<ReflectorOptimum>
where
    K: KeffModel + ?Sized,
    M: MassModel + ?Sized,
{
    let objective = |mult: f64| match critical_radius(model, fuel_frac, mult, search) {
        Ok(c) => masses.total_mass(c.radius_cm, fuel_frac, mult),
        Err(_) => f64::INFINITY,
    };
    let min = minimize_bounded(
        objective,
        bounds.lower,
        bounds.upper,
        search.xatol,
        search.max_evaluations,
    )?;
    let crit = critical_radius(model, fuel_frac, min.x, search)?;
    let mass = masses.total_mass(crit.radius_cm, fuel_frac, min.x);
    debug!(fuel_frac, ref_mult = min.x, crit_radius = crit.radius_cm, mass, "reflector optimum");
    Ok(ReflectorOptimum {
        fuel_frac,
        ref_mult: min.x,
        crit_radius: crit.radius_cm,
        mass,
    })
}

/// Mass curve over evenly spaced reflector multipliers.
#[derive(Debug, Clone)]
pub struct ReflectorScan {
    pub ref_mult: Vec<f64>,
    /// Critical radius per multiplier [cm], NaN where no critical radius exists.
    pub crit_radius: Vec<f64>,
    /// Total mass per multiplier [kg], NaN where no critical radius exists.
    pub mass: Vec<f64>,
    /// Multiplier of the lightest scanned point.
    pub best_ref_mult: f64,
    /// Quadratic least-squares fit of mass vs multiplier, highest power first.
    pub quadratic: Vec<f64>,
}

pub fn reflector_scan<K, M>(
    model: &K,
    masses: &M,
    fuel_frac: f64,
    search: &CriticalSearch,
) -> CoreOptResult<ReflectorScan>
where
    K: KeffModel + ?Sized,
    M: MassModel + ?Sized,
{
    let (lo, hi, n) = REFLECTOR_SCAN;
    let mults = Array1::linspace(lo, hi, n).to_vec();
    let mut radii = Vec::with_capacity(n);
    let mut mass = Vec::with_capacity(n);
    for &m in &mults {
        match critical_radius(model, fuel_frac, m, search) {
            Ok(c) => {
                radii.push(c.radius_cm);
                mass.push(masses.total_mass(c.radius_cm, fuel_frac, m));
            }
            Err(e) => {
                debug!(ref_mult = m, error = %e, "no critical radius");
                radii.push(f64::NAN);
                mass.push(f64::NAN);
            }
        }
    }

    let (fit_x, fit_y): (Vec<f64>, Vec<f64>) = mults
        .iter()
        .zip(&mass)
        .filter(|(_, m)| m.is_finite())
        .map(|(&x, &m)| (x, m))
        .unzip();
    let quadratic = polyfit(&fit_x, &fit_y, 2)?;
    let best_ref_mult = fit_x
        .iter()
        .zip(&fit_y)
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(&x, _)| x)
        .ok_or_else(|| CoreOptError::Domain("reflector scan found no critical point".to_string()))?;

    Ok(ReflectorScan {
        ref_mult: mults,
        crit_radius: radii,
        mass,
        best_ref_mult,
        quadratic,
    })
}

/// Optimal reflector and critical radius over the standard fuel fractions.
/// Fractions without a critical configuration are logged and skipped.
pub fn fuel_fraction_sweep<K, M>(
    model: &K,
    masses: &M,
    search: &CriticalSearch,
) -> Vec<ReflectorOptimum>
where
    K: KeffModel + ?Sized,
    M: MassModel + ?Sized,
{
    let (lo, hi, n) = FUEL_FRACTION_SCAN;
    let reflector_bounds = ParamRange::new(0.01, 0.6);
    let mut rows = Vec::with_capacity(n);
    for ff in Array1::linspace(lo, hi, n) {
        match optimal_reflector(model, masses, ff, &reflector_bounds, search) {
            Ok(opt) => rows.push(opt),
            Err(e) => warn!(fuel_frac = ff, error = %e, "no critical design"),
        }
    }
    info!(solved = rows.len(), total = n, "fuel fraction sweep finished");
    rows
}

pub fn write_fraction_results(path: &Path, rows: &[ReflectorOptimum]) -> CoreOptResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{FRACTION_CSV_HEADER}")?;
    for row in rows {
        writeln!(
            writer,
            "{:.2},{:.5},{:.5}",
            row.fuel_frac, row.crit_radius, row.ref_mult
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Power law `r_core [m] = a · ff^b` through the swept critical radii.
pub fn fit_core_radius(rows: &[ReflectorOptimum]) -> CoreOptResult<CoreRadiusCorrelation> {
    if rows.len() < 2 {
        return Err(CoreOptError::Domain(format!(
            "core radius fit needs at least 2 critical points, got {}",
            rows.len()
        )));
    }
    let ff: Vec<f64> = rows.iter().map(|r| r.fuel_frac).collect();
    let radius_m: Vec<f64> = rows.iter().map(|r| r.crit_radius * CM_TO_M).collect();
    let (coefficient, exponent) = fit_power_law(&ff, &radius_m)?;
    Ok(CoreRadiusCorrelation {
        coefficient,
        exponent,
    })
}
