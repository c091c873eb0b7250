// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Channel-Count Solver and Pressure-Drop Corrector
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Drives a [`FlowModel`] to the target power, then enforces the pressure
//! drop limit by adding channels.

use crate::flow::{FlowModel, FlowSummary};
use coreopt_math::optimize::{bracket_sign_change, minimize_bounded, trial_points};
use coreopt_types::config::{AxisScale, SolverSettings};
use coreopt_types::error::{CoreOptError, CoreOptResult};
use tracing::debug;

/// Outcome of a successful power-balance solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Solve variable at the minimum (fuel fraction or channel count).
    pub variable: f64,
    pub residual: f64,
    pub evaluations: usize,
}

/// Bounded 1-D search for the solve variable that balances generation
/// against the target power.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSolver {
    pub settings: SolverSettings,
}

impl ChannelSolver {
    pub fn new(settings: SolverSettings) -> Self {
        ChannelSolver { settings }
    }

    /// Bounds narrowed to the first sign change of the residual, or the
    /// full bounds when the scan finds none.
    fn bracket<M: FlowModel>(&self, model: &mut M) -> (f64, f64) {
        let s = &self.settings;
        let full = (s.bounds.lower, s.bounds.upper);
        if s.bracket_samples < 2 {
            return full;
        }
        let points = trial_points(
            s.bounds.lower,
            s.bounds.upper,
            s.bracket_samples,
            s.scale == AxisScale::Log,
        );
        bracket_sign_change(|x| model.residual(x), &points).unwrap_or(full)
    }

    pub fn solve<M: FlowModel>(&self, model: &mut M) -> CoreOptResult<SolveReport> {
        let s = &self.settings;
        let (lo, hi) = self.bracket(model);

        let minimum = minimize_bounded(
            |x| match model.residual(x) {
                Ok(r) if r.is_finite() => r * r,
                _ => f64::INFINITY,
            },
            lo,
            hi,
            s.xatol,
            s.max_evaluations,
        )?;

        // Leave the model at the reported point.
        let residual = model.residual(minimum.x)?;
        let target = model.target_power();
        let mismatch = (model.generation() - target).abs();
        debug!(
            x = minimum.x,
            residual,
            evaluations = minimum.evaluations,
            bracket_lo = lo,
            bracket_hi = hi,
            "power balance search finished"
        );

        if !minimum.converged || !(mismatch <= s.power_tolerance * target) {
            return Err(CoreOptError::Convergence {
                evaluations: minimum.evaluations,
                residual,
                message: format!(
                    "generation misses target by {:.3e} W (tolerance {:.1e} relative, minimizer converged: {})",
                    mismatch, s.power_tolerance, minimum.converged
                ),
            });
        }

        Ok(SolveReport {
            variable: minimum.x,
            residual,
            evaluations: minimum.evaluations,
        })
    }
}

/// Adds channels until the Darcy pressure drop is within the limit.
#[derive(Debug, Clone, Copy)]
pub struct PressureDropCorrector {
    pub limit: f64,
    pub max_iterations: usize,
}

impl PressureDropCorrector {
    pub fn new(limit: f64, max_iterations: usize) -> Self {
        PressureDropCorrector {
            limit,
            max_iterations,
        }
    }

    /// Returns the number of corrections applied.
    pub fn correct<M: FlowModel>(&self, model: &mut M) -> CoreOptResult<usize> {
        let mut dp = model.hydraulics().pressure_drop();
        let mut iterations = 0;
        while dp > self.limit {
            if iterations >= self.max_iterations {
                return Err(CoreOptError::NonConvergentConstraint {
                    iterations,
                    pressure_drop: dp,
                    limit: self.limit,
                });
            }
            iterations += 1;
            let current = model.channel_count();
            // Friction falls as channels are added, so the estimate can stall.
            let n = model
                .hydraulics()
                .channels_for_limit(self.limit)
                .max(current.floor() + 1.0);
            model.set_channel_count(n)?;
            dp = model.hydraulics().pressure_drop();
            debug!(iteration = iterations, channels = n, dp, "pressure drop correction");
        }
        Ok(iterations)
    }
}

/// Solve, round the channel count up, correct for pressure drop and report.
pub fn evaluate_design<M: FlowModel>(
    model: &mut M,
    settings: &SolverSettings,
) -> CoreOptResult<FlowSummary> {
    ChannelSolver::new(*settings).solve(model)?;

    let rounded = model.channel_count().ceil();
    model.set_channel_count(rounded)?;

    PressureDropCorrector::new(model.dp_limit(), settings.max_dp_iterations).correct(model)?;
    Ok(model.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{ChannelHydraulics, MassBreakdown};
    use coreopt_types::config::{ParamRange, Profile};

    /// Generation proportional to channel count; friction fixed.
    struct LinearChannels {
        n: f64,
        per_channel: f64,
        target: f64,
        friction: f64,
        limit: f64,
    }

    impl FlowModel for LinearChannels {
        fn profile(&self) -> Profile {
            Profile::PinCell
        }
        fn target_power(&self) -> f64 {
            self.target
        }
        fn dp_limit(&self) -> f64 {
            self.limit
        }
        fn residual(&mut self, x: f64) -> CoreOptResult<f64> {
            self.n = x;
            Ok(1.0 - self.target / self.generation())
        }
        fn generation(&self) -> f64 {
            self.n * self.per_channel
        }
        fn channel_count(&self) -> f64 {
            self.n
        }
        fn set_channel_count(&mut self, n: f64) -> CoreOptResult<()> {
            self.n = n;
            Ok(())
        }
        fn hydraulics(&self) -> ChannelHydraulics {
            let area = 1e-4;
            let density = 80.0;
            let mass_flow = 1.0;
            ChannelHydraulics {
                friction: self.friction,
                length: 2.0,
                density,
                velocity: mass_flow / (self.n * area * density),
                hydraulic_diameter: 0.01,
                mass_flow,
                channel_area: area,
            }
        }
        fn compute_mass(&self) -> MassBreakdown {
            MassBreakdown {
                fuel: self.n,
                ..MassBreakdown::default()
            }
        }
        fn summary(&self) -> FlowSummary {
            FlowSummary {
                radius: 0.005,
                pitch_ratio: 1.2,
                aspect_ratio: 1.0,
                core_radius: 1.0,
                core_length: 2.0,
                fuel_fraction: 0.5,
                masses: self.compute_mass(),
                channels: self.n,
                pressure_drop: self.hydraulics().pressure_drop(),
                h_bar: 0.0,
                q_per_channel: self.per_channel,
                q_bar: 0.0,
                velocity: self.hydraulics().velocity,
                reynolds: 0.0,
            }
        }
    }

    fn model(limit: f64) -> LinearChannels {
        LinearChannels {
            n: 1.0,
            per_channel: 3.0e4,
            target: 2.0e5,
            friction: 0.02,
            limit,
        }
    }

    fn settings() -> SolverSettings {
        SolverSettings {
            bounds: ParamRange::new(1.0, 1e5),
            ..SolverSettings::for_profile(Profile::PinCell)
        }
    }

    #[test]
    fn test_solver_finds_power_balance() {
        let mut m = model(1e9);
        let report = ChannelSolver::new(settings()).solve(&mut m).unwrap();
        assert!((report.variable - 2.0e5 / 3.0e4).abs() < 1e-2, "x = {}", report.variable);
        assert!(report.residual.abs() < 1e-3);
    }

    #[test]
    fn test_solver_reports_unreachable_target() {
        let mut m = model(1e9);
        m.target = 1e12;
        let err = ChannelSolver::new(settings()).solve(&mut m).unwrap_err();
        assert!(matches!(err, CoreOptError::Convergence { .. }), "{err}");
    }

    #[test]
    fn test_corrector_meets_limit() {
        let mut m = model(1e9);
        m.n = 7.0;
        let dp0 = m.hydraulics().pressure_drop();
        let limit = dp0 / 3.0;
        m.limit = limit;
        let iterations = PressureDropCorrector::new(limit, 50).correct(&mut m).unwrap();
        assert_eq!(iterations, 1);
        assert!(m.hydraulics().pressure_drop() <= limit);
        // dp ∝ 1/N², so 7·√3 channels rounded up.
        assert_eq!(m.n, 13.0);
    }

    #[test]
    fn test_corrector_untouched_below_limit() {
        let mut m = model(1e9);
        m.n = 7.0;
        assert_eq!(PressureDropCorrector::new(1e9, 50).correct(&mut m).unwrap(), 0);
        assert_eq!(m.n, 7.0);
    }

    #[test]
    fn test_corrector_iteration_cap() {
        let mut m = model(1e9);
        m.n = 7.0;
        let err = PressureDropCorrector::new(1e-3, 0).correct(&mut m).unwrap_err();
        match err {
            CoreOptError::NonConvergentConstraint { iterations, limit, .. } => {
                assert_eq!(iterations, 0);
                assert_eq!(limit, 1e-3);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_evaluate_design_rounds_up() {
        let mut m = model(1e9);
        let summary = evaluate_design(&mut m, &settings()).unwrap();
        assert_eq!(summary.channels, 7.0);
    }
}
