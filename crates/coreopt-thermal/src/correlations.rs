// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Pipe-Flow Correlations
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Nusselt number and Darcy friction factor for circular channels.
//!
//! Laminar below Re = 2300, turbulent above Re = 3000, linear blend in Re
//! between. All quantities are dimensionless.

use coreopt_types::constants::{RE_LAMINAR_MAX, RE_TURBULENT_MIN, ROUGH_PIPE_THRESHOLD};
use coreopt_types::error::{ensure_positive, CoreOptError, CoreOptResult};

/// Heat-transfer and friction result of one correlation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeFlow {
    /// Nusselt number, constant wall temperature.
    pub nusselt_t: f64,
    /// Nusselt number, constant wall heat flux.
    pub nusselt_h: f64,
    /// Darcy friction factor including the developing-flow correction.
    pub friction: f64,
}

fn check_inputs(re: f64, pr: f64, ld: f64) -> CoreOptResult<()> {
    ensure_positive("Re", re)?;
    ensure_positive("Pr", pr)?;
    ensure_positive("L/D", ld)?;
    Ok(())
}

/// Turbulent Nusselt number and friction factor. Returns `(Nu, f)`.
///
/// Smooth channels use the Li-Seem-Li friction fit, rough channels
/// (ε/D > 1e-5) the Offor-Alabi explicit Colebrook form. Nu is Gnielinski,
/// replaced by Notter-Sleicher for liquid-metal Prandtl numbers.
pub fn pipeflow_turbulent(re: f64, pr: f64, ld: f64, relrough: f64) -> CoreOptResult<(f64, f64)> {
    check_inputs(re, pr, ld)?;
    if !relrough.is_finite() || relrough < 0.0 {
        return Err(CoreOptError::Domain(format!(
            "relative roughness must be finite and >= 0, got {relrough}"
        )));
    }

    let ln_re = re.ln();
    let mut f = 4.0
        * (-0.001570232 / ln_re + 0.394203137 / ln_re.powi(2) + 2.534153311 / ln_re.powi(3));
    if relrough > ROUGH_PIPE_THRESHOLD {
        let inner = (relrough / 3.93).powf(1.092) + 7.627 / (re + 395.9);
        f = (-2.0 * (relrough / 3.71 - 1.975 / re * inner.ln()).log10()).powi(-2);
    }

    let f8 = f / 8.0;
    let mut nu = f8 * (re - 1000.0) * pr / (1.0 + 12.7 * f8.sqrt() * (pr.powf(2.0 / 3.0) - 1.0));

    if pr < 0.5 {
        let nu_lp = 4.8 + 0.0156 * re.powf(0.85) * pr.powf(0.93);
        nu = if pr < 0.1 {
            nu_lp
        } else {
            nu_lp + (pr - 0.1) * (nu - nu_lp) / 0.4
        };
    }

    // Entrance-region friction enhancement; Nu keeps its fully developed value.
    let f_dev = f * (1.0 + ld.recip().powf(0.7));
    Ok((nu, f_dev))
}

/// Laminar Nusselt numbers and friction factor. Returns `(Nu_T, Nu_H, f)`.
///
/// Simultaneously developing flow, expressed through the Graetz number.
pub fn pipeflow_laminar(re: f64, pr: f64, ld: f64) -> CoreOptResult<(f64, f64, f64)> {
    check_inputs(re, pr, ld)?;
    let gz = re * pr / ld;
    let x = ld / re;

    let fr = 3.44 / x.sqrt() + (1.25 / (4.0 * x) + 16.0 - 3.44 / x.sqrt()) / (1.0 + 0.00021 * x.powi(-2));
    let f = 4.0 * fr / re;

    let nu_t = 3.66 + ((0.049 + 0.02 / pr) * gz.powf(1.12)) / (1.0 + 0.065 * gz.powf(0.7));
    let nu_h = 4.36 + ((0.1156 + 0.08569 / pr.powf(0.4)) * gz) / (1.0 + 0.1158 * gz.powf(0.6));
    Ok((nu_t, nu_h, f))
}

/// Regime-dispatching correlation.
///
/// Turbulent results report the same Nu for both wall conditions.
pub fn pipeflow_nd(re: f64, pr: f64, ld: f64, relrough: f64) -> CoreOptResult<PipeFlow> {
    check_inputs(re, pr, ld)?;

    if re > RE_TURBULENT_MIN {
        let (nu, f) = pipeflow_turbulent(re, pr, ld, relrough)?;
        return Ok(PipeFlow {
            nusselt_t: nu,
            nusselt_h: nu,
            friction: f,
        });
    }
    if re < RE_LAMINAR_MAX {
        let (nu_t, nu_h, f) = pipeflow_laminar(re, pr, ld)?;
        return Ok(PipeFlow {
            nusselt_t: nu_t,
            nusselt_h: nu_h,
            friction: f,
        });
    }

    let (nu_turb, f_turb) = pipeflow_turbulent(RE_TURBULENT_MIN, pr, ld, relrough)?;
    let (nu_t_lam, nu_h_lam, f_lam) = pipeflow_laminar(RE_LAMINAR_MAX, pr, ld)?;
    let w = (re - RE_LAMINAR_MAX) / (RE_TURBULENT_MIN - RE_LAMINAR_MAX);
    Ok(PipeFlow {
        nusselt_t: nu_t_lam + w * (nu_turb - nu_t_lam),
        nusselt_h: nu_h_lam + w * (nu_turb - nu_h_lam),
        friction: f_lam + w * (f_turb - f_lam),
    })
}
