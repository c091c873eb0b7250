// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreOptError {
    /// Correlation or geometry input outside its valid range.
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Solver failed to converge after {evaluations} evaluations (residual {residual:.3e}): {message}")]
    Convergence {
        evaluations: usize,
        residual: f64,
        message: String,
    },

    #[error("Pressure-drop constraint not met after {iterations} corrections: dp = {pressure_drop:.1} Pa > limit {limit:.1} Pa")]
    NonConvergentConstraint {
        iterations: usize,
        pressure_drop: f64,
        limit: f64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CoreOptResult<T> = Result<T, CoreOptError>;

/// Reject non-finite or non-positive inputs with a domain error.
pub fn ensure_positive(name: &str, value: f64) -> CoreOptResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CoreOptError::Domain(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}
