//! Coupled thermal-hydraulic channel models and the minimum-mass design sweep.
//!
//! correlations → flow models (pin cell, CO2-cooled core) → solver →
//! parametric sweep.

pub mod co2_core;
pub mod correlations;
pub mod flow;
pub mod pin_cell;
pub mod solver;
pub mod sweep;
