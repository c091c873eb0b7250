// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Unit system: m, kg, J, W, Pa, K unless a name says otherwise.

use std::f64::consts::PI;

/// Upper Reynolds number of the laminar regime.
pub const RE_LAMINAR_MAX: f64 = 2300.0;

/// Lower Reynolds number of the fully turbulent regime.
pub const RE_TURBULENT_MIN: f64 = 3000.0;

/// Relative roughness above which the rough-pipe friction fit is used.
pub const ROUGH_PIPE_THRESHOLD: f64 = 1e-5;

/// Absolute coolant channel surface roughness [m].
pub const CHANNEL_ROUGHNESS: f64 = 1.5e-6;

/// Axial average over a chopped-cosine flux shape.
pub const AXIAL_AVERAGE_FACTOR: f64 = 2.0 / PI;

/// Radial reflector outer radius as a multiple of the core radius.
pub const REFLECTOR_RADIUS_FACTOR: f64 = 1.05;

/// Reflector (graphite) density [kg/m³].
pub const REFLECTOR_DENSITY: f64 = 1700.0;

/// k-effective a critical configuration must reach (1% margin).
pub const TARGET_KEFF: f64 = 1.01;

/// Grams to kilograms.
pub const G_TO_KG: f64 = 1e-3;

/// Centimetres to metres.
pub const CM_TO_M: f64 = 1e-2;
