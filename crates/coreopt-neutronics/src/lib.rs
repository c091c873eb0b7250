// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Neutronics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Criticality side of the core design.
//!
//! k-eff tables → critical radius → reflector optimum → core radius
//! correlation; plus the case lists fed to the transport code.

pub mod critical;
pub mod keff;
pub mod sampling;
