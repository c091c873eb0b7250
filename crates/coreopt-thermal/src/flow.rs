// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Flow Model Interface
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shared interface of the coupled thermal-hydraulic channel models.

use coreopt_types::config::Profile;
use coreopt_types::error::CoreOptResult;

/// Hydraulic state needed by the pressure-drop constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelHydraulics {
    /// Darcy friction factor.
    pub friction: f64,
    /// Channel length [m].
    pub length: f64,
    /// Coolant density [kg/m³].
    pub density: f64,
    /// Mean coolant velocity [m/s].
    pub velocity: f64,
    /// Hydraulic diameter [m].
    pub hydraulic_diameter: f64,
    /// Total coolant mass flow [kg/s].
    pub mass_flow: f64,
    /// Flow area of one channel [m²].
    pub channel_area: f64,
}

impl ChannelHydraulics {
    /// Darcy-Weisbach pressure drop [Pa].
    pub fn pressure_drop(&self) -> f64 {
        self.friction * self.length * self.density * self.velocity.powi(2)
            / (2.0 * self.hydraulic_diameter)
    }

    /// Velocity at which the pressure drop equals `limit` [m/s].
    pub fn velocity_for_limit(&self, limit: f64) -> f64 {
        (2.0 * self.hydraulic_diameter * limit / (self.friction * self.length * self.density))
            .sqrt()
    }

    /// Integer channel count that brings the velocity down to the limit
    /// velocity at the current friction factor.
    pub fn channels_for_limit(&self, limit: f64) -> f64 {
        let v_req = self.velocity_for_limit(limit);
        (self.mass_flow / (self.channel_area * self.density * v_req)).ceil()
    }
}

/// Component masses of a design [kg].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassBreakdown {
    pub fuel: f64,
    pub clad: f64,
    pub coolant: f64,
    pub reflector: f64,
}

impl MassBreakdown {
    pub fn total(&self) -> f64 {
        self.fuel + self.clad + self.coolant + self.reflector
    }
}

/// Result record of one solved design point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSummary {
    /// Coolant channel radius [m].
    pub radius: f64,
    /// Pitch-to-diameter ratio [-].
    pub pitch_ratio: f64,
    /// Core length over core radius [-].
    pub aspect_ratio: f64,
    /// Core radius [m].
    pub core_radius: f64,
    /// Core length [m].
    pub core_length: f64,
    /// Fuel share of the core cross-section [-].
    pub fuel_fraction: f64,
    pub masses: MassBreakdown,
    pub channels: f64,
    /// Core pressure drop [Pa].
    pub pressure_drop: f64,
    /// Heat-transfer coefficient [W/(m²·K)].
    pub h_bar: f64,
    /// Heat generation per channel [W].
    pub q_per_channel: f64,
    /// Average volumetric generation in the fuel [W/m³].
    pub q_bar: f64,
    /// Coolant velocity [m/s].
    pub velocity: f64,
    pub reynolds: f64,
}

impl FlowSummary {
    pub fn mass(&self) -> f64 {
        self.masses.total()
    }
}

/// A channel model that can be driven by the channel-count solver and the
/// pressure-drop corrector.
///
/// Every setter re-derives geometry, flow and generation together, so the
/// state is always self-consistent after a call returns `Ok`.
pub trait FlowModel {
    fn profile(&self) -> Profile;

    /// Thermal power the core must carry [W].
    fn target_power(&self) -> f64;

    /// Allowable core pressure drop [Pa].
    fn dp_limit(&self) -> f64;

    /// Set the solve variable and return the generation residual.
    fn residual(&mut self, x: f64) -> CoreOptResult<f64>;

    /// Total heat generation at the current state [W].
    fn generation(&self) -> f64;

    fn channel_count(&self) -> f64;

    /// Fix the channel count and re-characterize.
    fn set_channel_count(&mut self, n: f64) -> CoreOptResult<()>;

    fn hydraulics(&self) -> ChannelHydraulics;

    fn compute_mass(&self) -> MassBreakdown;

    fn summary(&self) -> FlowSummary;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChannelHydraulics {
        ChannelHydraulics {
            friction: 0.02,
            length: 2.0,
            density: 79.1,
            velocity: 10.0,
            hydraulic_diameter: 0.01,
            mass_flow: 0.5,
            channel_area: std::f64::consts::PI * 0.005f64.powi(2),
        }
    }

    #[test]
    fn test_darcy_weisbach() {
        let h = sample();
        let dp = h.pressure_drop();
        assert!((dp - 0.02 * 2.0 * 79.1 * 100.0 / 0.02).abs() < 1e-9, "dp = {dp}");
    }

    #[test]
    fn test_limit_velocity_reproduces_limit() {
        let mut h = sample();
        let limit = 5_000.0;
        h.velocity = h.velocity_for_limit(limit);
        assert!((h.pressure_drop() - limit).abs() < 1e-6);
    }

    #[test]
    fn test_channels_for_limit_is_integer() {
        let n = sample().channels_for_limit(5_000.0);
        assert_eq!(n, n.floor());
        assert!(n >= 1.0);
    }

    #[test]
    fn test_mass_total() {
        let m = MassBreakdown {
            fuel: 1.0,
            clad: 2.0,
            coolant: 0.5,
            reflector: 4.0,
        };
        assert!((m.total() - 7.5).abs() < 1e-15);
    }
}
