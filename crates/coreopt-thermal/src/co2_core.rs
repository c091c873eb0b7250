// ─────────────────────────────────────────────────────────────────────
// CoreOpt — CO2-Cooled Core Flow Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Whole-core channel model driven by fuel fraction.
//!
//! The critical core radius follows from the fuel fraction through a fitted
//! power law, the core length from the aspect ratio. Channels are packed
//! into the non-fuel share of the cross-section. Cladding is not modelled.

use crate::correlations::{pipeflow_nd, PipeFlow};
use crate::flow::{ChannelHydraulics, FlowModel, FlowSummary, MassBreakdown};
use coreopt_types::config::Profile;
use coreopt_types::constants::{
    AXIAL_AVERAGE_FACTOR, CHANNEL_ROUGHNESS, REFLECTOR_DENSITY, REFLECTOR_RADIUS_FACTOR,
};
use coreopt_types::error::{ensure_positive, CoreOptError, CoreOptResult};
use coreopt_types::materials::{
    split_fuel_id, CoolantProperties, CoreRadiusCorrelation, CycleConditions, FuelProperties,
    MaterialTable,
};
use std::f64::consts::PI;

/// Design inputs of one CO2-cooled grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct Co2CoreDesign {
    /// Coolant channel radius [m].
    pub radius: f64,
    /// Core length over core radius [-].
    pub aspect_ratio: f64,
    /// Thermal power [W].
    pub power: f64,
    /// `"<FUEL>-<COOLANT>"`.
    pub fuel_id: String,
}

/// Core cross-section derived from fuel fraction and core radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoreGeometry {
    pub fuel_fraction: f64,
    pub core_radius: f64,
    pub length: f64,
    pub flow_area: f64,
    pub fuel_area: f64,
    pub channels: f64,
    /// Conduction length from fuel to the nearest channel [m].
    pub conduction_length: f64,
    /// Total channel wall area [m²].
    pub wall_area: f64,
}

/// CO2-cooled core flow state. Created fresh for every grid point.
#[derive(Debug, Clone)]
pub struct Co2CoreFlow {
    pub design: Co2CoreDesign,
    fuel: FuelProperties,
    coolant: CoolantProperties,
    correlation: CoreRadiusCorrelation,
    cycle: CycleConditions,
    pub mass_flow: f64,
    pub prandtl: f64,
    pub delta_t: f64,
    pub geometry: CoreGeometry,
    pub velocity: f64,
    pub reynolds: f64,
    pub pipe: PipeFlow,
    pub h: f64,
    pub generation: f64,
}

impl Co2CoreFlow {
    pub fn new(
        design: Co2CoreDesign,
        materials: &MaterialTable,
        cycle: CycleConditions,
    ) -> CoreOptResult<Self> {
        ensure_positive("channel radius", design.radius)?;
        ensure_positive("aspect ratio", design.aspect_ratio)?;
        ensure_positive("power", design.power)?;
        let (fuel_name, coolant_name) = split_fuel_id(&design.fuel_id)?;
        let fuel = materials.fuel(fuel_name)?;
        let coolant = materials.coolant(coolant_name)?;
        let correlation = materials.core_radius(&design.fuel_id)?;

        Ok(Co2CoreFlow {
            mass_flow: cycle.mass_flow(design.power, &coolant),
            prandtl: coolant.prandtl(),
            delta_t: fuel.max_centerline_temperature - coolant.temperature,
            design,
            fuel,
            coolant,
            correlation,
            cycle,
            geometry: CoreGeometry::default(),
            velocity: 0.0,
            reynolds: 0.0,
            pipe: PipeFlow {
                nusselt_t: 0.0,
                nusselt_h: 0.0,
                friction: 0.0,
            },
            h: 0.0,
            generation: 0.0,
        })
    }

    /// Re-derive geometry, flow and generation at fixed fuel fraction and
    /// core radius. `channels` pins the count; otherwise it fills the flow area.
    fn characterize(
        &mut self,
        fuel_fraction: f64,
        core_radius: f64,
        channels: Option<f64>,
    ) -> CoreOptResult<()> {
        if !(fuel_fraction > 0.0 && fuel_fraction < 1.0) {
            return Err(CoreOptError::Domain(format!(
                "fuel fraction must lie in (0, 1), got {fuel_fraction}"
            )));
        }
        ensure_positive("core radius", core_radius)?;
        let r = self.design.radius;
        let cross_section = PI * core_radius.powi(2);
        let flow_area = cross_section * (1.0 - fuel_fraction);
        let fuel_area = cross_section * fuel_fraction;
        let length = self.design.aspect_ratio * core_radius;
        let channels = channels.unwrap_or_else(|| flow_area / (PI * r.powi(2)));
        let geometry = CoreGeometry {
            fuel_fraction,
            core_radius,
            length,
            flow_area,
            fuel_area,
            channels,
            conduction_length: (fuel_area / channels).sqrt() / 2.0,
            wall_area: 2.0 * PI * r * length * channels,
        };

        let d_e = 2.0 * r;
        let velocity = self.mass_flow / flow_area / self.coolant.density;
        let reynolds = self.coolant.density * velocity * d_e / self.coolant.viscosity;
        let pipe = pipeflow_nd(reynolds, self.prandtl, length / d_e, CHANNEL_ROUGHNESS / d_e)?;
        let h = pipe.nusselt_t * self.coolant.conductivity / d_e;

        let r_cond = geometry.conduction_length / (self.fuel.conductivity * geometry.wall_area);
        let r_conv = 1.0 / (h * geometry.wall_area);
        let generation = self.delta_t / (r_cond + r_conv) * AXIAL_AVERAGE_FACTOR;

        self.geometry = geometry;
        self.velocity = velocity;
        self.reynolds = reynolds;
        self.pipe = pipe;
        self.h = h;
        self.generation = generation;
        Ok(())
    }

    /// Pitch-to-diameter ratio of an equivalent hexagonal lattice.
    pub fn pitch_ratio(&self) -> f64 {
        let g = &self.geometry;
        let cell_area = PI * g.core_radius.powi(2) / g.channels;
        let apothem = (cell_area / (2.0 * 3f64.sqrt())).sqrt();
        apothem / (2.0 * self.design.radius)
    }
}

impl FlowModel for Co2CoreFlow {
    fn profile(&self) -> Profile {
        Profile::Co2Cooled
    }

    fn target_power(&self) -> f64 {
        self.design.power
    }

    fn dp_limit(&self) -> f64 {
        self.cycle.dp_limit
    }

    /// `(Q_gen − Q)/Q` at fuel fraction `x`, with the core radius taken
    /// from the critical-radius correlation.
    fn residual(&mut self, x: f64) -> CoreOptResult<f64> {
        let core_radius = self.correlation.radius(x);
        self.characterize(x, core_radius, None)?;
        Ok((self.generation - self.design.power) / self.design.power)
    }

    fn generation(&self) -> f64 {
        self.generation
    }

    fn channel_count(&self) -> f64 {
        self.geometry.channels
    }

    /// More channels at a fixed core radius displace fuel.
    fn set_channel_count(&mut self, n: f64) -> CoreOptResult<()> {
        ensure_positive("channel count", n)?;
        let core_radius = self.geometry.core_radius;
        let fuel_fraction = 1.0 - n * self.design.radius.powi(2) / core_radius.powi(2);
        if fuel_fraction <= 0.0 {
            return Err(CoreOptError::Domain(format!(
                "{n} channels of radius {} m do not fit a {core_radius:.4} m core",
                self.design.radius
            )));
        }
        self.characterize(fuel_fraction, core_radius, Some(n))
    }

    fn hydraulics(&self) -> ChannelHydraulics {
        ChannelHydraulics {
            friction: self.pipe.friction,
            length: self.geometry.length,
            density: self.coolant.density,
            velocity: self.velocity,
            hydraulic_diameter: 2.0 * self.design.radius,
            mass_flow: self.mass_flow,
            channel_area: PI * self.design.radius.powi(2),
        }
    }

    fn compute_mass(&self) -> MassBreakdown {
        let g = &self.geometry;
        MassBreakdown {
            fuel: g.fuel_area * g.length * self.fuel.density,
            clad: 0.0,
            coolant: g.flow_area * g.length * self.coolant.density,
            // Annulus area without the factor π.
            reflector: ((REFLECTOR_RADIUS_FACTOR * g.core_radius).powi(2) - g.core_radius.powi(2))
                * g.length
                * REFLECTOR_DENSITY,
        }
    }

    fn summary(&self) -> FlowSummary {
        let g = &self.geometry;
        FlowSummary {
            radius: self.design.radius,
            pitch_ratio: self.pitch_ratio(),
            aspect_ratio: self.design.aspect_ratio,
            core_radius: g.core_radius,
            core_length: g.length,
            fuel_fraction: g.fuel_fraction,
            masses: self.compute_mass(),
            channels: g.channels,
            pressure_drop: self.hydraulics().pressure_drop(),
            h_bar: self.h,
            q_per_channel: self.generation / g.channels,
            q_bar: self.generation / (g.fuel_area * g.length),
            velocity: self.velocity,
            reynolds: self.reynolds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(radius: f64, aspect_ratio: f64, power: f64) -> Co2CoreFlow {
        Co2CoreFlow::new(
            Co2CoreDesign {
                radius,
                aspect_ratio,
                power,
                fuel_id: "UO2-CO2".to_string(),
            },
            &MaterialTable::co2_cooled(),
            CycleConditions {
                core_delta_t: 200.0,
                dp_limit: 480e3,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_channels_fill_flow_area() {
        let mut f = flow(0.005, 1.5, 2e5);
        f.residual(0.6).unwrap();
        let g = f.geometry;
        let channel_area = g.channels * PI * 0.005f64.powi(2);
        assert!((channel_area - g.flow_area).abs() / g.flow_area < 1e-12);
        assert!((g.fuel_area + g.flow_area - PI * g.core_radius.powi(2)).abs() < 1e-12);
        assert!((g.length - 1.5 * g.core_radius).abs() < 1e-12);
    }

    #[test]
    fn test_core_radius_follows_correlation() {
        let mut f = flow(0.005, 1.5, 2e5);
        f.residual(0.5).unwrap();
        let expected = 0.16271 * 0.5f64.powf(-0.8515);
        assert!((f.geometry.core_radius - expected).abs() < 1e-12);
    }

    #[test]
    fn test_set_channel_count_keeps_core_radius() {
        let mut f = flow(0.005, 1.5, 2e5);
        f.residual(0.6).unwrap();
        let core_r = f.geometry.core_radius;
        let n = f.channel_count().ceil() + 10.0;
        f.set_channel_count(n).unwrap();
        assert!((f.geometry.core_radius - core_r).abs() < 1e-15);
        assert!((f.channel_count() - n).abs() < 1e-9);
        assert!(f.geometry.fuel_fraction < 0.6);
    }

    #[test]
    fn test_set_channel_count_is_exact() {
        let mut f = flow(0.004, 1.0, 2e5);
        f.residual(0.5).unwrap();
        for n in [382.0, 504.0, f.channel_count().ceil()] {
            f.set_channel_count(n).unwrap();
            assert_eq!(f.channel_count(), n);
            assert_eq!(f.summary().channels, n);
            assert_eq!(f.channel_count().fract(), 0.0);
        }
    }

    #[test]
    fn test_too_many_channels_is_domain_error() {
        let mut f = flow(0.005, 1.5, 2e5);
        f.residual(0.6).unwrap();
        let too_many = (f.geometry.core_radius / 0.005).powi(2) + 1.0;
        assert!(matches!(f.set_channel_count(too_many), Err(CoreOptError::Domain(_))));
    }

    #[test]
    fn test_unknown_fuel_pair_rejected() {
        let result = Co2CoreFlow::new(
            Co2CoreDesign {
                radius: 0.005,
                aspect_ratio: 1.0,
                power: 2e5,
                fuel_id: "ThO2-CO2".to_string(),
            },
            &MaterialTable::co2_cooled(),
            CycleConditions {
                core_delta_t: 200.0,
                dp_limit: 480e3,
            },
        );
        assert!(matches!(result, Err(CoreOptError::Config(_))));
    }

    #[test]
    fn test_pitch_ratio_depends_on_flow_share_only() {
        let mut f = flow(0.005, 1.5, 2e5);
        f.residual(0.6).unwrap();
        // Each hexagonal cell holds one channel in 40 % of its area.
        let expected = (PI / (0.4 * 2.0 * 3f64.sqrt())).sqrt() / 2.0;
        assert!((f.pitch_ratio() - expected).abs() < 1e-9, "P/D = {}", f.pitch_ratio());
    }
}
