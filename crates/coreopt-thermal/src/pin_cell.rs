// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Pin-Cell Flow Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hexagonal unit cell with a central coolant channel, cladding and an
//! annulus of fuel. The solve variable is the number of cells.
//!
//! Heat leaves the fuel only through the channel wall (adiabatic cell
//! boundary), so the fuel is treated as an inverted annulus with an
//! equivalent outer radius of equal area.

use crate::correlations::{pipeflow_nd, PipeFlow};
use crate::flow::{ChannelHydraulics, FlowModel, FlowSummary, MassBreakdown};
use coreopt_types::config::Profile;
use coreopt_types::constants::{
    AXIAL_AVERAGE_FACTOR, CHANNEL_ROUGHNESS, REFLECTOR_DENSITY, REFLECTOR_RADIUS_FACTOR,
};
use coreopt_types::error::{ensure_positive, CoreOptError, CoreOptResult};
use coreopt_types::materials::{
    CladProperties, CoolantProperties, CycleConditions, FuelProperties, MaterialTable,
};
use std::f64::consts::PI;

pub const PIN_CELL_FUEL: &str = "UO2";
pub const PIN_CELL_CLAD: &str = "Inconel-718";
pub const PIN_CELL_COOLANT: &str = "CO2";

/// Design inputs of one pin-cell grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinCellDesign {
    /// Coolant channel radius [m].
    pub radius: f64,
    /// Pitch-to-diameter ratio, > 1.
    pub pitch_ratio: f64,
    pub clad_thickness: f64,
    /// Axial core height [m].
    pub axial_height: f64,
    /// Thermal power [W].
    pub power: f64,
}

/// Cross-section geometry of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinCellGeometry {
    pub pitch: f64,
    pub cell_area: f64,
    pub flow_area: f64,
    pub clad_area: f64,
    pub fuel_area: f64,
    /// Cladding outer radius [m].
    pub clad_radius: f64,
    /// Radius of the circle with the cell's area [m].
    pub outer_radius: f64,
    pub hydraulic_diameter: f64,
}

impl PinCellGeometry {
    pub fn new(design: &PinCellDesign) -> CoreOptResult<Self> {
        let r = design.radius;
        // Pitch is measured center to flat (apothem).
        let pitch = design.pitch_ratio * 2.0 * r;
        let cell_area = 2.0 * 3f64.sqrt() * pitch.powi(2);
        let flow_area = PI * r.powi(2);
        let clad_radius = r + design.clad_thickness;
        let clad_area = PI * (clad_radius.powi(2) - r.powi(2));
        let fuel_area = cell_area - PI * clad_radius.powi(2);
        if !(fuel_area > 0.0) {
            return Err(CoreOptError::Domain(format!(
                "no room for fuel: r = {r}, P/D = {}, c = {}",
                design.pitch_ratio, design.clad_thickness
            )));
        }
        Ok(PinCellGeometry {
            pitch,
            cell_area,
            flow_area,
            clad_area,
            fuel_area,
            clad_radius,
            outer_radius: (cell_area / PI).sqrt(),
            hydraulic_diameter: 2.0 * r,
        })
    }
}

/// Per-channel thermal resistances [K/W].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThermalResistances {
    pub fuel: f64,
    pub clad: f64,
    pub convection: f64,
}

impl ThermalResistances {
    pub fn total(&self) -> f64 {
        self.fuel + self.clad + self.convection
    }
}

/// Pin-cell flow state. Created fresh for every grid point.
#[derive(Debug, Clone)]
pub struct PinCellFlow {
    pub design: PinCellDesign,
    pub geometry: PinCellGeometry,
    fuel: FuelProperties,
    clad: CladProperties,
    coolant: CoolantProperties,
    cycle: CycleConditions,
    pub mass_flow: f64,
    pub prandtl: f64,
    /// Fuel centerline to coolant temperature difference [K].
    pub delta_t: f64,
    pub channels: f64,
    pub velocity: f64,
    pub reynolds: f64,
    pub pipe: PipeFlow,
    pub h: f64,
    pub resistances: ThermalResistances,
    pub q_per_channel: f64,
    pub q_bar: f64,
}

impl PinCellFlow {
    pub fn new(
        design: PinCellDesign,
        materials: &MaterialTable,
        cycle: CycleConditions,
    ) -> CoreOptResult<Self> {
        ensure_positive("channel radius", design.radius)?;
        ensure_positive("axial height", design.axial_height)?;
        ensure_positive("power", design.power)?;
        if design.pitch_ratio <= 1.0 {
            return Err(CoreOptError::Config(format!(
                "pitch ratio must exceed 1, got {}",
                design.pitch_ratio
            )));
        }
        if !(design.clad_thickness >= 0.0) {
            return Err(CoreOptError::Domain(
                "cladding thickness must be >= 0".to_string(),
            ));
        }

        let geometry = PinCellGeometry::new(&design)?;
        let fuel = materials.fuel(PIN_CELL_FUEL)?;
        let clad = materials.clad(PIN_CELL_CLAD)?;
        let coolant = materials.coolant(PIN_CELL_COOLANT)?;

        let mut flow = PinCellFlow {
            design,
            geometry,
            fuel,
            clad,
            coolant,
            cycle,
            mass_flow: cycle.mass_flow(design.power, &coolant),
            prandtl: coolant.prandtl(),
            delta_t: fuel.max_centerline_temperature - coolant.temperature,
            channels: 1.0,
            velocity: 0.0,
            reynolds: 0.0,
            pipe: PipeFlow {
                nusselt_t: 0.0,
                nusselt_h: 0.0,
                friction: 0.0,
            },
            h: 0.0,
            resistances: ThermalResistances::default(),
            q_per_channel: 0.0,
            q_bar: 0.0,
        };
        flow.characterize(1.0)?;
        Ok(flow)
    }

    /// Re-derive flow and generation for `n` channels.
    fn characterize(&mut self, n: f64) -> CoreOptResult<()> {
        ensure_positive("channel count", n)?;
        let g = &self.geometry;
        let length = self.design.axial_height;

        let velocity = self.mass_flow / (n * g.flow_area * self.coolant.density);
        let reynolds = self.coolant.density * velocity * g.hydraulic_diameter / self.coolant.viscosity;
        let pipe = pipeflow_nd(
            reynolds,
            self.prandtl,
            length / g.hydraulic_diameter,
            CHANNEL_ROUGHNESS / g.hydraulic_diameter,
        )?;
        let h = pipe.nusselt_t * self.coolant.conductivity / g.hydraulic_diameter;

        let (ri, ro) = (g.clad_radius, g.outer_radius);
        let annulus = ro.powi(2) - ri.powi(2);
        let resistances = ThermalResistances {
            fuel: (2.0 * ro.powi(2) * (ro / ri).ln() - annulus)
                / (4.0 * PI * self.fuel.conductivity * annulus * length),
            clad: (ri / self.design.radius).ln() / (2.0 * PI * self.clad.conductivity * length),
            convection: 1.0 / (h * 2.0 * PI * self.design.radius * length),
        };
        let q_per_channel = self.delta_t / resistances.total() * AXIAL_AVERAGE_FACTOR;

        self.channels = n;
        self.velocity = velocity;
        self.reynolds = reynolds;
        self.pipe = pipe;
        self.h = h;
        self.resistances = resistances;
        self.q_per_channel = q_per_channel;
        self.q_bar = q_per_channel / (g.fuel_area * length);
        Ok(())
    }

    /// Radius of the cylinder holding all cells [m].
    pub fn core_radius(&self) -> f64 {
        (self.channels * self.geometry.cell_area / PI).sqrt()
    }
}

impl FlowModel for PinCellFlow {
    fn profile(&self) -> Profile {
        Profile::PinCell
    }

    fn target_power(&self) -> f64 {
        self.design.power
    }

    fn dp_limit(&self) -> f64 {
        self.cycle.dp_limit
    }

    /// `1 − Q/Q_gen` at `x` channels.
    fn residual(&mut self, x: f64) -> CoreOptResult<f64> {
        self.characterize(x)?;
        Ok(1.0 - self.design.power / self.generation())
    }

    fn generation(&self) -> f64 {
        self.channels * self.q_per_channel
    }

    fn channel_count(&self) -> f64 {
        self.channels
    }

    fn set_channel_count(&mut self, n: f64) -> CoreOptResult<()> {
        self.characterize(n)
    }

    fn hydraulics(&self) -> ChannelHydraulics {
        ChannelHydraulics {
            friction: self.pipe.friction,
            length: self.design.axial_height,
            density: self.coolant.density,
            velocity: self.velocity,
            hydraulic_diameter: self.geometry.hydraulic_diameter,
            mass_flow: self.mass_flow,
            channel_area: self.geometry.flow_area,
        }
    }

    fn compute_mass(&self) -> MassBreakdown {
        let g = &self.geometry;
        let volume = |area: f64| self.channels * area * self.design.axial_height;
        let core_r = self.core_radius();
        MassBreakdown {
            fuel: volume(g.fuel_area) * self.fuel.density,
            clad: volume(g.clad_area) * self.clad.density,
            coolant: volume(g.flow_area) * self.coolant.density,
            reflector: PI
                * ((REFLECTOR_RADIUS_FACTOR * core_r).powi(2) - core_r.powi(2))
                * self.design.axial_height
                * REFLECTOR_DENSITY,
        }
    }

    fn summary(&self) -> FlowSummary {
        let core_radius = self.core_radius();
        FlowSummary {
            radius: self.design.radius,
            pitch_ratio: self.design.pitch_ratio,
            aspect_ratio: self.design.axial_height / core_radius,
            core_radius,
            core_length: self.design.axial_height,
            fuel_fraction: self.geometry.fuel_area / self.geometry.cell_area,
            masses: self.compute_mass(),
            channels: self.channels,
            pressure_drop: self.hydraulics().pressure_drop(),
            h_bar: self.h,
            q_per_channel: self.q_per_channel,
            q_bar: self.q_bar,
            velocity: self.velocity,
            reynolds: self.reynolds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_design() -> PinCellDesign {
        PinCellDesign {
            radius: 0.006,
            pitch_ratio: 1.1,
            clad_thickness: 0.001,
            axial_height: 2.0,
            power: 200_000.0,
        }
    }

    fn cycle() -> CycleConditions {
        CycleConditions {
            core_delta_t: 300.0,
            dp_limit: 15e3,
        }
    }

    #[test]
    fn test_geometry_areas_partition_cell() {
        let g = PinCellGeometry::new(&reference_design()).unwrap();
        let sum = g.fuel_area + g.clad_area + g.flow_area;
        assert!((sum - g.cell_area).abs() < 1e-15, "{sum} vs {}", g.cell_area);
        assert!((g.pitch - 0.0132).abs() < 1e-15);
    }

    #[test]
    fn test_thick_cladding_leaves_no_fuel() {
        let mut d = reference_design();
        d.clad_thickness = 0.01;
        assert!(matches!(
            PinCellFlow::new(d, &MaterialTable::pin_cell(), cycle()),
            Err(CoreOptError::Domain(_))
        ));
    }

    #[test]
    fn test_pitch_ratio_at_one_rejected() {
        let mut d = reference_design();
        d.pitch_ratio = 1.0;
        assert!(matches!(
            PinCellFlow::new(d, &MaterialTable::pin_cell(), cycle()),
            Err(CoreOptError::Config(_))
        ));
    }

    #[test]
    fn test_more_channels_more_generation() {
        let mut flow = PinCellFlow::new(reference_design(), &MaterialTable::pin_cell(), cycle()).unwrap();
        flow.set_channel_count(4.0).unwrap();
        let g4 = flow.generation();
        flow.set_channel_count(8.0).unwrap();
        let g8 = flow.generation();
        assert!(g8 > g4, "{g8} <= {g4}");
    }

    #[test]
    fn test_residual_sign_change_brackets_solution() {
        let mut flow = PinCellFlow::new(reference_design(), &MaterialTable::pin_cell(), cycle()).unwrap();
        let low = flow.residual(2.0).unwrap();
        let high = flow.residual(20.0).unwrap();
        assert!(low < 0.0 && high > 0.0, "low = {low}, high = {high}");
    }

    #[test]
    fn test_velocity_carries_mass_flow() {
        let mut flow = PinCellFlow::new(reference_design(), &MaterialTable::pin_cell(), cycle()).unwrap();
        flow.set_channel_count(6.0).unwrap();
        let carried = flow.velocity * 6.0 * flow.geometry.flow_area * 79.1;
        assert!((carried - flow.mass_flow).abs() < 1e-12);
    }
}
