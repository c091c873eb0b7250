// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Materials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Read-only material property tables.
//!
//! The two design profiles carry their own constant sets; they are kept as
//! separate tables rather than merged.

use crate::error::{CoreOptError, CoreOptResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Solid fuel properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelProperties {
    /// Density [kg/m³].
    pub density: f64,
    /// Thermal conductivity [W/(m·K)].
    pub conductivity: f64,
    /// Maximum allowable centerline temperature [K].
    pub max_centerline_temperature: f64,
}

/// Cladding properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CladProperties {
    /// Density [kg/m³].
    pub density: f64,
    /// Thermal conductivity [W/(m·K)].
    pub conductivity: f64,
}

/// Coolant properties at the representative bulk temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoolantProperties {
    /// Density [kg/m³].
    pub density: f64,
    /// Thermal conductivity [W/(m·K)].
    pub conductivity: f64,
    /// Dynamic viscosity [Pa·s].
    pub viscosity: f64,
    /// Specific heat [J/(kg·K)].
    pub specific_heat: f64,
    /// Bulk temperature [K].
    pub temperature: f64,
}

impl CoolantProperties {
    pub fn prandtl(&self) -> f64 {
        self.specific_heat * self.viscosity / self.conductivity
    }
}

/// Critical core radius fit `r = coefficient · ff^exponent` [m].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreRadiusCorrelation {
    pub coefficient: f64,
    pub exponent: f64,
}

impl CoreRadiusCorrelation {
    pub fn radius(&self, fuel_frac: f64) -> f64 {
        self.coefficient * fuel_frac.powf(self.exponent)
    }
}

/// Power-cycle constraints imposed on the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleConditions {
    /// Coolant temperature rise across the core [K].
    pub core_delta_t: f64,
    /// Allowable core pressure drop [Pa].
    pub dp_limit: f64,
}

impl CycleConditions {
    /// Coolant mass flow needed to carry `power` [W] at this temperature rise.
    pub fn mass_flow(&self, power: f64, coolant: &CoolantProperties) -> f64 {
        power / (coolant.specific_heat * self.core_delta_t)
    }
}

/// Named material lookup for one design profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialTable {
    pub fuels: BTreeMap<String, FuelProperties>,
    pub clads: BTreeMap<String, CladProperties>,
    pub coolants: BTreeMap<String, CoolantProperties>,
    /// Critical radius fits keyed by `"<FUEL>-<COOLANT>"`.
    #[serde(default)]
    pub core_radius: BTreeMap<String, CoreRadiusCorrelation>,
}

impl MaterialTable {
    /// Constants of the fuel-fraction (CO2-cooled) model.
    pub fn co2_cooled() -> Self {
        let mut fuels = BTreeMap::new();
        fuels.insert(
            "UO2".to_string(),
            FuelProperties {
                density: 10_970.0,
                conductivity: 3.0,
                max_centerline_temperature: 1700.0,
            },
        );
        fuels.insert(
            "UW".to_string(),
            FuelProperties {
                density: 17_000.0,
                conductivity: 45.0,
                max_centerline_temperature: 1800.0,
            },
        );

        let mut coolants = BTreeMap::new();
        coolants.insert(
            "CO2".to_string(),
            CoolantProperties {
                density: 252.638,
                conductivity: 0.055,
                viscosity: 3.0e-5,
                specific_heat: 1650.0,
                temperature: 600.0,
            },
        );
        coolants.insert(
            "H2O".to_string(),
            CoolantProperties {
                density: 141.236,
                conductivity: 0.1,
                viscosity: 3.2e-5,
                specific_heat: 7000.0,
                temperature: 680.0,
            },
        );

        let mut core_radius = BTreeMap::new();
        for (key, coefficient, exponent) in [
            ("UO2-CO2", 0.16271, -0.8515),
            ("UO2-H2O", 0.1706, -0.61361),
            ("UW-CO2", 0.15385, -0.8309),
            ("UW-H2O", 0.16270, -0.6487),
        ] {
            core_radius.insert(
                key.to_string(),
                CoreRadiusCorrelation {
                    coefficient,
                    exponent,
                },
            );
        }

        MaterialTable {
            fuels,
            clads: BTreeMap::new(),
            coolants,
            core_radius,
        }
    }

    /// Constants of the pin-cell (channel-count) model.
    pub fn pin_cell() -> Self {
        let mut fuels = BTreeMap::new();
        fuels.insert(
            "UO2".to_string(),
            FuelProperties {
                density: 10_970.0,
                conductivity: 3.0,
                max_centerline_temperature: 1847.0,
            },
        );

        let mut clads = BTreeMap::new();
        clads.insert(
            "Inconel-718".to_string(),
            CladProperties {
                density: 8190.0,
                conductivity: 25.0,
            },
        );

        let mut coolants = BTreeMap::new();
        coolants.insert(
            "CO2".to_string(),
            CoolantProperties {
                density: 79.1,
                conductivity: 0.062,
                viscosity: 3.9e-5,
                specific_heat: 1240.0,
                temperature: 900.0,
            },
        );

        MaterialTable {
            fuels,
            clads,
            coolants,
            core_radius: BTreeMap::new(),
        }
    }

    pub fn fuel(&self, name: &str) -> CoreOptResult<FuelProperties> {
        self.fuels
            .get(name)
            .copied()
            .ok_or_else(|| CoreOptError::Config(format!("unknown fuel material '{name}'")))
    }

    pub fn clad(&self, name: &str) -> CoreOptResult<CladProperties> {
        self.clads
            .get(name)
            .copied()
            .ok_or_else(|| CoreOptError::Config(format!("unknown clad material '{name}'")))
    }

    pub fn coolant(&self, name: &str) -> CoreOptResult<CoolantProperties> {
        self.coolants
            .get(name)
            .copied()
            .ok_or_else(|| CoreOptError::Config(format!("unknown coolant '{name}'")))
    }

    pub fn core_radius(&self, fuel_id: &str) -> CoreOptResult<CoreRadiusCorrelation> {
        self.core_radius.get(fuel_id).copied().ok_or_else(|| {
            CoreOptError::Config(format!("no critical radius fit for '{fuel_id}'"))
        })
    }
}

/// Split a `"<FUEL>-<COOLANT>"` identifier.
pub fn split_fuel_id(fuel_id: &str) -> CoreOptResult<(&str, &str)> {
    match fuel_id.split_once('-') {
        Some((fuel, coolant)) if !fuel.is_empty() && !coolant.is_empty() => Ok((fuel, coolant)),
        _ => Err(CoreOptError::Config(format!(
            "fuel id '{fuel_id}' must look like 'UO2-CO2'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_co2_prandtl_near_unity() {
        let table = MaterialTable::co2_cooled();
        let pr = table.coolant("CO2").unwrap().prandtl();
        assert!((pr - 0.9).abs() < 1e-12, "Pr = {pr}");
    }

    #[test]
    fn test_unknown_material_is_config_error() {
        let table = MaterialTable::pin_cell();
        assert!(matches!(table.fuel("ThO2"), Err(CoreOptError::Config(_))));
        assert!(matches!(table.coolant("He"), Err(CoreOptError::Config(_))));
    }

    #[test]
    fn test_core_radius_correlation_at_unit_fraction() {
        let table = MaterialTable::co2_cooled();
        let fit = table.core_radius("UO2-CO2").unwrap();
        assert!((fit.radius(1.0) - 0.16271).abs() < 1e-12);
        // Smaller fuel fraction needs a larger critical core.
        assert!(fit.radius(0.5) > fit.radius(0.9));
    }

    #[test]
    fn test_split_fuel_id() {
        assert_eq!(split_fuel_id("UW-H2O").unwrap(), ("UW", "H2O"));
        assert!(split_fuel_id("UO2").is_err());
        assert!(split_fuel_id("-CO2").is_err());
    }

    #[test]
    fn test_mass_flow_carries_power() {
        let table = MaterialTable::pin_cell();
        let co2 = table.coolant("CO2").unwrap();
        let cycle = CycleConditions {
            core_delta_t: 300.0,
            dp_limit: 15e3,
        };
        let m_dot = cycle.mass_flow(200_000.0, &co2);
        assert!((m_dot * co2.specific_heat * 300.0 - 200_000.0).abs() < 1e-6);
    }
}
