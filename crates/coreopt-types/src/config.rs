// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{CoreOptError, CoreOptResult};
use crate::materials::{split_fuel_id, CycleConditions};
use serde::{Deserialize, Serialize};

/// Which flow model parameterization a sweep uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Hexagonal pin cell swept over channel diameter and pitch ratio;
    /// the solver finds the channel count.
    PinCell,
    /// Whole-core model swept over channel radius and aspect ratio;
    /// the solver finds the fuel fraction.
    Co2Cooled,
}

impl Profile {
    /// Human label of the second sweep axis.
    pub fn second_axis(&self) -> &'static str {
        match self {
            Profile::PinCell => "pitch-to-diameter ratio",
            Profile::Co2Cooled => "aspect ratio",
        }
    }
}

/// Spacing of trial points across the solver bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log,
}

/// Closed parameter interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub lower: f64,
    pub upper: f64,
}

impl ParamRange {
    pub fn new(lower: f64, upper: f64) -> Self {
        ParamRange { lower, upper }
    }

    fn validate(&self, name: &str) -> CoreOptResult<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(CoreOptError::Config(format!(
                "{name} bounds must be finite"
            )));
        }
        if self.lower >= self.upper {
            return Err(CoreOptError::Config(format!(
                "{name} lower bound {} must be below upper bound {}",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// Channel-count solver and pressure-drop corrector settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Bounds of the solve variable (fuel fraction or channel count).
    pub bounds: ParamRange,
    pub scale: AxisScale,
    /// Residual samples used to bracket the root; 0 disables bracketing.
    pub bracket_samples: usize,
    /// Absolute tolerance on the solve variable.
    pub xatol: f64,
    pub max_evaluations: usize,
    /// Allowed |Q_gen − Q| relative to Q.
    pub power_tolerance: f64,
    pub max_dp_iterations: usize,
}

impl SolverSettings {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::PinCell => SolverSettings {
                bounds: ParamRange::new(1.0, 1e5),
                scale: AxisScale::Log,
                bracket_samples: 40,
                xatol: 1e-3,
                max_evaluations: 500,
                power_tolerance: 1e-3,
                max_dp_iterations: 50,
            },
            Profile::Co2Cooled => SolverSettings {
                bounds: ParamRange::new(0.01, 1.0),
                scale: AxisScale::Linear,
                bracket_samples: 40,
                xatol: 1e-3,
                max_evaluations: 500,
                power_tolerance: 2.5e-2,
                max_dp_iterations: 50,
            },
        }
    }

    pub fn validate(&self) -> CoreOptResult<()> {
        self.bounds.validate("solver")?;
        if self.scale == AxisScale::Log && self.bounds.lower <= 0.0 {
            return Err(CoreOptError::Config(
                "log-scaled solver bounds must be positive".to_string(),
            ));
        }
        if self.bracket_samples == 1 {
            return Err(CoreOptError::Config(
                "bracket_samples must be 0 (disabled) or at least 2".to_string(),
            ));
        }
        if !self.xatol.is_finite() || self.xatol <= 0.0 {
            return Err(CoreOptError::Config("xatol must be finite and > 0".to_string()));
        }
        if self.max_evaluations == 0 || self.max_dp_iterations == 0 {
            return Err(CoreOptError::Config(
                "iteration caps must be at least 1".to_string(),
            ));
        }
        if !self.power_tolerance.is_finite() || self.power_tolerance <= 0.0 {
            return Err(CoreOptError::Config(
                "power_tolerance must be finite and > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aspect-ratio band used to filter the minimum-mass search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatioWindow {
    #[serde(default = "default_ar_min")]
    pub min: f64,
    #[serde(default = "default_ar_max")]
    pub max: f64,
}

fn default_ar_min() -> f64 {
    1.5
}
fn default_ar_max() -> f64 {
    2.5
}

impl Default for AspectRatioWindow {
    fn default() -> Self {
        AspectRatioWindow {
            min: default_ar_min(),
            max: default_ar_max(),
        }
    }
}

impl AspectRatioWindow {
    pub fn admits(&self, aspect_ratio: f64) -> bool {
        aspect_ratio >= self.min && aspect_ratio <= self.max
    }
}

/// Full description of one parametric sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub profile: Profile,
    /// Coolant channel radius range [m].
    pub radius: ParamRange,
    /// Pitch-to-diameter ratio (pin cell) or aspect ratio L/r (CO2 core).
    pub second: ParamRange,
    /// Grid resolution N; the sweep has N² cells.
    pub resolution: usize,
    /// Axial core height [m]. Used by the pin-cell profile.
    #[serde(default = "default_axial_height")]
    pub axial_height: f64,
    /// Cladding thickness [m].
    pub clad_thickness: f64,
    /// Thermal power target [W].
    pub power: f64,
    /// `"<FUEL>-<COOLANT>"` of the CO2-cooled profile.
    #[serde(default = "default_fuel_id")]
    pub fuel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<CycleConditions>,
    /// When set, only designs inside the window compete for minimum mass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_window: Option<AspectRatioWindow>,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_axial_height() -> f64 {
    2.0
}
fn default_fuel_id() -> String {
    "UO2-CO2".to_string()
}
fn default_parallel() -> bool {
    true
}

impl SweepConfig {
    /// Pin-cell sweep over channel diameter and pitch ratio.
    pub fn pin_cell(
        diameters: (f64, f64),
        pitch_ratios: (f64, f64),
        axial_height: f64,
        clad_thickness: f64,
        power: f64,
        resolution: usize,
    ) -> Self {
        SweepConfig {
            profile: Profile::PinCell,
            radius: ParamRange::new(diameters.0 / 2.0, diameters.1 / 2.0),
            second: ParamRange::new(pitch_ratios.0, pitch_ratios.1),
            resolution,
            axial_height,
            clad_thickness,
            power,
            fuel_id: default_fuel_id(),
            solver: None,
            cycle: None,
            aspect_window: None,
            parallel: default_parallel(),
        }
    }

    /// CO2-cooled core sweep over channel radius and aspect ratio.
    pub fn co2_cooled(
        radii: (f64, f64),
        aspect_ratios: (f64, f64),
        clad_thickness: f64,
        power: f64,
        resolution: usize,
        fuel_id: &str,
    ) -> Self {
        SweepConfig {
            profile: Profile::Co2Cooled,
            radius: ParamRange::new(radii.0, radii.1),
            second: ParamRange::new(aspect_ratios.0, aspect_ratios.1),
            resolution,
            axial_height: default_axial_height(),
            clad_thickness,
            power,
            fuel_id: fuel_id.to_string(),
            solver: None,
            cycle: None,
            aspect_window: None,
            parallel: default_parallel(),
        }
    }

    /// Load from JSON file.
    pub fn from_file(path: &str) -> CoreOptResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn solver_settings(&self) -> SolverSettings {
        self.solver
            .unwrap_or_else(|| SolverSettings::for_profile(self.profile))
    }

    pub fn cycle_conditions(&self) -> CycleConditions {
        self.cycle.unwrap_or(match self.profile {
            Profile::PinCell => CycleConditions {
                core_delta_t: 300.0,
                dp_limit: 15e3,
            },
            Profile::Co2Cooled => CycleConditions {
                core_delta_t: 200.0,
                dp_limit: 480e3,
            },
        })
    }

    /// Check every parameter before any computation starts.
    pub fn validate(&self) -> CoreOptResult<()> {
        if self.resolution == 0 {
            return Err(CoreOptError::Config(
                "grid resolution must be at least 1".to_string(),
            ));
        }
        self.radius.validate("channel radius")?;
        if self.radius.lower <= 0.0 {
            return Err(CoreOptError::Config(
                "channel radius must be > 0".to_string(),
            ));
        }
        self.second.validate(self.profile.second_axis())?;

        match self.profile {
            Profile::PinCell => {
                if self.second.lower <= 1.0 {
                    return Err(CoreOptError::Config(
                        "min fuel pitch must be greater than max coolant channel diameter; \
                         set min PD > 1"
                            .to_string(),
                    ));
                }
                if !self.axial_height.is_finite() || self.axial_height <= 0.0 {
                    return Err(CoreOptError::Config(
                        "axial height must be finite and > 0".to_string(),
                    ));
                }
            }
            Profile::Co2Cooled => {
                if self.second.lower <= 0.0 {
                    return Err(CoreOptError::Config(
                        "aspect ratio must be > 0".to_string(),
                    ));
                }
                split_fuel_id(&self.fuel_id)?;
            }
        }

        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(CoreOptError::Config(
                "thermal power must be finite and > 0".to_string(),
            ));
        }
        if !self.clad_thickness.is_finite() || self.clad_thickness < 0.0 {
            return Err(CoreOptError::Config(
                "cladding thickness must be finite and >= 0".to_string(),
            ));
        }

        let cycle = self.cycle_conditions();
        if !(cycle.core_delta_t > 0.0 && cycle.dp_limit > 0.0) {
            return Err(CoreOptError::Config(
                "cycle temperature rise and dp limit must be > 0".to_string(),
            ));
        }
        if let Some(window) = &self.aspect_window {
            if !(window.min < window.max) {
                return Err(CoreOptError::Config(
                    "aspect ratio window min must be below max".to_string(),
                ));
            }
        }
        self.solver_settings().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> SweepConfig {
        SweepConfig::pin_cell((0.01, 0.02), (1.1, 1.5), 2.0, 0.001, 200_000.0, 5)
    }

    #[test]
    fn test_reference_config_is_valid() {
        let cfg = reference();
        cfg.validate().unwrap();
        assert!((cfg.radius.lower - 0.005).abs() < 1e-15);
        assert!((cfg.radius.upper - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_pitch_ratio_at_or_below_one_rejected() {
        for pd_lower in [1.0, 0.8] {
            let cfg = SweepConfig::pin_cell((0.01, 0.02), (pd_lower, 1.5), 2.0, 0.001, 2e5, 5);
            match cfg.validate() {
                Err(CoreOptError::Config(msg)) => assert!(msg.contains("PD > 1"), "{msg}"),
                other => panic!("expected config error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        let cfg = SweepConfig::pin_cell((0.02, 0.01), (1.1, 1.5), 2.0, 0.001, 2e5, 5);
        assert!(matches!(cfg.validate(), Err(CoreOptError::Config(_))));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let cfg = SweepConfig::pin_cell((0.01, 0.02), (1.1, 1.5), 2.0, 0.001, 2e5, 0);
        assert!(matches!(cfg.validate(), Err(CoreOptError::Config(_))));
    }

    #[test]
    fn test_co2_profile_rejects_bad_fuel_id() {
        let cfg = SweepConfig::co2_cooled((0.004, 0.012), (1.0, 2.0), 0.001, 2e5, 4, "UO2");
        assert!(matches!(cfg.validate(), Err(CoreOptError::Config(_))));
    }

    #[test]
    fn test_profile_defaults_differ() {
        let pin = SolverSettings::for_profile(Profile::PinCell);
        let co2 = SolverSettings::for_profile(Profile::Co2Cooled);
        assert_eq!(pin.scale, AxisScale::Log);
        assert_eq!(co2.scale, AxisScale::Linear);
        assert!((co2.bounds.lower - 0.01).abs() < 1e-15);
        assert!((co2.bounds.upper - 1.0).abs() < 1e-15);
        assert!((co2.xatol - 1e-3).abs() < 1e-15);
    }

    #[test]
    fn test_json_defaults_fill_optional_fields() {
        let json = r#"{
            "profile": "pin-cell",
            "radius": {"lower": 0.005, "upper": 0.01},
            "second": {"lower": 1.1, "upper": 1.5},
            "resolution": 3,
            "clad_thickness": 0.001,
            "power": 200000.0,
            "aspect_window": {}
        }"#;
        let cfg: SweepConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.profile, Profile::PinCell);
        assert!((cfg.axial_height - 2.0).abs() < 1e-15);
        assert!(cfg.parallel);
        assert_eq!(cfg.aspect_window, Some(AspectRatioWindow::default()));
        assert!(cfg.solver.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn test_roundtrip_serialization() {
        let mut cfg = reference();
        cfg.cycle = Some(CycleConditions {
            core_delta_t: 250.0,
            dp_limit: 20e3,
        });
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: SweepConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg2.profile, cfg.profile);
        assert_eq!(cfg2.resolution, cfg.resolution);
        assert_eq!(cfg2.cycle, cfg.cycle);
        assert_eq!(cfg2.radius, cfg.radius);
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let result = SweepConfig::from_file("/nonexistent/coreopt_sweep.json");
        assert!(matches!(result, Err(CoreOptError::Io(_))));
    }
}
