// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Parametric Sweep
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Grid sweep over channel radius × second axis, minimum-mass reduction and
//! CSV persistence of the result table.

use crate::co2_core::{Co2CoreDesign, Co2CoreFlow};
use crate::flow::FlowSummary;
use crate::pin_cell::{PinCellDesign, PinCellFlow};
use crate::solver::evaluate_design;
use coreopt_types::config::{AspectRatioWindow, Profile, SweepConfig};
use coreopt_types::error::{CoreOptError, CoreOptResult};
use coreopt_types::materials::MaterialTable;
use coreopt_types::state::SweepGrid;
use ndarray::Array2;
use rayon::prelude::*;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Result of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    Solved(FlowSummary),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    /// Flat index, `i_radius · N + i_second`.
    pub index: usize,
    pub i_radius: usize,
    pub i_second: usize,
    pub radius: f64,
    pub second: f64,
    pub outcome: CellOutcome,
}

impl SweepRow {
    pub fn summary(&self) -> Option<&FlowSummary> {
        match &self.outcome {
            CellOutcome::Solved(s) => Some(s),
            CellOutcome::Failed { .. } => None,
        }
    }
}

/// Per-cell quantities available for plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Mass,
    Channels,
    PressureDrop,
    HeatTransferCoefficient,
    GenerationPerChannel,
    VolumetricGeneration,
    Velocity,
    AspectRatio,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Mass,
        Metric::Channels,
        Metric::PressureDrop,
        Metric::HeatTransferCoefficient,
        Metric::GenerationPerChannel,
        Metric::VolumetricGeneration,
        Metric::Velocity,
        Metric::AspectRatio,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::Mass => "mass",
            Metric::Channels => "N_channels",
            Metric::PressureDrop => "dp",
            Metric::HeatTransferCoefficient => "h_bar",
            Metric::GenerationPerChannel => "q_per_channel",
            Metric::VolumetricGeneration => "q_bar",
            Metric::Velocity => "v",
            Metric::AspectRatio => "AR",
        }
    }

    pub fn value(&self, s: &FlowSummary) -> f64 {
        match self {
            Metric::Mass => s.mass(),
            Metric::Channels => s.channels,
            Metric::PressureDrop => s.pressure_drop,
            Metric::HeatTransferCoefficient => s.h_bar,
            Metric::GenerationPerChannel => s.q_per_channel,
            Metric::VolumetricGeneration => s.q_bar,
            Metric::Velocity => s.velocity,
            Metric::AspectRatio => s.aspect_ratio,
        }
    }
}

impl FromStr for Metric {
    type Err = CoreOptError;

    fn from_str(key: &str) -> CoreOptResult<Self> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = Metric::ALL.iter().map(|m| m.key()).collect();
                CoreOptError::Config(format!(
                    "unknown plot key '{key}', expected one of {}",
                    known.join(", ")
                ))
            })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lightest solved design of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumMass {
    pub profile: Profile,
    pub index: usize,
    pub radius: f64,
    pub second: f64,
    pub summary: FlowSummary,
}

impl MinimumMass {
    pub fn mass(&self) -> f64 {
        self.summary.mass()
    }
}

impl fmt::Display for MinimumMass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Min reactor mass (m = {:.3}[kg]) occurs at r = {:.5}[m]",
            self.mass(),
            self.radius
        )?;
        match self.profile {
            // Pin-cell sweeps are specified by channel diameter.
            Profile::PinCell => write!(
                f,
                " (D = {:.5}[m]) & PD = {:.4}[-].",
                2.0 * self.radius,
                self.second
            ),
            Profile::Co2Cooled => write!(f, " & AR = {:.4}[-].", self.second),
        }
    }
}

/// Row-major table of every grid cell.
#[derive(Debug, Clone)]
pub struct SweepTable {
    pub profile: Profile,
    grid: SweepGrid,
    rows: Vec<SweepRow>,
}

impl SweepTable {
    pub fn grid(&self) -> &SweepGrid {
        &self.grid
    }

    pub fn rows(&self) -> &[SweepRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn solved(&self) -> impl Iterator<Item = (&SweepRow, &FlowSummary)> {
        self.rows.iter().filter_map(|r| r.summary().map(|s| (r, s)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&SweepRow, &str)> {
        self.rows.iter().filter_map(|r| match &r.outcome {
            CellOutcome::Failed { error } => Some((r, error.as_str())),
            CellOutcome::Solved(_) => None,
        })
    }

    /// First strictly smallest total mass in table order, optionally only
    /// among designs whose aspect ratio lies inside `window`.
    pub fn minimum_mass(&self, window: Option<&AspectRatioWindow>) -> Option<MinimumMass> {
        let mut best: Option<(&SweepRow, &FlowSummary)> = None;
        for (row, summary) in self.solved() {
            if window.is_some_and(|w| !w.admits(summary.aspect_ratio)) {
                continue;
            }
            if best.is_none_or(|(_, b)| summary.mass() < b.mass()) {
                best = Some((row, summary));
            }
        }
        best.map(|(row, summary)| MinimumMass {
            profile: self.profile,
            index: row.index,
            radius: row.radius,
            second: row.second,
            summary: *summary,
        })
    }

    /// Metric per row in table order, NaN for failed cells.
    pub fn metric(&self, metric: Metric) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.summary().map_or(f64::NAN, |s| metric.value(s)))
            .collect()
    }

    /// Metric laid out as `[i_radius, i_second]`.
    pub fn metric_grid(&self, metric: Metric) -> Array2<f64> {
        let n = self.grid.n;
        let values = self.metric(metric);
        Array2::from_shape_fn((n, n), |(i, j)| values[i * n + j])
    }

    pub fn write_csv(&self, path: &Path) -> CoreOptResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "r,pd,AR,mass,N_channels,dp,h_bar,q_per_channel,q_bar,v")?;
        for row in &self.rows {
            match row.summary() {
                Some(s) => writeln!(
                    writer,
                    "{},{},{},{},{},{},{},{},{},{}",
                    s.radius,
                    s.pitch_ratio,
                    s.aspect_ratio,
                    s.mass(),
                    s.channels,
                    s.pressure_drop,
                    s.h_bar,
                    s.q_per_channel,
                    s.q_bar,
                    s.velocity
                )?,
                None => writeln!(
                    writer,
                    "{},{},NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN",
                    row.radius,
                    self.pitch_column(row)
                )?,
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Pitch column of a failed row: the grid value on the pin-cell profile.
    fn pitch_column(&self, row: &SweepRow) -> f64 {
        match self.profile {
            Profile::PinCell => row.second,
            Profile::Co2Cooled => f64::NAN,
        }
    }

    /// N×N metric grid with the second-axis values as header and the
    /// radius leading each row.
    pub fn write_metric_grid(&self, path: &Path, metric: Metric) -> CoreOptResult<()> {
        let grid = self.metric_grid(metric);
        let mut writer = BufWriter::new(File::create(path)?);
        let header: Vec<String> = self.grid.second.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}\\r,{}", metric.key(), header.join(","))?;
        for (i, r) in self.grid.radius.iter().enumerate() {
            let cells: Vec<String> = grid.row(i).iter().map(|v| v.to_string()).collect();
            writeln!(writer, "{},{}", r, cells.join(","))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// A validated sweep ready to run.
#[derive(Debug, Clone)]
pub struct ParametricSweep {
    config: SweepConfig,
    materials: MaterialTable,
}

impl ParametricSweep {
    /// Validates the configuration before anything is computed.
    pub fn new(config: SweepConfig) -> CoreOptResult<Self> {
        config.validate()?;
        let materials = match config.profile {
            Profile::PinCell => MaterialTable::pin_cell(),
            Profile::Co2Cooled => MaterialTable::co2_cooled(),
        };
        Self::with_materials(config, materials)
    }

    pub fn with_materials(config: SweepConfig, materials: MaterialTable) -> CoreOptResult<Self> {
        config.validate()?;
        if config.profile == Profile::Co2Cooled {
            // Fail on unknown fuel pairs up front rather than once per cell.
            materials.core_radius(&config.fuel_id)?;
        }
        Ok(ParametricSweep { config, materials })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn grid(&self) -> SweepGrid {
        SweepGrid::new(self.config.resolution, &self.config.radius, &self.config.second)
    }

    /// Solve one design point from scratch.
    pub fn evaluate_cell(&self, radius: f64, second: f64) -> CoreOptResult<FlowSummary> {
        let cfg = &self.config;
        let settings = cfg.solver_settings();
        let cycle = cfg.cycle_conditions();
        match cfg.profile {
            Profile::PinCell => {
                let design = PinCellDesign {
                    radius,
                    pitch_ratio: second,
                    clad_thickness: cfg.clad_thickness,
                    axial_height: cfg.axial_height,
                    power: cfg.power,
                };
                let mut flow = PinCellFlow::new(design, &self.materials, cycle)?;
                evaluate_design(&mut flow, &settings)
            }
            Profile::Co2Cooled => {
                let design = Co2CoreDesign {
                    radius,
                    aspect_ratio: second,
                    power: cfg.power,
                    fuel_id: cfg.fuel_id.clone(),
                };
                let mut flow = Co2CoreFlow::new(design, &self.materials, cycle)?;
                evaluate_design(&mut flow, &settings)
            }
        }
    }

    fn evaluate_row(&self, grid: &SweepGrid, index: usize) -> SweepRow {
        let (i_radius, i_second) = grid.cell_indices(index);
        let (radius, second) = grid.point(index);
        let outcome = match self.evaluate_cell(radius, second) {
            Ok(summary) => {
                debug!(radius, second, mass = summary.mass(), channels = summary.channels, "cell solved");
                CellOutcome::Solved(summary)
            }
            Err(e) => {
                warn!(radius, second, error = %e, "cell failed");
                CellOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        SweepRow {
            index,
            i_radius,
            i_second,
            radius,
            second,
            outcome,
        }
    }

    /// Evaluate every cell. Cell failures are recorded, never propagated.
    pub fn run(&self) -> SweepTable {
        let grid = self.grid();
        info!(
            profile = ?self.config.profile,
            cells = grid.len(),
            parallel = self.config.parallel,
            "sweep started"
        );

        let rows: Vec<SweepRow> = if self.config.parallel {
            (0..grid.len())
                .into_par_iter()
                .map(|i| self.evaluate_row(&grid, i))
                .collect()
        } else {
            (0..grid.len()).map(|i| self.evaluate_row(&grid, i)).collect()
        };

        let table = SweepTable {
            profile: self.config.profile,
            grid,
            rows,
        };
        info!(
            solved = table.solved().count(),
            failed = table.failures().count(),
            "sweep finished"
        );
        table
    }
}
