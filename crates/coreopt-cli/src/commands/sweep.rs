// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Sweep Commands
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thermal-hydraulic sweeps and the minimum-mass report.

use anyhow::{bail, Context, Result};
use clap::Args;
use coreopt_thermal::sweep::{Metric, ParametricSweep, SweepTable};
use coreopt_types::config::{AspectRatioWindow, SolverSettings, SweepConfig};
use coreopt_types::materials::CycleConditions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Default thermal power [W].
const DEFAULT_POWER: &str = "200000";

/// Options shared by both sweep profiles.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Only designs with aspect ratio inside the window compete for minimum mass
    #[arg(long = "ar")]
    pub ar: bool,

    /// Thermal power target [W]
    #[arg(long, default_value = DEFAULT_POWER)]
    pub power: f64,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// JSON file with solver / cycle / aspect-window overrides
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Evaluate cells on one thread
    #[arg(long)]
    pub serial: bool,
}

#[derive(Args, Debug)]
pub struct PinCellArgs {
    /// Smallest coolant channel diameter [m]
    pub d_lower: f64,
    /// Largest coolant channel diameter [m]
    pub d_upper: f64,
    /// Smallest pitch-to-diameter ratio (> 1)
    pub pd_lower: f64,
    /// Largest pitch-to-diameter ratio
    pub pd_upper: f64,
    /// Axial core height [m]
    pub z: f64,
    /// Cladding thickness [m]
    pub clad_t: f64,
    /// Grid points per axis
    pub steps: usize,
    /// Metric written as an N×N grid
    pub plotkey: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct Co2Args {
    /// Smallest coolant channel radius [m]
    pub r_lower: f64,
    /// Largest coolant channel radius [m]
    pub r_upper: f64,
    /// Smallest core aspect ratio L/r
    pub ar_lower: f64,
    /// Largest core aspect ratio L/r
    pub ar_upper: f64,
    /// Grid points per axis
    pub steps: usize,
    /// Metric written as an N×N grid
    pub plotkey: String,

    /// Fuel/coolant pair
    #[arg(long, default_value = "UO2-CO2")]
    pub fuel: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Sweep configuration (JSON)
    pub config: PathBuf,

    /// Metric written as an N×N grid
    #[arg(long, default_value = "mass")]
    pub plotkey: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Optional fields layered over the positional sweep description.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SweepOverrides {
    solver: Option<SolverSettings>,
    cycle: Option<CycleConditions>,
    aspect_window: Option<AspectRatioWindow>,
}

impl SweepOverrides {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading overrides {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing overrides {}", path.display()))
    }

    fn apply(self, cfg: &mut SweepConfig) {
        if self.solver.is_some() {
            cfg.solver = self.solver;
        }
        if self.cycle.is_some() {
            cfg.cycle = self.cycle;
        }
        if self.aspect_window.is_some() {
            cfg.aspect_window = self.aspect_window;
        }
    }
}

fn finish_config(mut cfg: SweepConfig, common: &CommonArgs) -> Result<SweepConfig> {
    if let Some(path) = &common.config {
        SweepOverrides::load(path)?.apply(&mut cfg);
    }
    if common.ar {
        cfg.aspect_window.get_or_insert_with(AspectRatioWindow::default);
    } else {
        cfg.aspect_window = None;
    }
    cfg.parallel = !common.serial;
    Ok(cfg)
}

pub fn execute_pin_cell(args: PinCellArgs) -> Result<()> {
    if args.pd_lower <= 1.0 {
        bail!("Min fuel pitch must be greater than max coolant channel diameter! Set min PD > 1!");
    }
    let cfg = SweepConfig::pin_cell(
        (args.d_lower, args.d_upper),
        (args.pd_lower, args.pd_upper),
        args.z,
        args.clad_t,
        args.common.power,
        args.steps,
    );
    let cfg = finish_config(cfg, &args.common)?;
    run_and_report(cfg, &args.plotkey, &args.common.output)
}

pub fn execute_co2(args: Co2Args) -> Result<()> {
    // Fuel is bare in the fuel-fraction model.
    let cfg = SweepConfig::co2_cooled(
        (args.r_lower, args.r_upper),
        (args.ar_lower, args.ar_upper),
        0.0,
        args.common.power,
        args.steps,
        &args.fuel,
    );
    let cfg = finish_config(cfg, &args.common)?;
    run_and_report(cfg, &args.plotkey, &args.common.output)
}

pub fn execute_run(args: RunArgs) -> Result<()> {
    let path = args.config.to_string_lossy();
    let cfg = SweepConfig::from_file(&path).with_context(|| format!("loading sweep {path}"))?;
    run_and_report(cfg, &args.plotkey, &args.output)
}

fn run_and_report(cfg: SweepConfig, plotkey: &str, output: &Path) -> Result<()> {
    let metric: Metric = plotkey.parse()?;
    let window = cfg.aspect_window;
    let sweep = ParametricSweep::new(cfg).context("invalid sweep configuration")?;

    let start = Instant::now();
    let table = sweep.run();
    info!("sweep of {} cells took {:.2?}", table.len(), start.elapsed());

    report_failures(&table);
    match table.minimum_mass(window.as_ref()) {
        Some(best) => println!("{best}"),
        None => warn!("no solved design satisfies the constraints"),
    }

    fs::create_dir_all(output)
        .with_context(|| format!("creating output directory {}", output.display()))?;
    let results = output.join("sweep_results.csv");
    table
        .write_csv(&results)
        .with_context(|| format!("writing {}", results.display()))?;
    let grid = output.join(format!("{}_grid.csv", metric.key()));
    table
        .write_metric_grid(&grid, metric)
        .with_context(|| format!("writing {}", grid.display()))?;
    info!("results in {} and {}", results.display(), grid.display());
    Ok(())
}

fn report_failures(table: &SweepTable) {
    let failed = table.failures().count();
    if failed > 0 {
        warn!("{failed} of {} cells failed", table.len());
        for (row, error) in table.failures() {
            info!(r = row.radius, second = row.second, "{error}");
        }
    }
}
