// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Critical Radius Command
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Critical radius vs fuel fraction and the core radius correlation.

use anyhow::{Context, Result};
use clap::Args;
use coreopt_neutronics::critical::{
    fit_core_radius, fuel_fraction_sweep, reflector_scan, write_fraction_results, CriticalSearch,
    HomogeneousCore,
};
use coreopt_neutronics::keff::GridKeff;
use coreopt_types::materials::MaterialTable;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct CriticalArgs {
    /// Transport results with header core_r,fuel_frac,ref_mult,keff
    pub data: PathBuf,

    #[arg(long, default_value = "CO2")]
    pub coolant: String,

    #[arg(long, default_value = "UO2")]
    pub fuel: String,

    /// Results file [default: <COOLANT>_<FUEL>_results.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also print the reflector mass scan at this fuel fraction
    #[arg(long)]
    pub scan: Option<f64>,
}

pub fn execute(args: CriticalArgs) -> Result<()> {
    let model = GridKeff::from_csv(&args.data)
        .with_context(|| format!("loading k-eff table {}", args.data.display()))?;
    info!("k-eff grid {:?} (core_r × fuel_frac × ref_mult)", model.shape());

    let table = MaterialTable::co2_cooled();
    let masses = HomogeneousCore::from_materials(&table.fuel(&args.fuel)?, &table.coolant(&args.coolant)?);
    let search = CriticalSearch::default();

    if let Some(ff) = args.scan {
        let scan = reflector_scan(&model, &masses, ff, &search)?;
        println!("ref_mult,crit_radius,mass");
        for ((m, r), kg) in scan.ref_mult.iter().zip(&scan.crit_radius).zip(&scan.mass) {
            println!("{m:.5},{r:.5},{kg:.3}");
        }
        let nodes: Vec<String> = model
            .ref_mult_axis()
            .iter()
            .take_while(|&&m| m <= 0.6)
            .map(|m| format!("{m:.4}"))
            .collect();
        info!("tabulated ref_mult nodes: {}", nodes.join(", "));
        let q = &scan.quadratic;
        println!(
            "lightest scanned ref_mult {:.4}; fit m = {:.4e}·x² + {:.4e}·x + {:.4e}",
            scan.best_ref_mult, q[0], q[1], q[2]
        );
    }

    let rows = fuel_fraction_sweep(&model, &masses, &search);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}_{}_results.csv", args.coolant, args.fuel)));
    write_fraction_results(&output, &rows)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("{} critical designs written to {}", rows.len(), output.display());

    let fit = fit_core_radius(&rows).context("fitting core radius correlation")?;
    println!(
        "{}-{}: r_core = {:.5} · ff^({:.4}) [m]",
        args.fuel, args.coolant, fit.coefficient, fit.exponent
    );
    Ok(())
}
