// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Transport Sampling Command
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Transport case lists: full grid or Latin hypercube.

use anyhow::{Context, Result};
use clap::Args;
use coreopt_neutronics::sampling::{write_cases, ParameterSpace, HYPERCUBE_SEED};
use std::path::PathBuf;
use tracing::info;

const HYPERCUBE_SAMPLES_ARG: &str = "500";

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Draw this many Latin hypercube samples instead of the full grid
    #[arg(long, num_args = 0..=1, default_missing_value = HYPERCUBE_SAMPLES_ARG)]
    pub hypercube: Option<usize>,

    #[arg(long, default_value_t = HYPERCUBE_SEED)]
    pub seed: u64,

    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn execute(args: SampleArgs) -> Result<()> {
    let space = ParameterSpace::default();
    space.validate()?;
    let cases = match args.hypercube {
        Some(n) => {
            info!("latin hypercube: {n} samples, seed {}", args.seed);
            space.hypercube_cases(n, args.seed)
        }
        None => space.grid_cases(),
    };
    write_cases(&args.output, &cases)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("{} cases written to {}", cases.len(), args.output.display());
    Ok(())
}
