// ─────────────────────────────────────────────────────────────────────
// CoreOpt — Command Line
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `coreopt`: minimum-mass reactor core design from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "coreopt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lightest coolable, critical reactor core for a given power", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pin-cell sweep over channel diameter × pitch-to-diameter ratio
    Sweep(commands::sweep::PinCellArgs),
    /// CO2-cooled core sweep over channel radius × aspect ratio
    SweepCo2(commands::sweep::Co2Args),
    /// Sweep described entirely by a JSON file
    Run(commands::sweep::RunArgs),
    /// Critical radius vs fuel fraction from tabulated k-eff results
    Critical(commands::critical::CriticalArgs),
    /// Case list for the Monte Carlo transport runs
    Sample(commands::sample::SampleArgs),
}

fn level_from(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_from(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Sweep(args) => commands::sweep::execute_pin_cell(args),
        Commands::SweepCo2(args) => commands::sweep::execute_co2(args),
        Commands::Run(args) => commands::sweep::execute_run(args),
        Commands::Critical(args) => commands::critical::execute(args),
        Commands::Sample(args) => commands::sample::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pin_cell_positionals() {
        let cli = Cli::try_parse_from([
            "coreopt", "sweep", "0.01", "0.02", "1.1", "1.5", "2.0", "0.001", "5", "mass", "--ar",
        ])
        .unwrap();
        match cli.command {
            Commands::Sweep(args) => {
                assert_eq!(args.steps, 5);
                assert_eq!(args.plotkey, "mass");
                assert!(args.common.ar);
            }
            _ => panic!("expected sweep"),
        }
    }

    #[test]
    fn test_co2_positionals_and_log_level() {
        let cli = Cli::try_parse_from([
            "coreopt", "sweep-co2", "0.004", "0.014", "1.0", "2.0", "5", "dp", "--fuel", "UW-H2O",
            "-l", "debug",
        ])
        .unwrap();
        assert_eq!(level_from(&cli.log_level), Level::DEBUG);
        match cli.command {
            Commands::SweepCo2(args) => assert_eq!(args.fuel, "UW-H2O"),
            _ => panic!("expected sweep-co2"),
        }
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        assert_eq!(level_from("loud"), Level::INFO);
    }
}
