//! The `strata` binary.

use std::path::PathBuf;

use clap::Parser;
use strata_cli::{CliError, to_region, to_wire};
use strata_config::{CliArgs, Command, Config, default_config_dir};

fn config_dir(args: &CliArgs) -> Result<PathBuf, CliError> {
    args.config
        .clone()
        .or_else(default_config_dir)
        .ok_or(CliError::NoConfigDir)
}

fn run(args: &CliArgs) -> Result<(), CliError> {
    let dir = config_dir(args)?;
    let mut config = Config::load_or_create(&dir)?;
    config.apply_cli_overrides(args);
    strata_log::init_logging(Some(&dir.join("logs")), cfg!(debug_assertions), Some(&config));

    let summary = match &args.command {
        Command::ToWire { input, output } => to_wire(input, output, &config)?,
        Command::ToRegion { input, output } => to_region(input, output, &config)?,
    };
    println!(
        "{} chunks, {} cells, {} entities",
        summary.chunks, summary.cells, summary.entities
    );
    Ok(())
}

/// Line printed to stderr when a command fails.
fn failure_message(error: &CliError) -> String {
    format!("strata: {error}")
}

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        eprintln!("{}", failure_message(&e));
        std::process::exit(1);
    }
}
