//! Command-line argument parsing for Strata.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::Config;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "strata", about = "Convert voxel block data between chunk files and the interchange format")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Data version written into chunk documents.
    #[arg(long, global = true)]
    pub data_version: Option<i32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Read and write uncompressed chunk files.
    #[arg(long, global = true)]
    pub no_gzip: bool,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read a chunk file, or a directory of them, into one interchange file.
    ToWire { input: PathBuf, output: PathBuf },
    /// Split an interchange file into chunk files under a directory.
    ToRegion { input: PathBuf, output: PathBuf },
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(version) = args.data_version {
            self.conversion.data_version = version;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.no_gzip {
            self.io.gzip = false;
        }
    }
}
