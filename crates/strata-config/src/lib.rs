//! Configuration system for Strata.
//!
//! Provides conversion settings that persist to disk as RON files, with CLI
//! overrides via clap and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, Command};
pub use config::{Config, ConversionConfig, DebugConfig, IoConfig, default_config_dir};
pub use error::ConfigError;
