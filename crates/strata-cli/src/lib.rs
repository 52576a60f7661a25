//! File-level conversions behind the `strata` binary.

pub mod convert;
mod error;

pub use convert::{ConversionSummary, to_region, to_wire};
pub use error::CliError;
