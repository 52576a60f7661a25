//! Errors surfaced by the command-line conversions.

use std::path::PathBuf;

use strata_config::ConfigError;
use strata_nbt::NbtError;
use strata_region::CodecError;
use strata_wire::WireError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A file or directory could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A chunk document could not be parsed or written.
    #[error("{}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: NbtError,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No `--config` was given and the OS has no configuration directory.
    #[error("could not determine a configuration directory, pass --config")]
    NoConfigDir,
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn document(path: impl Into<PathBuf>) -> impl FnOnce(NbtError) -> Self {
        let path = path.into();
        move |source| Self::Document { path, source }
    }
}
