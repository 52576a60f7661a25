//! Interchange format errors.

use strata_bits::PackError;
use strata_level::LevelError;
use strata_nbt::NbtError;

/// Errors that can occur while encoding or decoding interchange data.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The payload was empty (no version byte).
    #[error("empty payload, no version byte")]
    EmptyPayload,

    /// The version byte does not match [`FORMAT_VERSION`](crate::FORMAT_VERSION).
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),

    /// Postcard serialization or deserialization failed.
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),

    /// A cell names a palette the level does not define.
    #[error("cell refers to unknown palette \"{0}\"")]
    UnknownPalette(String),

    /// A value does not fit in its wire field.
    #[error("{0} does not fit in the interchange format")]
    TooLarge(&'static str),

    /// Block state properties could not be encoded or decoded.
    #[error("block state properties: {0}")]
    Nbt(#[from] NbtError),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    Level(#[from] LevelError),
}
