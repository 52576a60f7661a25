//! Codec error types.

use strata_bits::PackError;
use strata_level::LevelError;
use strata_nbt::TagType;

/// Errors raised while converting between the voxel model and chunk documents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A field is not legal in the requested data version.
    #[error("field \"{field}\" requires data version {min}..={max}, not {version}")]
    UnsupportedVersion {
        field: &'static str,
        version: i32,
        min: i32,
        max: i32,
    },

    /// A required field is absent or has the wrong type.
    #[error("required {expected:?} field \"{field}\" not found")]
    MissingRequiredField {
        field: &'static str,
        expected: TagType,
    },

    /// A value written to (or read from) a field has the wrong type. For list
    /// fields the types are those of the elements.
    #[error("field \"{field}\" expects {expected:?}, found {found:?}")]
    TypeMismatch {
        field: &'static str,
        expected: TagType,
        found: TagType,
    },

    /// An argument is malformed (e.g. a magnitude outside `1..=32`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    Level(#[from] LevelError),
}
