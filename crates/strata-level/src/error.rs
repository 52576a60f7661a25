//! Voxel model error types.

use strata_bits::PackError;

/// Errors raised by the voxel model and level container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// A constructor argument is malformed (e.g. a block array of the wrong length).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A voxel coordinate lies outside the 16³ cell.
    #[error("voxel ({x}, {y}, {z}) is outside the cell")]
    IndexOutOfRange {
        /// Local X coordinate.
        x: usize,
        /// Local Y coordinate.
        y: usize,
        /// Local Z coordinate.
        z: usize,
    },

    /// Two different palettes in one level share a name.
    #[error("palette name \"{0}\" is not unique")]
    DuplicatePaletteName(String),

    /// The block array rejected an access.
    #[error(transparent)]
    Pack(#[from] PackError),
}
