//! 16×16×16 cubes of palette-indexed voxels.

use std::sync::Arc;

use strata_bits::BitPacker;

use crate::block_state::BlockState;
use crate::error::LevelError;
use crate::isolate::{self, Isolation};
use crate::palette::Palette;

/// Side length of a cell in voxels.
pub const CELL_SIZE: usize = 16;

/// Total number of voxels in a cell (16³).
pub const CELL_VOLUME: usize = CELL_SIZE * CELL_SIZE * CELL_SIZE;

/// Converts local coordinates to a block array index, `(x << 8) | (z << 4) | y`.
///
/// Returns `None` if any coordinate is outside `0..16`.
pub fn voxel_index(x: usize, y: usize, z: usize) -> Option<usize> {
    if x < CELL_SIZE && y < CELL_SIZE && z < CELL_SIZE {
        Some((x << 8) | (z << 4) | y)
    } else {
        None
    }
}

/// A cube of voxels, each an index into a shared [`Palette`].
///
/// The block array always holds exactly [`CELL_VOLUME`] entries. Entries are
/// expected to be valid palette indices, but readers tolerate ones that are not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    palette: Arc<Palette>,
    blocks: BitPacker,
}

impl Cell {
    /// Creates a cell from a palette and a block array.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::InvalidArgument`] if `blocks` does not hold
    /// exactly 4096 entries.
    pub fn new(palette: Arc<Palette>, blocks: BitPacker) -> Result<Self, LevelError> {
        if blocks.len() != CELL_VOLUME {
            return Err(LevelError::InvalidArgument(format!(
                "block array must have {CELL_VOLUME} entries, not {}",
                blocks.len()
            )));
        }
        Ok(Self { palette, blocks })
    }

    /// A cell filled with air, using [`Palette::empty`].
    pub fn empty() -> Self {
        Self {
            palette: Arc::new(Palette::empty()),
            blocks: BitPacker::from_values(&[0; CELL_VOLUME]),
        }
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    /// The palette indices in `(x << 8) | (z << 4) | y` order.
    pub fn blocks(&self) -> &BitPacker {
        &self.blocks
    }

    pub fn into_parts(self) -> (Arc<Palette>, BitPacker) {
        (self.palette, self.blocks)
    }

    /// Returns the palette index stored at `(x, y, z)`.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<u32, LevelError> {
        let index = Self::checked_index(x, y, z)?;
        Ok(self.blocks.get(index)?)
    }

    /// Stores a palette index at `(x, y, z)` and returns the previous one.
    ///
    /// # Errors
    ///
    /// Fails if the coordinate is outside the cell or `value` does not fit in
    /// the block array's magnitude. The cell is unchanged on error.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u32) -> Result<u32, LevelError> {
        let index = Self::checked_index(x, y, z)?;
        Ok(self.blocks.set(index, value)?)
    }

    /// Returns the state at `(x, y, z)`, or `None` if the stored index is not
    /// in the palette.
    pub fn state_at(&self, x: usize, y: usize, z: usize) -> Result<Option<&BlockState>, LevelError> {
        let index = self.get(x, y, z)?;
        Ok(self.palette.get(index))
    }

    /// Returns `true` if every voxel refers to an empty state (or to nothing).
    pub fn is_air(&self) -> bool {
        self.blocks
            .iter()
            .all(|i| self.palette.get(i).is_none_or(BlockState::is_empty))
    }

    /// For each palette entry, whether any voxel refers to it.
    pub fn used_indices(&self) -> Vec<bool> {
        isolate::used_indices(&self.blocks, self.palette.len())
    }

    /// Produces an equivalent cell whose palette only holds the states this
    /// cell uses, along with the old → new index remap.
    pub fn isolate(&self) -> Isolation {
        isolate::isolate(self)
    }

    /// Like [`Cell::isolate`], discarding the remap.
    pub fn isolated_copy(&self) -> Cell {
        self.isolate().cell
    }

    /// Assembles a cell from an array already known to hold 4096 entries.
    pub(crate) fn from_isolated(palette: Arc<Palette>, blocks: BitPacker) -> Self {
        debug_assert_eq!(blocks.len(), CELL_VOLUME);
        Self { palette, blocks }
    }

    fn checked_index(x: usize, y: usize, z: usize) -> Result<usize, LevelError> {
        voxel_index(x, y, z).ok_or(LevelError::IndexOutOfRange { x, y, z })
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}
