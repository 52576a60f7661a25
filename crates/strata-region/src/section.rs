//! Cells as chunk sections: a `Palette` list plus a `BlockStates` word array.
//!
//! Cells order voxels `(x << 8) | (z << 4) | y`, sections `(y << 8) | (z << 4) | x`.
//! Swapping the X and Y nibbles converts one to the other in either direction.

use std::sync::Arc;

use strata_bits::BitPacker;
use strata_bits::bits::width_in_bits;
use strata_level::{CELL_VOLUME, Cell, apply_remap};
use strata_nbt::{Compound, Tag};

use crate::compact_array;
use crate::error::CodecError;
use crate::palette::PaletteCodec;
use crate::schema::{self, BLOCK_STATES, PALETTE};
use crate::version::DataVersion;

/// Smallest bits per block the storage format uses.
pub const DEFAULT_MIN_BITS: u32 = 4;

/// Converts between cell order and section order.
fn swap_xy(index: usize) -> usize {
    ((index & 0xF) << 8) | (index & 0xF0) | (index >> 8)
}

/// Number of entries in `blocks` that do not index a palette of `len` states.
fn out_of_range(blocks: &BitPacker, len: usize) -> usize {
    blocks.iter().filter(|&v| v as usize >= len).count()
}

/// Converts [`Cell`]s to and from section compounds.
#[derive(Clone, Copy, Debug)]
pub struct SectionCodec {
    version: DataVersion,
    min_bits: u32,
    palettes: PaletteCodec,
}

impl SectionCodec {
    /// Creates a codec whose block arrays use at least `min_bits` bits per
    /// entry.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArgument`] if `min_bits` is not in `1..=32`;
    /// [`CodecError::UnsupportedVersion`] if `version` predates palettes.
    pub fn new(version: DataVersion, min_bits: u32) -> Result<Self, CodecError> {
        if !(1..=32).contains(&min_bits) {
            return Err(CodecError::InvalidArgument(format!(
                "minimum block bits must be in 1..=32, not {min_bits}"
            )));
        }
        schema::require_fields(version, &[&PALETTE, &BLOCK_STATES])?;
        Ok(Self {
            version,
            min_bits,
            palettes: PaletteCodec::new(version)?,
        })
    }

    pub fn version(&self) -> DataVersion {
        self.version
    }

    /// Bits per entry for a palette of `len` states.
    fn bits_for(&self, len: usize) -> u32 {
        let needed = match len {
            0 | 1 => 0,
            n => width_in_bits((n - 1) as u32),
        };
        needed.max(self.min_bits)
    }

    /// Encodes `cell` into a new section compound (without `Y`).
    pub fn encode(&self, cell: &Cell) -> Result<Compound, CodecError> {
        let isolated = cell.isolated_copy();
        let used = isolated.used_indices();
        let palette = self.palettes.encode(isolated.palette(), &used)?;
        let blocks = apply_remap(isolated.blocks(), &palette.remap);
        let stray = out_of_range(&blocks, palette.states.len());
        if stray > 0 {
            tracing::warn!(
                count = stray,
                states = palette.states.len(),
                "voxels reference missing palette entries, writing them as-is"
            );
        }

        let mut ordered = vec![0u32; CELL_VOLUME];
        for (index, value) in blocks.iter().enumerate() {
            ordered[swap_xy(index)] = value;
        }

        let bits = self.bits_for(palette.states.len());
        let words = compact_array::encode(&ordered, bits, self.version)?;
        tracing::debug!(
            states = palette.states.len(),
            bits,
            words = words.len(),
            version = self.version.0,
            "encoded section"
        );

        let mut section = Compound::new();
        schema::set_for(&mut section, &PALETTE, Tag::List(palette.states), self.version)?;
        schema::set_for(&mut section, &BLOCK_STATES, Tag::LongArray(words), self.version)?;
        Ok(section)
    }

    /// Decodes a section compound into a cell with its own palette.
    ///
    /// # Errors
    ///
    /// [`CodecError::MissingRequiredField`] if `Palette` or `BlockStates` is
    /// missing, [`CodecError::InvalidArgument`] if the words hold fewer than
    /// 4096 entries.
    pub fn decode(&self, section: &Compound) -> Result<Cell, CodecError> {
        let palette = self.palettes.read_from(section)?;
        let words = schema::require(section, &BLOCK_STATES, self.version)?
            .as_long_array()
            .ok_or_else(|| BLOCK_STATES.missing())?;

        let bits = self.bits_for(palette.len());
        let values = compact_array::decode(words, bits, self.version)?;
        if values.len() < CELL_VOLUME {
            return Err(CodecError::InvalidArgument(format!(
                "block array holds {} entries at {bits} bits, {CELL_VOLUME} expected",
                values.len()
            )));
        }

        let mut ordered = vec![0u32; CELL_VOLUME];
        for (index, &value) in values[..CELL_VOLUME].iter().enumerate() {
            ordered[swap_xy(index)] = value;
        }
        tracing::debug!(
            states = palette.len(),
            bits,
            version = self.version.0,
            "decoded section"
        );

        Ok(Cell::new(Arc::new(palette), BitPacker::from_values(&ordered))?)
    }
}
