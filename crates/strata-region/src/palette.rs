//! Palettes as lists of block state compounds.

use strata_level::{IndexRemap, Palette, synthetic_palette_name};
use strata_nbt::{Compound, Tag, TagType};

use crate::block_state::BlockStateCodec;
use crate::error::CodecError;
use crate::schema::{self, PALETTE};
use crate::version::DataVersion;

/// Output of [`PaletteCodec::encode`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodedPalette {
    /// One compound per encoded state.
    pub states: Vec<Tag>,
    /// Old → new index for every encoded state whose position changed.
    pub remap: IndexRemap,
}

/// Converts [`Palette`]s to and from lists of block state compounds.
#[derive(Clone, Copy, Debug)]
pub struct PaletteCodec {
    version: DataVersion,
    states: BlockStateCodec,
}

impl PaletteCodec {
    pub fn new(version: DataVersion) -> Result<Self, CodecError> {
        schema::require_fields(version, &[&PALETTE])?;
        Ok(Self {
            version,
            states: BlockStateCodec::new(version)?,
        })
    }

    pub fn version(&self) -> DataVersion {
        self.version
    }

    /// Encodes the states of `palette` flagged in `used`.
    ///
    /// When every state is used the whole palette is written in order.
    /// Otherwise only used states are written, in ascending index order, and
    /// each one that lands at a new index is recorded in the remap.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArgument`] if `used` does not have one flag per
    /// palette entry.
    pub fn encode(&self, palette: &Palette, used: &[bool]) -> Result<EncodedPalette, CodecError> {
        if used.len() != palette.len() {
            return Err(CodecError::InvalidArgument(format!(
                "{} usage flags for a palette of {}",
                used.len(),
                palette.len()
            )));
        }

        let mut encoded = EncodedPalette::default();
        let everything_used = used.iter().all(|&u| u);
        for (index, state) in palette.iter().enumerate() {
            if !everything_used && !used[index] {
                continue;
            }
            let new_index = encoded.states.len();
            if new_index != index {
                encoded.remap.insert(index as u32, new_index as u32);
            }
            encoded.states.push(Tag::Compound(self.states.encode(state)?));
        }
        Ok(encoded)
    }

    /// Decodes a list of state compounds, in order, into a freshly named
    /// palette tied to this codec's version.
    pub fn decode(&self, states: &[Tag]) -> Result<Palette, CodecError> {
        let mut decoded = Vec::with_capacity(states.len());
        for entry in states {
            let Tag::Compound(fragment) = entry else {
                return Err(CodecError::TypeMismatch {
                    field: PALETTE.name,
                    expected: TagType::Compound,
                    found: entry.tag_type(),
                });
            };
            decoded.push(self.states.decode(fragment)?);
        }
        Ok(Palette::new(synthetic_palette_name(), self.version.0, decoded))
    }

    /// Reads the required `Palette` field of a section.
    pub fn read_from(&self, section: &Compound) -> Result<Palette, CodecError> {
        let states = schema::require(section, &PALETTE, self.version)?
            .as_list()
            .ok_or_else(|| PALETTE.missing())?;
        self.decode(states)
    }
}
