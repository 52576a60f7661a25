//! Block states as palette entry compounds.

use strata_level::BlockState;
use strata_nbt::{Compound, Tag};

use crate::error::CodecError;
use crate::schema::{self, BLOCK_NAME, BLOCK_PROPERTIES};
use crate::version::DataVersion;

/// Converts [`BlockState`]s to and from `{Name, Properties}` compounds.
#[derive(Clone, Copy, Debug)]
pub struct BlockStateCodec {
    version: DataVersion,
}

impl BlockStateCodec {
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedVersion`] if block state entries do
    /// not exist in `version`.
    pub fn new(version: DataVersion) -> Result<Self, CodecError> {
        schema::require_fields(version, &[&BLOCK_NAME, &BLOCK_PROPERTIES])?;
        Ok(Self { version })
    }

    pub fn version(&self) -> DataVersion {
        self.version
    }

    /// Writes `Name`, and `Properties` only when the state has any.
    pub fn encode(&self, state: &BlockState) -> Result<Compound, CodecError> {
        let mut encoded = Compound::new();
        schema::set_for(&mut encoded, &BLOCK_NAME, Tag::from(state.name()), self.version)?;
        if state.has_properties() {
            let properties = Tag::Compound(state.properties().clone());
            schema::set_for(&mut encoded, &BLOCK_PROPERTIES, properties, self.version)?;
        }
        Ok(encoded)
    }

    /// Reads a state; `Name` is required and `Properties` defaults to empty.
    pub fn decode(&self, fragment: &Compound) -> Result<BlockState, CodecError> {
        let name = schema::require(fragment, &BLOCK_NAME, self.version)?
            .as_str()
            .ok_or_else(|| BLOCK_NAME.missing())?;
        let properties = schema::get_from(fragment, &BLOCK_PROPERTIES, false, self.version)?
            .and_then(Tag::as_compound)
            .cloned()
            .unwrap_or_default();
        Ok(BlockState::with_properties(name, properties))
    }
}
