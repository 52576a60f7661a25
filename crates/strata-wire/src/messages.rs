//! Interchange message types and serialization.
//!
//! A level is serialized with [`postcard`] and prefixed with a format version
//! byte. Use [`encode_level`] and [`decode_level`] for encoding/decoding.
//! Block state properties and entity compounds travel as raw NBT payloads.

use serde::{Deserialize, Serialize};

use crate::error::WireError;

/// Current interchange format version. Prepended to every serialized level.
pub const FORMAT_VERSION: u8 = 1;

// ---------------------------------------------------------------------------
// Payload structs
// ---------------------------------------------------------------------------

/// A packed array: `size` values of `magnitude` bits each, LSB first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackedArrayData {
    pub size: u32,
    pub magnitude: u32,
    /// Exactly `ceil(size * magnitude / 8)` bytes.
    pub contents: Vec<u8>,
}

/// A block state. `properties` holds an encoded NBT compound body, empty
/// when the state has no properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockStateData {
    pub name: String,
    pub properties: Vec<u8>,
}

/// A named palette, shared by every cell that refers to its name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaletteData {
    pub name: String,
    pub data_version: i32,
    pub states: Vec<BlockStateData>,
}

/// A cell: palette indices for 4096 voxels plus the name of their palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellData {
    pub palette_name: String,
    pub blocks: PackedArrayData,
}

/// A cell at its coordinate within the level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacedCell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub cell: CellData,
}

/// A whole level. Palettes are listed once, by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelData {
    pub cells: Vec<PlacedCell>,
    pub palettes: Vec<PaletteData>,
    /// Encoded NBT compound body of the level metadata.
    pub metadata: Vec<u8>,
    pub entities: Vec<Vec<u8>>,
    pub block_entities: Vec<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

/// Serialize a level into a versioned byte buffer.
///
/// Format: `[FORMAT_VERSION] [postcard-encoded LevelData]`
pub fn encode_level(level: &LevelData) -> Result<Vec<u8>, WireError> {
    let mut buf = vec![FORMAT_VERSION];
    let payload = postcard::to_allocvec(level)?;
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Deserialize a level from a versioned byte buffer.
///
/// Returns an error if the buffer is empty, the version doesn't match, or the
/// payload is malformed.
pub fn decode_level(data: &[u8]) -> Result<LevelData, WireError> {
    let Some((&version, payload)) = data.split_first() else {
        return Err(WireError::EmptyPayload);
    };
    if version != FORMAT_VERSION {
        return Err(WireError::UnsupportedVersion(version));
    }
    let level = postcard::from_bytes(payload)?;
    Ok(level)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
