//! Interchange format for levels: serde message types, postcard framing, and
//! conversions to and from the voxel model.

pub mod convert;
mod error;
pub mod messages;

pub use error::WireError;
pub use messages::{
    BlockStateData, CellData, FORMAT_VERSION, LevelData, PackedArrayData, PaletteData, PlacedCell,
    decode_level, encode_level,
};
