//! Version-aware codecs between the voxel model and the legacy chunk storage
//! schema.
//!
//! Every field access goes through the [`schema`] table, which knows which
//! fields are legal in which data versions. [`compact_array`] handles the two
//! historical layouts of packed block arrays. The codecs build on both:
//! [`BlockStateCodec`] → [`PaletteCodec`] → [`SectionCodec`] → [`ChunkCodec`].

pub mod block_state;
pub mod chunk;
pub mod compact_array;
mod error;
pub mod palette;
pub mod schema;
pub mod section;
mod version;

pub use block_state::BlockStateCodec;
pub use chunk::{ChunkCodec, ChunkColumn};
pub use compact_array::WordLayout;
pub use error::CodecError;
pub use palette::{EncodedPalette, PaletteCodec};
pub use schema::SchemaField;
pub use section::SectionCodec;
pub use version::DataVersion;
