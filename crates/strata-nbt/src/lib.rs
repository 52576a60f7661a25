//! Tree-structured tag documents (NBT) and their binary codec.
//!
//! [`Tag`] is the value model shared by every schema-aware codec in the
//! workspace. [`codec`] reads and writes the big-endian binary form, either as
//! a named root (optionally gzip-compressed) or as a headless compound body.

pub mod codec;
mod error;
pub mod tag;

pub use codec::{MAX_DEPTH, NbtFile, decode_compound, encode_compound};
pub use error::NbtError;
pub use tag::{Compound, Tag, TagType};
