//! Data versions: the schema epoch a chunk document was written in.

use std::fmt;

/// A data version number.
///
/// Documents without an explicit version predate versioning and are treated
/// as [`DataVersion::UNVERSIONED`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataVersion(pub i32);

impl DataVersion {
    /// Version assumed for documents that carry no version field.
    pub const UNVERSIONED: Self = Self(99);

    /// First version with block palettes instead of numeric block ids.
    pub const PALETTE: Self = Self(1451);

    /// First version with the `Status` chunk field.
    pub const STATUS_TAG: Self = Self(1466);

    /// First version whose block arrays never split a value across words.
    pub const PADDED_BLOCK_ARRAY: Self = Self(2527);

    /// First version storing entities in their own directory.
    pub const ENTITY_DIRECTORY: Self = Self(2679);

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_palette_supported(self) -> bool {
        self >= Self::PALETTE
    }

    pub fn is_status_tag_supported(self) -> bool {
        self >= Self::STATUS_TAG
    }

    pub fn is_block_array_padded(self) -> bool {
        self >= Self::PADDED_BLOCK_ARRAY
    }

    pub fn is_entity_directory_supported(self) -> bool {
        self >= Self::ENTITY_DIRECTORY
    }
}

impl From<i32> for DataVersion {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for DataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
