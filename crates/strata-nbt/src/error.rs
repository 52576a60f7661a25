//! Tag document codec errors.

/// Errors that can occur while reading or writing binary tag documents.
#[derive(Debug, thiserror::Error)]
pub enum NbtError {
    /// The underlying reader or writer failed (including truncated input).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A tag id byte does not name a known tag type.
    #[error("invalid tag type id: {0}")]
    InvalidTagType(u8),

    /// A string payload is not valid UTF-8.
    #[error("invalid utf-8 in string tag: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An array or list declared a negative length.
    #[error("negative length: {0}")]
    NegativeLength(i32),

    /// A string or length does not fit in the binary format.
    #[error("{0} is too long to encode")]
    TooLong(&'static str),

    /// Compounds and lists are nested deeper than the given limit.
    #[error("tags nested deeper than {0} levels")]
    TooDeep(usize),

    /// A list holds elements of more than one type.
    #[error("list of {expected:?} contains a {found:?}")]
    MixedList {
        expected: crate::TagType,
        found: crate::TagType,
    },

    /// The root of a document is not a compound.
    #[error("root tag must be a compound, found {0:?}")]
    RootNotCompound(crate::TagType),
}
