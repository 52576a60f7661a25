//! Bit packing error types.

/// Errors raised while building or accessing a [`BitPacker`](crate::BitPacker).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// A constructor argument is malformed (e.g. magnitude above 32).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An element index is negative or not below the packer's size.
    #[error("index {index} out of range for size {size}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of elements in the packer.
        size: usize,
    },

    /// A value does not fit in the packer's magnitude.
    #[error("value {value} exceeds maximum {max}")]
    ValueOutOfRange {
        /// Rejected value.
        value: u32,
        /// Largest storable value.
        max: u32,
    },

    /// `size * magnitude` does not fit in an addressable buffer.
    #[error("{size} elements of {magnitude} bits overflow the buffer")]
    Overflow {
        /// Requested element count.
        size: usize,
        /// Requested bits per element.
        magnitude: u32,
    },
}
