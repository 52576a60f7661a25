//! Exact-width bit packing for unsigned integers.
//!
//! [`BitPacker`] stores `N` values of `magnitude` bits each in the smallest
//! possible byte buffer. The [`bits`] module holds the width/mask arithmetic
//! shared by the packer and the legacy word-array codecs.

pub mod bit_packed;
pub mod bits;
mod error;

pub use bit_packed::{BitPacker, MAX_MAGNITUDE};
pub use error::PackError;
