//! Bit-packed array for storing fixed-width unsigned integers in a compact byte buffer.
//!
//! Element `i` occupies the contiguous bit run `[i * magnitude, (i + 1) * magnitude)`,
//! least-significant bit first, with byte 0 holding bits 0–7. Runs start at
//! arbitrary bit offsets and may span several bytes.

use std::fmt;

use crate::bits::{bit_mask, bytes_needed, width_in_bits};
use crate::error::PackError;

/// Largest supported number of bits per element.
pub const MAX_MAGNITUDE: u32 = 32;

/// A compact array where each element is stored using exactly `magnitude` bits.
///
/// Bits past the last logical element are always zero, so two packers with the
/// same size, magnitude and values compare (and hash) equal no matter how they
/// were built.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitPacker {
    /// Number of logical elements.
    size: usize,
    /// Bits per element (0–32).
    magnitude: u32,
    /// Raw storage, `ceil(size * magnitude / 8)` bytes.
    contents: Vec<u8>,
}

impl BitPacker {
    /// Creates a packer with `size` elements of `magnitude` bits, all zero.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidArgument`] if `magnitude > 32`, or
    /// [`PackError::Overflow`] if the buffer would not be addressable.
    pub fn new(size: usize, magnitude: u32) -> Result<Self, PackError> {
        let len = Self::checked_len(size, magnitude)?;
        Ok(Self {
            size,
            magnitude,
            contents: vec![0u8; len],
        })
    }

    /// Packs `values` using the smallest magnitude that fits the largest one.
    pub fn from_values(values: &[u32]) -> Self {
        let max = values.iter().copied().max().unwrap_or(0);
        let magnitude = width_in_bits(max);
        let len = bytes_needed(values.len(), magnitude).unwrap_or(0);
        let mut packer = Self {
            size: values.len(),
            magnitude,
            contents: vec![0u8; len],
        };
        if magnitude > 0 {
            for (index, &value) in values.iter().enumerate() {
                packer.write(index, value);
            }
        }
        packer
    }

    /// Packs signed values as unsigned bit patterns.
    ///
    /// Any negative value has its sign bit set, which forces a magnitude of 32.
    pub fn from_signed(values: &[i32]) -> Self {
        let unsigned: Vec<u32> = values.iter().map(|&v| v as u32).collect();
        Self::from_values(&unsigned)
    }

    /// Wraps an existing byte buffer.
    ///
    /// Any bits in `contents` past the last element are cleared so the result
    /// stays canonical.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidArgument`] if the buffer length is not
    /// exactly `ceil(size * magnitude / 8)` or the magnitude is invalid.
    pub fn from_raw(size: usize, magnitude: u32, mut contents: Vec<u8>) -> Result<Self, PackError> {
        let expected = Self::checked_len(size, magnitude)?;
        if contents.len() != expected {
            return Err(PackError::InvalidArgument(format!(
                "{expected} bytes expected, not {}",
                contents.len()
            )));
        }

        let used_bits = size as u64 * u64::from(magnitude);
        let tail_bits = (used_bits % 8) as u32;
        if tail_bits != 0
            && let Some(last) = contents.last_mut()
        {
            *last &= bit_mask(tail_bits) as u8;
        }

        Ok(Self {
            size,
            magnitude,
            contents,
        })
    }

    /// Returns the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<u32, PackError> {
        self.check_index(index)?;
        if self.magnitude == 0 {
            return Ok(0);
        }
        Ok(self.read(index))
    }

    /// Replaces the value at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::IndexOutOfRange`] for a bad index, or
    /// [`PackError::ValueOutOfRange`] if `value > max()`. The packer is left
    /// untouched on error.
    pub fn set(&mut self, index: usize, value: u32) -> Result<u32, PackError> {
        self.check_index(index)?;
        let max = self.max();
        if value > max {
            return Err(PackError::ValueOutOfRange { value, max });
        }
        if self.magnitude == 0 {
            return Ok(0);
        }
        let previous = self.read(index);
        self.write(index, value);
        Ok(previous)
    }

    /// Returns the largest value that can be stored (`2^magnitude - 1`).
    pub fn max(&self) -> u32 {
        bit_mask(self.magnitude) as u32
    }

    /// Returns the number of bits per element.
    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }

    /// Returns the number of logical elements.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the packer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.contents
    }

    /// Iterates over every stored value in index order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.size).map(move |i| if self.magnitude == 0 { 0 } else { self.read(i) })
    }

    /// Unpacks every value into a plain vector.
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    fn checked_len(size: usize, magnitude: u32) -> Result<usize, PackError> {
        if magnitude > MAX_MAGNITUDE {
            return Err(PackError::InvalidArgument(format!(
                "magnitude must be in range [0, {MAX_MAGNITUDE}]: {magnitude}"
            )));
        }
        bytes_needed(size, magnitude).ok_or(PackError::Overflow { size, magnitude })
    }

    fn check_index(&self, index: usize) -> Result<(), PackError> {
        if index >= self.size {
            return Err(PackError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Reads the bit run for `index`. Requires `magnitude > 0` and a valid index.
    fn read(&self, index: usize) -> u32 {
        let start_bit = index as u64 * u64::from(self.magnitude);
        let mut byte = (start_bit / 8) as usize;
        let mut offset = (start_bit % 8) as u32;
        let mut consumed = 0u32;
        let mut value = 0u64;

        while consumed < self.magnitude {
            // Bits still available in this byte vs. bits still needed.
            let take = (8 - offset).min(self.magnitude - consumed);
            let bits = (u64::from(self.contents[byte]) >> offset) & bit_mask(take);
            value |= bits << consumed;

            consumed += take;
            offset = 0;
            byte += 1;
        }

        (value & bit_mask(self.magnitude)) as u32
    }

    /// Overwrites the bit run for `index`. Requires `magnitude > 0`, a valid
    /// index and `value <= max()`.
    fn write(&mut self, index: usize, value: u32) {
        let start_bit = index as u64 * u64::from(self.magnitude);
        let mut byte = (start_bit / 8) as usize;
        let mut offset = (start_bit % 8) as u32;
        let mut consumed = 0u32;

        while consumed < self.magnitude {
            let take = (8 - offset).min(self.magnitude - consumed);
            let mask = bit_mask(take) as u8;
            let bits = ((value >> consumed) as u8) & mask;

            self.contents[byte] &= !(mask << offset);
            self.contents[byte] |= bits << offset;

            consumed += take;
            offset = 0;
            byte += 1;
        }
    }
}

impl fmt::Debug for BitPacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitPacker")
            .field("size", &self.size)
            .field("magnitude", &self.magnitude)
            .field("values", &self.to_vec())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
