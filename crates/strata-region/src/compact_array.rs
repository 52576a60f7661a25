//! Packing of index arrays into the 64-bit words of a chunk's `BlockStates`.
//!
//! Two layouts exist, selected by data version:
//!
//! - **Unpadded** (before 2527): values are laid end to end. A value that does
//!   not fit in the rest of a word keeps its low bits there and continues in
//!   the low bits of the next word. `ceil(len * m / 64)` words.
//! - **Padded** (2527 on): each word holds `floor(64 / m)` whole values and
//!   its remaining high bits stay zero. `ceil(len / floor(64 / m))` words.
//!
//! Decoding returns every value the words can hold, which may exceed the
//! number originally encoded. Callers truncate to the length they expect.

use strata_bits::bits::bit_mask;

use crate::error::CodecError;
use crate::version::DataVersion;

/// Word layout of a packed block array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordLayout {
    /// Values may straddle word boundaries.
    Unpadded,
    /// Values never straddle word boundaries.
    Padded,
}

impl WordLayout {
    pub fn for_version(version: DataVersion) -> Self {
        if version.is_block_array_padded() {
            Self::Padded
        } else {
            Self::Unpadded
        }
    }

    /// Number of words needed for `len` values of `magnitude` bits.
    pub fn word_count(self, len: usize, magnitude: u32) -> usize {
        let magnitude = magnitude as usize;
        match self {
            Self::Padded => len.div_ceil(64 / magnitude),
            Self::Unpadded => (len * magnitude).div_ceil(64),
        }
    }
}

fn check_magnitude(magnitude: u32) -> Result<(), CodecError> {
    if magnitude == 0 || magnitude > 32 {
        return Err(CodecError::InvalidArgument(format!(
            "magnitude must be in 1..=32, not {magnitude}"
        )));
    }
    Ok(())
}

/// Packs `values` into words using the layout of `version`.
///
/// Bits of a value above `magnitude` are discarded.
///
/// # Errors
///
/// Returns [`CodecError::InvalidArgument`] if `magnitude` is not in `1..=32`.
pub fn encode(values: &[u32], magnitude: u32, version: DataVersion) -> Result<Vec<i64>, CodecError> {
    check_magnitude(magnitude)?;
    let layout = WordLayout::for_version(version);
    let mut words = vec![0u64; layout.word_count(values.len(), magnitude)];
    let mask = bit_mask(magnitude);
    let m = magnitude as usize;

    match layout {
        WordLayout::Padded => {
            let per_word = 64 / m;
            for (i, &value) in values.iter().enumerate() {
                let offset = (i % per_word) * m;
                words[i / per_word] |= (u64::from(value) & mask) << offset;
            }
        }
        WordLayout::Unpadded => {
            for (i, &value) in values.iter().enumerate() {
                let bit = i * m;
                let (word, offset) = (bit / 64, bit % 64);
                let value = u64::from(value) & mask;
                words[word] |= value << offset;
                // Only split when the value runs past bit 64; ending on it is fine.
                if offset + m > 64 {
                    words[word + 1] |= value >> (64 - offset);
                }
            }
        }
    }

    Ok(words.into_iter().map(|w| w as i64).collect())
}

/// Unpacks every value held by `words` using the layout of `version`.
///
/// # Errors
///
/// Returns [`CodecError::InvalidArgument`] if `magnitude` is not in `1..=32`.
pub fn decode(words: &[i64], magnitude: u32, version: DataVersion) -> Result<Vec<u32>, CodecError> {
    check_magnitude(magnitude)?;
    let mask = bit_mask(magnitude);
    let m = magnitude as usize;

    let values = match WordLayout::for_version(version) {
        WordLayout::Padded => {
            let per_word = 64 / m;
            let mut values = Vec::with_capacity(words.len() * per_word);
            for &word in words {
                let word = word as u64;
                for slot in 0..per_word {
                    values.push(((word >> (slot * m)) & mask) as u32);
                }
            }
            values
        }
        WordLayout::Unpadded => {
            let count = words.len() * 64 / m;
            let mut values = Vec::with_capacity(count);
            for i in 0..count {
                let bit = i * m;
                let (word, offset) = (bit / 64, bit % 64);
                let mut value = words[word] as u64 >> offset;
                if offset + m > 64 {
                    value |= (words[word + 1] as u64) << (64 - offset);
                }
                values.push((value & mask) as u32);
            }
            values
        }
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNPADDED: DataVersion = DataVersion(2526);
    const PADDED: DataVersion = DataVersion(2527);

    fn sample(len: usize, magnitude: u32) -> Vec<u32> {
        let max = bit_mask(magnitude) as u32;
        (0..len as u32).map(|i| i.wrapping_mul(2_654_435_761) & max).collect()
    }

    #[test]
    fn test_layout_cutover() {
        assert_eq!(WordLayout::for_version(UNPADDED), WordLayout::Unpadded);
        assert_eq!(WordLayout::for_version(PADDED), WordLayout::Padded);
    }

    #[test]
    fn test_small_array_both_layouts() {
        for version in [UNPADDED, PADDED] {
            let words = encode(&[1, 2, 3], 4, version).unwrap();
            assert_eq!(words, vec![0x321]);
            let decoded = decode(&words, 4, version).unwrap();
            assert_eq!(decoded.len(), 16);
            assert_eq!(&decoded[..3], &[1, 2, 3]);
            assert!(decoded[3..].iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn test_word_counts_differ_when_magnitude_does_not_divide_64() {
        let values = sample(4096, 5);
        let unpadded = encode(&values, 5, UNPADDED).unwrap();
        let padded = encode(&values, 5, PADDED).unwrap();
        assert_eq!(unpadded.len(), 320);
        assert_eq!(padded.len(), 342);
        assert_eq!(&decode(&unpadded, 5, UNPADDED).unwrap()[..4096], &values[..]);
        assert_eq!(&decode(&padded, 5, PADDED).unwrap()[..4096], &values[..]);
    }

    #[test]
    fn test_layouts_agree_when_magnitude_divides_64() {
        for magnitude in [1, 2, 4, 8, 16, 32] {
            let values = sample(300, magnitude);
            assert_eq!(
                encode(&values, magnitude, UNPADDED).unwrap(),
                encode(&values, magnitude, PADDED).unwrap(),
                "magnitude {magnitude}"
            );
        }
    }

    #[test]
    fn test_roundtrip_every_magnitude() {
        for magnitude in 1..=32 {
            let values = sample(1000, magnitude);
            for version in [UNPADDED, PADDED] {
                let words = encode(&values, magnitude, version).unwrap();
                let layout = WordLayout::for_version(version);
                assert_eq!(words.len(), layout.word_count(values.len(), magnitude));
                let decoded = decode(&words, magnitude, version).unwrap();
                assert!(decoded.len() >= values.len());
                assert_eq!(&decoded[..values.len()], &values[..], "magnitude {magnitude}");
            }
        }
    }

    #[test]
    fn test_unpadded_value_split_across_words() {
        // Value 12 occupies bits 60..65: four low bits in word 0, one in word 1.
        let values = vec![31u32; 13];
        let words = encode(&values, 5, UNPADDED).unwrap();
        assert_eq!(words, vec![-1i64, 1]);
        let decoded = decode(&words, 5, UNPADDED).unwrap();
        assert_eq!(decoded.len(), 25);
        assert_eq!(&decoded[..13], &values[..]);
        assert!(decoded[13..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_unpadded_value_ending_on_word_boundary_stays() {
        // Two 32-bit values end exactly on bit 64; the third starts word 1.
        let words = encode(&[u32::MAX, 0x8000_0000, 7], 32, UNPADDED).unwrap();
        assert_eq!(words, vec![0x8000_0000_FFFF_FFFFu64 as i64, 7]);
        assert_eq!(
            decode(&words, 32, UNPADDED).unwrap(),
            vec![u32::MAX, 0x8000_0000, 7, 0]
        );

        // 21 three-bit values end on bit 63; the 22nd spans 63..66.
        let mut values = vec![0u32; 22];
        values[21] = 0b111;
        let words = encode(&values, 3, UNPADDED).unwrap();
        assert_eq!(words, vec![i64::MIN, 0b11]);
        assert_eq!(decode(&words, 3, UNPADDED).unwrap()[21], 0b111);
    }

    #[test]
    fn test_padded_leaves_high_bits_zero() {
        let values = vec![31u32; 13];
        let words = encode(&values, 5, PADDED).unwrap();
        assert_eq!(words, vec![(1i64 << 60) - 1, 31]);
    }

    #[test]
    fn test_excess_bits_are_discarded() {
        let words = encode(&[0xFF, 1], 4, PADDED).unwrap();
        assert_eq!(words, vec![0x1F]);
    }

    #[test]
    fn test_invalid_magnitude() {
        for magnitude in [0, 33] {
            assert!(matches!(
                encode(&[0], magnitude, PADDED),
                Err(CodecError::InvalidArgument(_))
            ));
            assert!(matches!(
                decode(&[0], magnitude, UNPADDED),
                Err(CodecError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(encode(&[], 4, PADDED).unwrap().is_empty());
        assert!(decode(&[], 4, UNPADDED).unwrap().is_empty());
    }
}
