//! Width and mask arithmetic for fixed-width unsigned values.

/// Returns the minimum number of bits needed to represent `value`.
///
/// Zero needs zero bits.
pub const fn width_in_bits(value: u32) -> u32 {
    u32::BITS - value.leading_zeros()
}

/// Returns a mask with the `bits` lowest bits set.
///
/// `bits` may be anywhere in `0..=64`.
pub const fn bit_mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// Returns the number of bytes needed to hold `size` values of `magnitude`
/// bits, or `None` if the bit count does not fit in a `usize`.
pub fn bytes_needed(size: usize, magnitude: u32) -> Option<usize> {
    let total_bits = (size as u128).checked_mul(u128::from(magnitude))?;
    let bytes = total_bits.div_ceil(8);
    usize::try_from(bytes).ok().filter(|&b| b <= isize::MAX as usize)
}
