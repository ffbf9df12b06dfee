//! Utilities.

use arrayvec::ArrayVec;

/// Maximum width of a bit vector handled by the helpers below.
pub const MAX_BITS: usize = 16;

/// Returns ceiling log2.
pub const fn clog2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}

/// Returns the low `width` bits of `value`, most significant bit first (wire order).
pub fn msb_first_bits(value: u16, width: usize) -> ArrayVec<bool, MAX_BITS> {
    assert!(width <= MAX_BITS, "Width ({}) is larger than {}", width, MAX_BITS);
    (0..width).rev().map(|i| (value >> i) & 1 != 0).collect()
}

/// Packs bits given most significant bit first. Bits beyond the last [`MAX_BITS`] are shifted out.
pub fn bits_to_u16<I>(bits: I) -> u16
where I: IntoIterator<Item = bool> {
    bits.into_iter().fold(0, |acc, bit| (acc << 1) | u16::from(bit))
}

/// Returns bit `index` of `value`.
pub const fn bit(value: u16, index: usize) -> bool { (value >> index) & 1 != 0 }
