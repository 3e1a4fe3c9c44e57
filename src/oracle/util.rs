use std::ops::ShlAssign;

use bitvec::field::BitField;
use bitvec::prelude::Lsb0;
use bitvec::slice::BitSlice;
use num_bigint::BigUint;

use super::BitVec;

// Converts a `BitVec` to a `BigUint`
pub(crate) fn bitvec_to_biguint(bv: &BitVec) -> BigUint {
    let mut i = BigUint::default();
    for b in bv.iter().rev() {
        i.shl_assign(1);
        i.set_bit(0, *b);
    }
    i
}

// Converts a `BigUint` to a `BitVec` of exactly `width` bits
pub(crate) fn biguint_to_bitvec(i: BigUint, width: usize) -> BitVec {
    let mut bv = BitVec::from_vec(i.to_u32_digits());
    bv.resize(width, false);
    bv
}

/// Builds a `width`-bit pattern from the low bits of `value`.
pub fn bits_from_u64(value: u64, width: usize) -> BitVec {
    assert!(width <= 64, "pattern wider than 64 bits: {}", width);
    let mut bv = BitVec::repeat(false, width);
    let masked = if width == 64 {
        value
    } else {
        value & ((1u64 << width) - 1)
    };
    bv.store_le(masked);
    bv
}

/// Reads a pattern of at most 64 bits back as an integer.
pub fn bits_to_u64(bv: &BitSlice<u32, Lsb0>) -> u64 {
    assert!(bv.len() <= 64, "pattern wider than 64 bits: {}", bv.len());
    bv.load_le()
}

/// Position of the most significant set bit, if any.
///
/// Reference model for the leading-one detector: `position` is the bit
/// index counted from the least significant end, `None` when no bit is
/// set.
pub fn leading_one(bv: &BitSlice<u32, Lsb0>) -> Option<usize> {
    bv.last_one()
}
