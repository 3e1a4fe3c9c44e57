/*
    Rounding to nearest, ties to even
*/

use std::ops::AddAssign;

use super::util::{bitvec_to_biguint, biguint_to_bitvec};
use super::*;

impl FloatValue {
    // Rounds an exact finite value `(-1)^s * c * 2^exp` into `format`.
    //
    // `c` may have any width and any normalization; the three rounding
    // bits are derived from the discarded low part:
    //  `half`: the exact value is at least half way to the next
    //   representable float
    //  `quarter`: the exact value is either 1/4 or 3/4 of the way
    //   (depending on `half`)
    //  `sticky`: any set bit below the other two
    pub(crate) fn round_finite(format: FloatFormat, s: bool, mut exp: i64, mut c: BitVec) -> Self {
        if c.not_any() {
            // The exceptional case: exact zero
            // Return zero, no flags are raised
            return Self::zero(format, s);
        }

        let prec = format.prec();

        // Drop leading zeros
        let lz = c.last_one().unwrap() + 1;
        if lz < c.len() {
            c.truncate(lz);
        }

        // Widen so the significand holds the output precision plus the
        // three rounding bits, and record the bits added
        if c.len() < prec + 3 {
            let padding = prec + 3 - c.len();
            c.extend(BitVec::repeat(false, padding));
            c.shift_right(padding);
            exp -= padding as i64;
        }

        // `c_new` - highest `prec` bits
        // `half_bit` - MSB of the low part
        // `quarter_bit` - next bit of the low part
        // `sticky_bit` - OR of the rest of the low part
        let diff = c.len() - prec;
        let (low, high) = c.split_at(diff);
        let mut c_new: BitVec = high.into();
        let mut half_bit = low[diff - 1];
        let mut quarter_bit = low[diff - 2];
        let mut sticky_bit = low[..diff - 2].any();
        exp += diff as i64;

        // shift into the subnormal regime if the exponent is too small
        while exp < format.expmin() {
            sticky_bit |= quarter_bit;
            quarter_bit = half_bit;
            half_bit = c_new[0];
            c_new.shift_left(1);
            exp += 1;
        }

        Self::round_finalize(format, s, exp, c_new, half_bit, quarter_bit, sticky_bit)
    }

    // Constructs the rounded value from the rounding information.
    // The inputs must encode a non-zero finite exact value.
    fn round_finalize(
        format: FloatFormat,
        s: bool,
        mut exp: i64,
        mut c: BitVec,
        half_bit: bool,
        quarter_bit: bool,
        sticky_bit: bool,
    ) -> Self {
        let prec = format.prec();

        // Round to nearest, ties to even: increment on a clear majority,
        // break exact ties toward an even LSB.
        let qs_bit = quarter_bit || sticky_bit;
        let increment = half_bit && (qs_bit || c[0]);
        if increment {
            // increment the significand
            // possibly need to adjust the exponent on carry-out
            let mut i = bitvec_to_biguint(&c);
            i.add_assign(1_u8);
            let c_ext = biguint_to_bitvec(i, prec + 1);
            let carry = c_ext[prec];

            c = c_ext[..prec].into();
            if carry {
                c.set(prec - 1, true);
                exp += 1;
            }
        }

        let inexact = half_bit || quarter_bit || sticky_bit;

        // Overflow: round-to-nearest carries every overflow to infinity
        if exp > format.expmax() {
            return Self {
                format,
                num: FloatNum::Infinity(s),
                flags: Flags::default().with_overflow(true),
            };
        }

        // Sanity checking
        assert_eq!(
            c.len(),
            prec,
            "unexpected significand width after rounding: {}, expected {}",
            c.len(),
            prec
        );
        assert!(
            exp >= format.expmin() && exp <= format.expmax(),
            "unexpected exponent after rounding: {} [{}, {}]",
            exp,
            format.expmin(),
            format.expmax()
        );

        // Underflow: the rounded magnitude vanished entirely, or it sits
        // at the denormal threshold (the smallest subnormal) and the
        // exact value could not be represented without precision loss
        let vanished = c.not_any();
        let at_threshold = exp == format.expmin() && c[0] && c[1..].not_any();
        let underflow = vanished || (at_threshold && inexact);

        let num = if vanished {
            FloatNum::Number(s, 0, BitVec::repeat(false, prec))
        } else {
            FloatNum::Number(s, exp, c)
        };

        Self {
            format,
            num,
            flags: Flags::default().with_underflow(underflow),
        }
    }
}
