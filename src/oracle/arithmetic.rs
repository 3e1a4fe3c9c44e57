/*
    Arithmetic
*/

use bitvec::prelude::Lsb0;
use bitvec::slice::BitSlice;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

use super::util::{bitvec_to_biguint, biguint_to_bitvec};
use super::*;

// Dispatch helpers shared by both operations
impl Oracle {
    // Canonical quiet NaN carrying the invalid flag when the policy
    // escalates the given operand pair.
    fn nan_result(&self, a: &FloatValue, b: &FloatValue) -> FloatValue {
        let invalid = match self.nan_policy {
            NanPolicy::AnyNan => true,
            NanPolicy::SignalingOnly => {
                a.is_quiet_nan() == Some(false) || b.is_quiet_nan() == Some(false)
            }
        };
        let mut r = FloatValue::canonical_nan(self.format);
        r.flags = Flags::default().with_invalid_operation(invalid);
        r
    }

    fn invalid_nan(&self) -> FloatValue {
        let mut r = FloatValue::canonical_nan(self.format);
        r.flags = Flags::default().with_invalid_operation(true);
        r
    }

    fn overflow_infinity(&self, sign: bool) -> FloatValue {
        let mut r = FloatValue::infinity(self.format, sign);
        r.flags = Flags::default().with_overflow(true);
        r
    }
}

impl Oracle {
    /// Computes the expected sum (or difference, with `subtract`) of two
    /// packed operands, returning the result value with its flags.
    pub fn add(
        &self,
        a_bits: &BitSlice<u32, Lsb0>,
        b_bits: &BitSlice<u32, Lsb0>,
        subtract: bool,
    ) -> FloatValue {
        let a = FloatValue::from_bits(self.format, a_bits);
        let b_raw = FloatValue::from_bits(self.format, b_bits);
        let b = if subtract { b_raw.negated() } else { b_raw.clone() };

        if a.is_nan() || b.is_nan() {
            // any NaN operand collapses to the canonical quiet NaN
            self.nan_result(&a, &b)
        } else if a.is_infinity() && b.is_infinity() {
            // The cancellation check compares the operand signs as
            // presented; the subtract select does not enter it.
            if a.sign() != b_raw.sign() {
                self.invalid_nan()
            } else {
                self.overflow_infinity(a.sign())
            }
        } else if a.is_infinity() {
            // infinite results are reported through the overflow flag
            self.overflow_infinity(a.sign())
        } else if b.is_infinity() {
            self.overflow_infinity(b.sign())
        } else if a.is_zero() && b.is_zero() {
            // -0 only when both effective signs are negative
            FloatValue::zero(self.format, a.sign() && b.sign())
        } else {
            let (s1, exp1, c1) = match &a.num {
                FloatNum::Number(s, exp, c) => (*s, *exp, c),
                _ => unreachable!("operand is finite"),
            };
            let (s2, exp2, c2) = match &b.num {
                FloatNum::Number(s, exp, c) => (*s, *exp, c),
                _ => unreachable!("operand is finite"),
            };

            // align to the smaller exponent and sum exactly
            let exp = i64::min(exp1, exp2);
            let u1 = bitvec_to_biguint(c1) << (exp1 - exp) as u64;
            let u2 = bitvec_to_biguint(c2) << (exp2 - exp) as u64;
            let i1 = BigInt::from_biguint(if s1 { Sign::Minus } else { Sign::Plus }, u1);
            let i2 = BigInt::from_biguint(if s2 { Sign::Minus } else { Sign::Plus }, u2);
            let sum = i1 + i2;

            let (sign, mag) = sum.into_parts();
            if mag.is_zero() {
                // exact cancellation of equal magnitudes: +0 under
                // round-to-nearest, except that an explicit subtraction
                // keeps the first operand's sign
                FloatValue::zero(self.format, subtract && s1)
            } else {
                let s = sign == Sign::Minus;
                let width = mag.bits() as usize;
                let c = biguint_to_bitvec(mag, width);
                // the adder keeps tiny rounded results; underflow from
                // the rounding step is informational only
                FloatValue::round_finite(self.format, s, exp, c)
            }
        }
    }

    /// Computes the expected product of two packed operands, returning
    /// the result value with its flags.
    pub fn mul(&self, a_bits: &BitSlice<u32, Lsb0>, b_bits: &BitSlice<u32, Lsb0>) -> FloatValue {
        let a = FloatValue::from_bits(self.format, a_bits);
        let b = FloatValue::from_bits(self.format, b_bits);
        let sign = a.sign() != b.sign();

        if a.is_nan() || b.is_nan() {
            self.nan_result(&a, &b)
        } else if a.is_infinity() || b.is_infinity() {
            if a.is_zero() || b.is_zero() {
                // infinity times zero has no definable result
                self.invalid_nan()
            } else {
                // infinity times finite-nonzero or infinity
                self.overflow_infinity(sign)
            }
        } else if a.is_zero() || b.is_zero() {
            FloatValue::zero(self.format, sign)
        } else {
            let (exp1, c1) = match &a.num {
                FloatNum::Number(_, exp, c) => (*exp, c),
                _ => unreachable!("operand is finite"),
            };
            let (exp2, c2) = match &b.num {
                FloatNum::Number(_, exp, c) => (*exp, c),
                _ => unreachable!("operand is finite"),
            };

            // exact product of the integer significands
            let exp = exp1 + exp2;
            let u = bitvec_to_biguint(c1) * bitvec_to_biguint(c2);

            // the multiplier produces no denormals: anything at or below
            // the threshold is flushed to a zero that keeps the XOR sign
            if Self::at_or_below_threshold(&self.format, exp, &u) {
                return self.flushed_zero(sign);
            }

            let c = biguint_to_bitvec(u, c1.len() + c2.len());
            let mut r = FloatValue::round_finite(self.format, sign, exp, c);
            if r.is_zero() {
                // rounded off to nothing: flush
                return self.flushed_zero(sign);
            }
            // tininess above the threshold is not reported by the
            // multiplier; only rounding overflow survives
            r.flags = Flags::default().with_overflow(r.flags.overflow);
            r
        }
    }

    // True if `u * 2^exp` is at or below the smallest positive
    // representable magnitude `2^expmin`.
    fn at_or_below_threshold(format: &FloatFormat, exp: i64, u: &BigUint) -> bool {
        let d = format.expmin() - exp;
        if d < 0 {
            return false;
        }
        *u <= BigUint::from(1u8) << d as u64
    }

    fn flushed_zero(&self, sign: bool) -> FloatValue {
        let mut r = FloatValue::zero(self.format, sign);
        r.flags = Flags::default().with_underflow(true);
        r
    }
}
