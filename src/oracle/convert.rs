/*
    Conversions between packed patterns and `FloatValue`
*/

use bitvec::prelude::Lsb0;
use bitvec::slice::BitSlice;
use half::f16;

use super::util::{bits_from_u64, bits_to_u64};
use super::*;
use crate::format::OracleError;

/// Splits a packed pattern into its raw field triple.
///
/// Pure bit slicing over the `[sign:1][exponent:E][mantissa:M]` layout;
/// total for any pattern of the format's width.
pub fn decode(bv: &BitSlice<u32, Lsb0>, format: &FloatFormat) -> Fields {
    let w = format.total_width();
    let m = format.mantissa_width();
    assert_eq!(
        bv.len(),
        w,
        "expected a pattern of width {}, received {}",
        w,
        bv.len()
    );

    Fields {
        sign: bv[w - 1],
        exponent: bits_to_u64(&bv[m..w - 1]),
        mantissa: bv[..m].into(),
    }
}

impl Fields {
    /// Classifies the field triple.
    pub fn classify(&self, format: &FloatFormat) -> FloatClass {
        let m = format.mantissa_width();
        let exp_max = (1u64 << format.exponent_width()) - 1;

        if self.exponent == exp_max {
            if self.mantissa.not_any() {
                FloatClass::Infinity
            } else if self.mantissa[m - 1] {
                FloatClass::QuietNan
            } else {
                FloatClass::SignalingNan
            }
        } else if self.exponent == 0 {
            if self.mantissa.not_any() {
                FloatClass::Zero
            } else {
                FloatClass::Denormal
            }
        } else {
            FloatClass::Normal
        }
    }
}

/// Encodes a host double into a packed pattern using the native rounding
/// of the nearest supported width. Fails when the format's total width
/// has no host-backed path.
pub fn encode(value: f64, format: &FloatFormat) -> Result<BitVec, OracleError> {
    let w = format.total_width();
    let raw = match w {
        16 => f16::from_f64(value).to_bits() as u64,
        32 => (value as f32).to_bits() as u64,
        64 => value.to_bits(),
        _ => return Err(OracleError::UnsupportedWidth(w)),
    };
    Ok(bits_from_u64(raw, w))
}

// Packing utilities
impl FloatValue {
    // Assembles a packed pattern from the three fields.
    fn pack_components(format: &FloatFormat, s: bool, e: BitVec, m: BitVec) -> BitVec {
        let ew = format.exponent_width();
        let mw = format.mantissa_width();
        assert_eq!(
            e.len(),
            ew,
            "trying to pack an exponent field of width {}, expected {}",
            e.len(),
            ew
        );
        assert_eq!(
            m.len(),
            mw,
            "trying to pack a mantissa field of width {}, expected {}",
            m.len(),
            mw
        );

        let mut bv = BitVec::repeat(false, format.total_width());
        for (i, b) in m.iter().enumerate() {
            bv.set(i, *b);
        }
        for (i, b) in e.iter().enumerate() {
            bv.set(i + mw, *b);
        }
        bv.set(format.total_width() - 1, s);
        bv
    }
}

// Unpacking a pattern into a `FloatValue`
impl FloatValue {
    /// Interprets a packed pattern in `format`. Total and lossless for
    /// any pattern of the format's width.
    pub fn from_bits(format: FloatFormat, bv: &BitSlice<u32, Lsb0>) -> Self {
        let fields = decode(bv, &format);
        let mw = format.mantissa_width();
        let exp_max = (1u64 << format.exponent_width()) - 1;
        let s = fields.sign;
        let mut m = fields.mantissa;

        // branch on the exponent field
        if fields.exponent == exp_max {
            if m.not_any() {
                // infinity
                Self::infinity(format, s)
            } else {
                // NaN: top mantissa bit is the quiet bit
                Self::nan(format, s, m[mw - 1], m[..mw - 1].into())
            }
        } else if fields.exponent == 0 {
            if m.not_any() {
                // zero
                Self::zero(format, s)
            } else {
                // subnormal: no hidden bit, fixed minimum exponent
                m.push(false);
                Self {
                    format,
                    num: FloatNum::Number(s, format.expmin(), m),
                    flags: Flags::default(),
                }
            }
        } else {
            // normal: materialize the hidden bit
            m.push(true);
            let exp = fields.exponent as i64 - format.bias() - mw as i64;
            Self {
                format,
                num: FloatNum::Number(s, exp, m),
                flags: Flags::default(),
            }
        }
    }

    /// Interprets the low `W` bits of an integer pattern in `format`.
    pub fn from_u64(format: FloatFormat, bits: u64) -> Self {
        let bv = bits_from_u64(bits, format.total_width());
        Self::from_bits(format, &bv)
    }

    /// Packs this value back into its pattern. Lossless inverse of
    /// `from_bits`.
    pub fn bits(&self) -> BitVec {
        let format = &self.format;
        let ew = format.exponent_width();
        let mw = format.mantissa_width();

        match &self.num {
            FloatNum::Number(s, exp, c) => {
                if c.not_any() {
                    // zero
                    let e = BitVec::repeat(false, ew);
                    let m = BitVec::repeat(false, mw);
                    Self::pack_components(format, *s, e, m)
                } else if c[mw] {
                    // normal: drop the hidden bit, rebias the exponent
                    let field = exp + format.bias() + mw as i64;
                    let e = bits_from_u64(field as u64, ew);
                    let m: BitVec = c[..mw].into();
                    Self::pack_components(format, *s, e, m)
                } else {
                    // subnormal
                    let e = BitVec::repeat(false, ew);
                    let m: BitVec = c[..mw].into();
                    Self::pack_components(format, *s, e, m)
                }
            }
            FloatNum::Infinity(s) => {
                let e = BitVec::repeat(true, ew);
                let m = BitVec::repeat(false, mw);
                Self::pack_components(format, *s, e, m)
            }
            FloatNum::Nan(s, quiet, payload) => {
                let e = BitVec::repeat(true, ew);
                let mut m = payload.clone();
                m.push(*quiet); // mantissa = quiet | payload
                Self::pack_components(format, *s, e, m)
            }
        }
    }

    /// The packed pattern as an integer, for formats of at most 64 bits.
    pub fn bits_u64(&self) -> u64 {
        bits_to_u64(&self.bits())
    }
}
