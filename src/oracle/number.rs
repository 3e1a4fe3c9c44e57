/*
    Constructors and getters for `FloatValue`
*/

use super::*;

// Constructors
impl FloatValue {
    /// Returns a zero with a particular sign.
    pub fn zero(format: FloatFormat, sign: bool) -> Self {
        Self {
            format,
            num: FloatNum::Number(sign, 0, BitVec::repeat(false, format.prec())),
            flags: Flags::default(),
        }
    }

    /// Returns an infinity with a particular sign.
    pub fn infinity(format: FloatFormat, sign: bool) -> Self {
        Self {
            format,
            num: FloatNum::Infinity(sign),
            flags: Flags::default(),
        }
    }

    /// Returns a NaN with the given sign, quiet bit and payload.
    pub fn nan(format: FloatFormat, sign: bool, quiet: bool, payload: BitVec) -> Self {
        assert_eq!(
            payload.len(),
            format.nan_payload_width(),
            "expected a payload size of {}, received {}",
            format.nan_payload_width(),
            payload.len()
        );
        Self {
            format,
            num: FloatNum::Nan(sign, quiet, payload),
            flags: Flags::default(),
        }
    }

    /// The canonical quiet NaN every invalid operation collapses to:
    /// sign set, exponent all-ones, mantissa `1` followed by zeros
    /// (`0xFFC00000` in single precision).
    pub fn canonical_nan(format: FloatFormat) -> Self {
        Self::nan(
            format,
            true,
            true,
            BitVec::repeat(false, format.nan_payload_width()),
        )
    }

    /// The smallest positive subnormal, optionally negated; its magnitude
    /// is the format's denormal threshold.
    pub fn smallest_subnormal(format: FloatFormat, sign: bool) -> Self {
        let mut c = BitVec::repeat(false, format.prec());
        c.set(0, true);
        Self {
            format,
            num: FloatNum::Number(sign, format.expmin(), c),
            flags: Flags::default(),
        }
    }

    /// The largest subnormal: exponent field zero, mantissa all-ones.
    pub fn largest_subnormal(format: FloatFormat, sign: bool) -> Self {
        let mut c = BitVec::repeat(true, format.prec());
        c.set(format.mantissa_width(), false);
        Self {
            format,
            num: FloatNum::Number(sign, format.expmin(), c),
            flags: Flags::default(),
        }
    }
}

// Getters
impl FloatValue {
    /// Returns the format this value is encoded in.
    pub fn format(&self) -> &FloatFormat {
        &self.format
    }

    /// Returns the sign of this value.
    pub fn sign(&self) -> bool {
        match self.num {
            FloatNum::Number(s, _, _) => s,
            FloatNum::Infinity(s) => s,
            FloatNum::Nan(s, _, _) => s,
        }
    }

    /// Returns the exponent of the integer significand.
    /// Wrapped in an option since only finite numbers have one.
    pub fn exponent(&self) -> Option<i64> {
        match self.num {
            FloatNum::Number(_, exp, _) => Some(exp),
            _ => None,
        }
    }

    /// Returns the integer significand (hidden bit included).
    /// Wrapped in an option since only finite numbers have one.
    pub fn significand(&self) -> Option<BitVec> {
        match &self.num {
            FloatNum::Number(_, _, c) => Some(c.clone()),
            _ => None,
        }
    }

    /// Returns true if this value encodes a zero.
    pub fn is_zero(&self) -> bool {
        match &self.num {
            FloatNum::Number(_, _, c) => c.not_any(),
            _ => false,
        }
    }

    /// Returns true if this value encodes a subnormal number.
    pub fn is_subnormal(&self) -> bool {
        match &self.num {
            FloatNum::Number(_, exp, c) => {
                c.any() && *exp == self.format.expmin() && !c[self.format.mantissa_width()]
            }
            _ => false,
        }
    }

    /// Returns true if this value encodes a normal number.
    pub fn is_normal(&self) -> bool {
        match &self.num {
            FloatNum::Number(_, _, c) => c[self.format.mantissa_width()],
            _ => false,
        }
    }

    /// Returns true if this value encodes an infinity.
    pub fn is_infinity(&self) -> bool {
        matches!(self.num, FloatNum::Infinity(_))
    }

    /// Returns true if this value encodes a NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self.num, FloatNum::Nan(_, _, _))
    }

    /// Returns true if this value encodes a quiet NaN.
    /// Wrapped in an option since only NaNs carry the quiet bit.
    pub fn is_quiet_nan(&self) -> Option<bool> {
        match self.num {
            FloatNum::Nan(_, quiet, _) => Some(quiet),
            _ => None,
        }
    }

    /// Returns the NaN payload.
    /// Wrapped in an option since only a NaN has a payload.
    pub fn nan_payload(&self) -> Option<BitVec> {
        match &self.num {
            FloatNum::Nan(_, _, payload) => Some(payload.clone()),
            _ => None,
        }
    }

    /// Returns the behavioral class of this value.
    pub fn class(&self) -> FloatClass {
        match &self.num {
            FloatNum::Number(_, _, c) if c.not_any() => FloatClass::Zero,
            FloatNum::Number(_, _, c) if !c[self.format.mantissa_width()] => FloatClass::Denormal,
            FloatNum::Number(_, _, _) => FloatClass::Normal,
            FloatNum::Infinity(_) => FloatClass::Infinity,
            FloatNum::Nan(_, true, _) => FloatClass::QuietNan,
            FloatNum::Nan(_, false, _) => FloatClass::SignalingNan,
        }
    }

    /// Returns the flags raised by the operation that created this value.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Returns true if the `underflow` flag was raised.
    pub fn underflow_flag(&self) -> bool {
        self.flags.underflow
    }

    /// Returns true if the `overflow` flag was raised.
    pub fn overflow_flag(&self) -> bool {
        self.flags.overflow
    }

    /// Returns true if the `invalid_operation` flag was raised.
    pub fn invalid_operation_flag(&self) -> bool {
        self.flags.invalid_operation
    }

    // Flips the sign; used by the adder to fold subtraction into addition.
    pub(crate) fn negated(&self) -> Self {
        let num = match &self.num {
            FloatNum::Number(s, exp, c) => FloatNum::Number(!s, *exp, c.clone()),
            FloatNum::Infinity(s) => FloatNum::Infinity(!s),
            FloatNum::Nan(s, quiet, payload) => FloatNum::Nan(!s, *quiet, payload.clone()),
        };
        Self {
            format: self.format,
            num,
            flags: self.flags,
        }
    }
}

impl Flags {
    /// Returns true if the `underflow` flag is raised.
    pub fn underflow(&self) -> bool {
        self.underflow
    }

    /// Returns true if the `overflow` flag is raised.
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    /// Returns true if the `invalid_operation` flag is raised.
    pub fn invalid_operation(&self) -> bool {
        self.invalid_operation
    }

    /// Sets the `underflow` field.
    pub fn with_underflow(mut self, raised: bool) -> Self {
        self.underflow = raised;
        self
    }

    /// Sets the `overflow` field.
    pub fn with_overflow(mut self, raised: bool) -> Self {
        self.overflow = raised;
        self
    }

    /// Sets the `invalid_operation` field.
    pub fn with_invalid_operation(mut self, raised: bool) -> Self {
        self.invalid_operation = raised;
        self
    }

    /// The `(underflow, overflow, invalid_operation)` triple, in the
    /// order the hardware presents its flag ports.
    pub fn as_tuple(&self) -> (bool, bool, bool) {
        (self.underflow, self.overflow, self.invalid_operation)
    }
}
