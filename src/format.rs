/*
    Floating-point format description
*/

use thiserror::Error;

/// Configuration errors raised while resolving a format or an operation
/// request. These are the only failure modes of the reference model:
/// once a `FloatFormat` is resolved, every computation over well-formed
/// bit patterns is total.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Total width has no host-backed encoding path.
    #[error("unsupported total width {0}, expected 16, 32 or 64 bits")]
    UnsupportedWidth(usize),

    /// Operation symbol outside the modeled set.
    #[error("unsupported operation `{0}`, expected add, subtract or multiply")]
    UnsupportedOperation(String),

    /// Only round-to-nearest-ties-to-even is modeled.
    #[error("unsupported rounding policy, only round-to-nearest-ties-to-even is modeled")]
    UnsupportedRoundingPolicy,
}

/// Canonical standard instance a format resolves to.
///
/// Resolved exactly once per configuration; callers match on this instead
/// of re-probing widths at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Half,
    Single,
    Double,
    Custom,
}

macro_rules! assert_valid_format {
    ($E:expr, $M:expr) => {
        assert!(
            (1 <= $E) && ($E <= 60),
            "invalid exponent width, must be 1 <= E <= 60: {}",
            $E
        );
        assert!(1 <= $M, "invalid mantissa width, must be 1 <= M: {}", $M);
    };
}

/** A parameterizable IEEE-754-like format.
 *
 * A format is described by the width of the exponent field and the width
 * of the mantissa field; the total width is `1 + E + M` with the sign bit
 * in front. Created once per test configuration and immutable thereafter.
 *
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatFormat {
    exponent_width: usize,
    mantissa_width: usize,
    kind: FormatKind,
}

impl FloatFormat {
    /// Resolves a format from its field widths and rounding policy.
    /// Fails when any rounding policy other than round-to-nearest-ties-to-even
    /// is requested, since no other policy is modeled.
    pub fn resolve(
        exponent_width: usize,
        mantissa_width: usize,
        round_to_nearest_ties_to_even: bool,
    ) -> Result<Self, OracleError> {
        assert_valid_format!(exponent_width, mantissa_width);
        if !round_to_nearest_ties_to_even {
            return Err(OracleError::UnsupportedRoundingPolicy);
        }

        let kind = match (exponent_width, mantissa_width) {
            (5, 10) => FormatKind::Half,
            (8, 23) => FormatKind::Single,
            (11, 52) => FormatKind::Double,
            _ => FormatKind::Custom,
        };

        Ok(Self {
            exponent_width,
            mantissa_width,
            kind,
        })
    }

    /// The IEEE-754 half-precision format (E=5, M=10).
    pub fn half() -> Self {
        Self::resolve(5, 10, true).unwrap()
    }

    /// The IEEE-754 single-precision format (E=8, M=23).
    pub fn single() -> Self {
        Self::resolve(8, 23, true).unwrap()
    }

    /// The IEEE-754 double-precision format (E=11, M=52).
    pub fn double() -> Self {
        Self::resolve(11, 52, true).unwrap()
    }

    /// Returns the canonical standard instance this format resolves to.
    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    /// Returns true if this is the half-precision format.
    pub fn is_half(&self) -> bool {
        self.kind == FormatKind::Half
    }

    /// Returns true if this is the single-precision format.
    pub fn is_single(&self) -> bool {
        self.kind == FormatKind::Single
    }

    /// Returns true if this is the double-precision format.
    pub fn is_double(&self) -> bool {
        self.kind == FormatKind::Double
    }

    /// Bitwidth of the exponent field.
    pub fn exponent_width(&self) -> usize {
        self.exponent_width
    }

    /// Bitwidth of the mantissa field.
    pub fn mantissa_width(&self) -> usize {
        self.mantissa_width
    }

    /// Total bitwidth of the packed representation, `1 + E + M`.
    pub fn total_width(&self) -> usize {
        1 + self.exponent_width + self.mantissa_width
    }

    /// Number of binary digits in the significand when the hidden bit
    /// is materialized. This is just `M + 1`.
    pub fn prec(&self) -> usize {
        self.mantissa_width + 1
    }

    /// Exponent of the largest finite value in this format when it is in
    /// the form `(-1)^s 2^e m` where `m` is a fraction between 1 and 2.
    pub fn emax(&self) -> i64 {
        i64::pow(2, (self.exponent_width - 1) as u32) - 1
    }

    /// Exponent of the smallest normal value in the same form.
    /// This is just `1 - emax`.
    pub fn emin(&self) -> i64 {
        1 - self.emax()
    }

    /// Exponent of the largest finite value when the significand is
    /// expressed as an integer. This is just `emax - M`.
    pub fn expmax(&self) -> i64 {
        self.emax() - self.mantissa_width as i64
    }

    /// Exponent of the smallest subnormal value when the significand is
    /// expressed as an integer. This is just `emin - M`.
    pub fn expmin(&self) -> i64 {
        self.emin() - self.mantissa_width as i64
    }

    /// The exponent field bias. This is just `emax`.
    pub fn bias(&self) -> i64 {
        self.emax()
    }

    /// Bitwidth of the NaN payload, `M - 1`.
    pub fn nan_payload_width(&self) -> usize {
        self.mantissa_width - 1
    }

    /// Smallest positive representable magnitude including subnormals,
    /// `2^-M * 2^-(2^(E-1) - 2)`, as a host double.
    ///
    /// This is the host-value form of the underflow threshold; it
    /// degrades to 0.0 for formats finer than the host double. The oracle
    /// itself compares magnitudes exactly in bit space and never relies
    /// on this value.
    pub fn denormal_threshold(&self) -> f64 {
        let exp = self.expmin();
        if exp > 1023 {
            f64::INFINITY
        } else if exp >= -1022 {
            f64::from_bits(((exp + 1023) as u64) << 52)
        } else if exp >= -1074 {
            f64::from_bits(1u64 << (exp + 1074))
        } else {
            0.0
        }
    }
}
