/*
    Bit-exact reference model for the floating-point unit under test
*/

use bitvec::prelude::Lsb0;

use crate::format::FloatFormat;

mod arithmetic;
mod convert;
mod number;
mod round;
pub mod util;

pub use convert::{decode, encode};

/// Packed bit patterns and field slices, least-significant bit first.
pub type BitVec = bitvec::prelude::BitVec<u32, Lsb0>;

// Minimal floating-point encoding grouped by classification
//  - `Number` carries the significand with the hidden bit materialized,
//    as an integer scaled by 2^exp; zero is an all-clear significand
//  - `Nan` carries the quiet bit (top mantissa bit) and the payload below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FloatNum {
    // signed zero or finite number
    // => (sign, exponent, significand)
    Number(bool, i64, BitVec),
    // infinity (+/-)
    // => (sign)
    Infinity(bool),
    // not-a-number
    // => (sign, quiet, payload)
    Nan(bool, bool, BitVec),
}

/// Behavioral class of a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatClass {
    Zero,
    Denormal,
    Normal,
    Infinity,
    QuietNan,
    SignalingNan,
}

/// Raw field triple of a packed pattern: pure bit slicing, no
/// interpretation beyond the `[sign:1][exponent:E][mantissa:M]` layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    pub sign: bool,
    /// Biased exponent field.
    pub exponent: u64,
    pub mantissa: BitVec,
}

/** Status flags reported by the hardware alongside each result.
 *
 * The unit reports three conditions:
 *
 *  - underflow: the result was too small in magnitude to represent
 *      faithfully (the multiplier flushes such results to a signed zero);
 *  - overflow: the result exceeded the largest finite value, including
 *      infinity arithmetic;
 *  - invalid operation: no useful definable result (NaN operands,
 *      cancelling infinities, infinity times zero).
 *
 * At most one primary condition fires per operation.
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub(crate) underflow: bool,
    pub(crate) overflow: bool,
    pub(crate) invalid_operation: bool,
}

/// Whether a quiet NaN operand alone escalates to an invalid operation.
///
/// The hardware under test raises invalid for any NaN operand; strict
/// IEEE-754 reserves the flag for signaling NaNs. Both readings are
/// selectable so either can be checked against the actual hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NanPolicy {
    /// Any NaN operand raises invalid_operation.
    #[default]
    AnyNan,
    /// Only signaling NaN operands raise invalid_operation.
    SignalingOnly,
}

/** A floating-point value in a particular format.
 *
 * Dual representation: the packed `W`-bit pattern (via `bits`) and the
 * decomposed encoding (via the getters). Values produced by the oracle
 * also carry the status flags raised by the operation that created them.
 *
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatValue {
    format: FloatFormat,
    num: FloatNum,
    flags: Flags,
}

/** The arithmetic test oracle.
 *
 * Bound to a resolved format and a NaN escalation policy, it computes the
 * expected result bits and status flags for every operand pair the
 * hardware accepts. All arithmetic is exact integer arithmetic on
 * significands followed by a single rounding step, so its verdicts do not
 * depend on host float precision at any width.
 *
 */
#[derive(Debug, Clone)]
pub struct Oracle {
    format: FloatFormat,
    nan_policy: NanPolicy,
}

impl Oracle {
    /// Creates an oracle for `format` with the hardware's NaN policy
    /// (any NaN operand raises invalid_operation).
    pub fn new(format: FloatFormat) -> Self {
        Self {
            format,
            nan_policy: NanPolicy::AnyNan,
        }
    }

    /// Sets the NaN escalation policy.
    pub fn with_nan_policy(mut self, nan_policy: NanPolicy) -> Self {
        self.nan_policy = nan_policy;
        self
    }

    /// Returns the format this oracle is bound to.
    pub fn format(&self) -> &FloatFormat {
        &self.format
    }

    /// Returns the NaN escalation policy in effect.
    pub fn nan_policy(&self) -> NanPolicy {
        self.nan_policy
    }
}
