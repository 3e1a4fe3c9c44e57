/*
    Co-simulation harness
*/

use std::fmt;
use std::str::FromStr;

use num_traits::cast::ToPrimitive;
use thiserror::Error;
use tracing::{info, trace};

use crate::format::OracleError;
use crate::oracle::util::{bitvec_to_biguint, leading_one};
use crate::oracle::{BitVec, Flags, Oracle};
use crate::stimulus::TestVector;

/** The hardware simulation this harness drives.
 *
 * The simulator is an external collaborator exposing a single
 * capability: apply stimulus bits to named ports, advance simulated time
 * past the settle point, and read back output bits. Vectors are applied
 * strictly sequentially; the unit under test is combinational, so one
 * `settle` per vector is all the timing model there is.
 *
 */
pub trait Dut {
    /// Drives `bits` onto the input port named `port`.
    fn poke(&mut self, port: &str, bits: &BitVec);

    /// Advances simulated time by one settle unit.
    fn settle(&mut self);

    /// Samples the output port named `port`.
    fn peek(&self, port: &str) -> BitVec;
}

/// Operation select for the units under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    fn is_adder_op(&self) -> bool {
        matches!(self, Operation::Add | Operation::Subtract)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add"),
            Operation::Subtract => write!(f, "subtract"),
            Operation::Multiply => write!(f, "multiply"),
        }
    }
}

impl FromStr for Operation {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            _ => Err(OracleError::UnsupportedOperation(s.to_string())),
        }
    }
}

/// A hardware output that disagreed with the oracle. Carries the full
/// context of the failing vector in one diagnostic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Mismatch {
    #[error(
        "{op}: a={a}, b={b}: expected {expected} flags (u, o, i) = {expected_flags:?}, \
         got {actual} flags {actual_flags:?}"
    )]
    Arithmetic {
        op: Operation,
        a: String,
        b: String,
        expected: String,
        expected_flags: (bool, bool, bool),
        actual: String,
        actual_flags: (bool, bool, bool),
    },

    #[error(
        "leading-one detector: value={value}: expected position {expected:?}, \
         got position {actual} (has_leading_one={has_leading_one})"
    )]
    LeadingOne {
        value: String,
        expected: Option<usize>,
        actual: u64,
        has_leading_one: bool,
    },
}

// Hex rendering of a pattern of arbitrary width for diagnostics.
fn hex(bits: &BitVec) -> String {
    let digits = bits.len().div_ceil(4);
    format!("0x{:0>width$}", bitvec_to_biguint(bits).to_str_radix(16).to_uppercase(), width = digits)
}

/** Drives vectors into the collaborator and judges its outputs.
 *
 * For each vector the comparator drives the operand and operation-select
 * ports, settles once, samples the result and flag ports, and asserts
 * bit-exact and flag-exact equality against the oracle. Commutative
 * operations are driven both ways. A mismatch terminates the vector
 * sequence it occurred in.
 *
 */
pub struct Comparator<D: Dut> {
    dut: D,
    oracle: Oracle,
}

impl<D: Dut> Comparator<D> {
    pub fn new(dut: D, oracle: Oracle) -> Self {
        Self { dut, oracle }
    }

    /// Checks one vector, driving `(a, b)` and, for commutative
    /// operations, `(b, a)` as well.
    pub fn check(&mut self, op: Operation, vector: &TestVector) -> Result<(), Mismatch> {
        let subtract = vector.subtract || op == Operation::Subtract;
        self.check_once(op, &vector.a, &vector.b, subtract)?;
        if !subtract {
            self.check_once(op, &vector.b, &vector.a, subtract)?;
        }
        Ok(())
    }

    /// Applies a vector sequence fail-fast, returning how many vectors
    /// were checked.
    pub fn run(
        &mut self,
        label: &str,
        op: Operation,
        vectors: impl IntoIterator<Item = TestVector>,
    ) -> Result<usize, Mismatch> {
        let mut checked = 0;
        for vector in vectors {
            self.check(op, &vector)?;
            checked += 1;
        }
        info!(label, %op, checked, "vector sequence passed");
        Ok(checked)
    }

    /// Drives the leading-one detector with `value` and checks the
    /// reported position. The position port is only compared when a
    /// leading one exists.
    pub fn check_leading_one(&mut self, value: &BitVec) -> Result<(), Mismatch> {
        self.dut.poke("value", value);
        self.dut.settle();

        let position = bitvec_to_biguint(&self.dut.peek("position"))
            .to_u64()
            .unwrap_or(u64::MAX);
        let has_leading_one = self.dut.peek("has_leading_one").any();
        let expected = leading_one(value);
        let ok = match expected {
            Some(pos) => has_leading_one && position == pos as u64,
            None => !has_leading_one,
        };
        if ok {
            trace!(value = %hex(value), position, has_leading_one, "leading-one vector passed");
            Ok(())
        } else {
            Err(Mismatch::LeadingOne {
                value: hex(value),
                expected,
                actual: position,
                has_leading_one,
            })
        }
    }

    fn check_once(
        &mut self,
        op: Operation,
        a: &BitVec,
        b: &BitVec,
        subtract: bool,
    ) -> Result<(), Mismatch> {
        let expected = match op {
            Operation::Add | Operation::Subtract => self.oracle.add(a, b, subtract),
            Operation::Multiply => self.oracle.mul(a, b),
        };

        self.dut.poke("a", a);
        self.dut.poke("b", b);
        if op.is_adder_op() {
            let mut bit = BitVec::repeat(false, 1);
            bit.set(0, subtract);
            self.dut.poke("subtract", &bit);
        }
        self.dut.settle();

        let out = self.dut.peek("out");
        let actual_flags = Flags::default()
            .with_underflow(self.dut.peek("underflow_flag").any())
            .with_overflow(self.dut.peek("overflow_flag").any())
            .with_invalid_operation(self.dut.peek("invalid_operation_flag").any());

        let expected_bits = expected.bits();
        if out == expected_bits && actual_flags == expected.flags() {
            trace!(%op, a = %hex(a), b = %hex(b), out = %hex(&out), "vector passed");
            Ok(())
        } else {
            Err(Mismatch::Arithmetic {
                op,
                a: hex(a),
                b: hex(b),
                expected: hex(&expected_bits),
                expected_flags: expected.flags().as_tuple(),
                actual: hex(&out),
                actual_flags: actual_flags.as_tuple(),
            })
        }
    }
}
