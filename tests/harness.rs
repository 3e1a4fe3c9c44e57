use std::collections::HashMap;

use fpu_verify::format::FloatFormat;
use fpu_verify::harness::{Comparator, Dut, Mismatch, Operation};
use fpu_verify::oracle::util::{bits_from_u64, bits_to_u64, leading_one};
use fpu_verify::oracle::{BitVec, NanPolicy, Oracle};
use fpu_verify::stimulus::{generate_vectors, handcrafted, Category, TestVector, DEFAULT_DECADES};

// Software stand-in for the hardware: a combinational FPU computed by
// the reference model itself, exposed through the port interface.
struct SoftFpu {
    oracle: Oracle,
    multiplier: bool,
    inputs: HashMap<String, BitVec>,
    outputs: HashMap<String, BitVec>,
}

impl SoftFpu {
    fn adder(oracle: Oracle) -> Self {
        Self {
            oracle,
            multiplier: false,
            inputs: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    fn multiplier(oracle: Oracle) -> Self {
        Self {
            oracle,
            multiplier: true,
            inputs: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    fn flag(raised: bool) -> BitVec {
        let mut bit = BitVec::repeat(false, 1);
        bit.set(0, raised);
        bit
    }
}

impl Dut for SoftFpu {
    fn poke(&mut self, port: &str, bits: &BitVec) {
        self.inputs.insert(port.to_string(), bits.clone());
    }

    fn settle(&mut self) {
        let a = &self.inputs["a"];
        let b = &self.inputs["b"];
        let r = if self.multiplier {
            self.oracle.mul(a, b)
        } else {
            let subtract = self.inputs["subtract"].any();
            self.oracle.add(a, b, subtract)
        };

        self.outputs.insert("out".to_string(), r.bits());
        self.outputs
            .insert("underflow_flag".to_string(), Self::flag(r.underflow_flag()));
        self.outputs
            .insert("overflow_flag".to_string(), Self::flag(r.overflow_flag()));
        self.outputs.insert(
            "invalid_operation_flag".to_string(),
            Self::flag(r.invalid_operation_flag()),
        );
    }

    fn peek(&self, port: &str) -> BitVec {
        self.outputs[port].clone()
    }
}

// Same FPU with a stuck-at fault on the result LSB.
struct StuckLsbFpu(SoftFpu);

impl Dut for StuckLsbFpu {
    fn poke(&mut self, port: &str, bits: &BitVec) {
        self.0.poke(port, bits);
    }

    fn settle(&mut self) {
        self.0.settle();
    }

    fn peek(&self, port: &str) -> BitVec {
        let mut bits = self.0.peek(port);
        if port == "out" {
            bits.set(0, true);
        }
        bits
    }
}

// Software stand-in for the leading-one detector.
struct SoftDetector {
    value: BitVec,
    broken: bool,
}

impl SoftDetector {
    fn new() -> Self {
        Self {
            value: BitVec::new(),
            broken: false,
        }
    }
}

impl Dut for SoftDetector {
    fn poke(&mut self, port: &str, bits: &BitVec) {
        assert_eq!(port, "value");
        self.value = bits.clone();
    }

    fn settle(&mut self) {}

    fn peek(&self, port: &str) -> BitVec {
        let position = leading_one(&self.value);
        match port {
            "position" => {
                let reported = position.unwrap_or(0) + usize::from(self.broken);
                bits_from_u64(reported as u64, 8)
            }
            "has_leading_one" => SoftFpu::flag(position.is_some()),
            _ => panic!("unknown port {}", port),
        }
    }
}

#[test]
fn adder_handcrafted_categories() {
    let format = FloatFormat::single();
    let dut = SoftFpu::adder(Oracle::new(format));
    let mut comparator = Comparator::new(dut, Oracle::new(format));

    for category in Category::ALL {
        let vectors = handcrafted(&format, category);
        assert!(!vectors.is_empty());
        let checked = comparator
            .run("adder handcrafted", Operation::Add, vectors)
            .unwrap();
        assert!(checked > 0);
    }
}

#[test]
fn multiplier_handcrafted_categories() {
    let format = FloatFormat::single();
    let dut = SoftFpu::multiplier(Oracle::new(format));
    let mut comparator = Comparator::new(dut, Oracle::new(format));

    for category in Category::ALL {
        let vectors = handcrafted(&format, category);
        comparator
            .run("multiplier handcrafted", Operation::Multiply, vectors)
            .unwrap();
    }
}

#[test]
fn half_precision_handcrafted() {
    let format = FloatFormat::half();
    let dut = SoftFpu::adder(Oracle::new(format));
    let mut comparator = Comparator::new(dut, Oracle::new(format));

    for category in Category::ALL {
        comparator
            .run("half adder", Operation::Add, handcrafted(&format, category))
            .unwrap();
    }
}

#[test]
fn custom_formats_have_no_handcrafted_vectors() {
    let custom = FloatFormat::resolve(6, 9, true).unwrap();
    for category in Category::ALL {
        assert!(handcrafted(&custom, category).is_empty());
    }
}

#[test]
fn adder_random_sweep() {
    let format = FloatFormat::single();
    let dut = SoftFpu::adder(Oracle::new(format));
    let mut comparator = Comparator::new(dut, Oracle::new(format));

    let vectors = generate_vectors(0xF10A7, &DEFAULT_DECADES, 25, &format).unwrap();
    let checked = comparator
        .run("adder random", Operation::Add, vectors)
        .unwrap();
    assert_eq!(checked, DEFAULT_DECADES.len() * 25);
}

#[test]
fn multiplier_random_sweep() {
    let format = FloatFormat::double();
    let dut = SoftFpu::multiplier(Oracle::new(format));
    let mut comparator = Comparator::new(dut, Oracle::new(format));

    let vectors = generate_vectors(0xF10A7, &[-300, -3, 0, 24], 25, &format).unwrap();
    comparator
        .run("multiplier random", Operation::Multiply, vectors)
        .unwrap();
}

#[test]
fn random_vectors_are_deterministic() {
    let format = FloatFormat::single();
    let decades = [-3, 0, 6];

    let first: Vec<TestVector> = generate_vectors(42, &decades, 50, &format).unwrap().collect();
    let again: Vec<TestVector> = generate_vectors(42, &decades, 50, &format).unwrap().collect();
    let other: Vec<TestVector> = generate_vectors(43, &decades, 50, &format).unwrap().collect();

    assert_eq!(first.len(), 150);
    assert_eq!(first, again, "same seed must replay the same sequence");
    assert_ne!(first, other, "different seeds must diverge");
}

#[test]
fn mismatch_reports_full_context() {
    let format = FloatFormat::single();
    let dut = StuckLsbFpu(SoftFpu::adder(Oracle::new(format)));
    let mut comparator = Comparator::new(dut, Oracle::new(format));

    let vectors = handcrafted(&format, Category::NormalArithmetic);
    let err = comparator
        .run("broken adder", Operation::Add, vectors)
        .unwrap_err();

    match &err {
        Mismatch::Arithmetic { op, a, expected, actual, .. } => {
            assert_eq!(*op, Operation::Add);
            assert_eq!(a, "0x40400000");
            assert_ne!(expected, actual);
        }
        other => panic!("unexpected mismatch kind: {:?}", other),
    }

    let message = err.to_string();
    assert!(message.contains("0x40400000"), "diagnostic lists the operands: {}", message);
    assert!(message.contains("expected"), "diagnostic lists the expectation: {}", message);
}

#[test]
fn nan_policy_disagreement_is_caught() {
    // hardware escalates any NaN; an oracle holding the strict-IEEE
    // reading must flag the difference on a quiet NaN vector
    let format = FloatFormat::single();
    let hardware = SoftFpu::adder(Oracle::new(format));
    let strict = Oracle::new(format).with_nan_policy(NanPolicy::SignalingOnly);
    let mut comparator = Comparator::new(hardware, strict);

    let qnan = bits_from_u64(0xFFC00000, 32);
    let three = bits_from_u64(0x40400000, 32);
    let vector = TestVector {
        a: qnan,
        b: three,
        subtract: false,
    };
    assert!(comparator.check(Operation::Add, &vector).is_err());
}

#[test]
fn detector_single_one_positions() {
    let oracle = Oracle::new(FloatFormat::single());
    let mut comparator = Comparator::new(SoftDetector::new(), oracle);

    for width in 0..8 {
        let value = bits_from_u64(1 << width, 8);
        comparator.check_leading_one(&value).unwrap();
    }
}

#[test]
fn detector_all_numbers() {
    let oracle = Oracle::new(FloatFormat::single());
    let mut comparator = Comparator::new(SoftDetector::new(), oracle);

    for entry in 0u64..256 {
        let value = bits_from_u64(entry, 8);
        assert_eq!(
            leading_one(&value),
            if entry == 0 { None } else { Some(63 - entry.leading_zeros() as usize) }
        );
        comparator.check_leading_one(&value).unwrap();
    }
}

#[test]
fn detector_input_without_one() {
    let oracle = Oracle::new(FloatFormat::single());
    let mut comparator = Comparator::new(SoftDetector::new(), oracle);
    comparator.check_leading_one(&bits_from_u64(0, 8)).unwrap();
}

#[test]
fn detector_mismatch_is_reported() {
    let oracle = Oracle::new(FloatFormat::single());
    let mut detector = SoftDetector::new();
    detector.broken = true;
    let mut comparator = Comparator::new(detector, oracle);

    let err = comparator
        .check_leading_one(&bits_from_u64(0b0010_0000, 8))
        .unwrap_err();
    assert!(matches!(err, Mismatch::LeadingOne { expected: Some(5), .. }));
}

#[test]
fn vectors_round_trip_through_ports() {
    // ports carry patterns, not interpretations: drive a raw subnormal
    // and read back the exact bits
    let format = FloatFormat::single();
    let dut = SoftFpu::adder(Oracle::new(format));
    let mut comparator = Comparator::new(dut, Oracle::new(format));

    let vector = TestVector {
        a: bits_from_u64(0x00000001, 32),
        b: bits_from_u64(0x80000000, 32),
        subtract: false,
    };
    comparator.check(Operation::Add, &vector).unwrap();
    assert_eq!(bits_to_u64(&vector.a), 1);
}
