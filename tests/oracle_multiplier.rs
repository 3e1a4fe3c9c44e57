use fpu_verify::format::FloatFormat;
use fpu_verify::oracle::util::bits_from_u64;
use fpu_verify::oracle::{FloatClass, NanPolicy, Oracle};

const PLUS_INF: u64 = 0x7F800000;
const NEG_INF: u64 = 0xFF800000;
const QNAN: u64 = 0xFFC00000;
const SNAN: u64 = 0xFFA00000;
const ZERO: u64 = 0x00000000;
const NEG_ZERO: u64 = 0x80000000;

fn check_mul(
    oracle: &Oracle,
    a: u64,
    b: u64,
    expected: u64,
    flags: (bool, bool, bool),
    message: &str,
) {
    let w = oracle.format().total_width();
    for (a, b) in [(a, b), (b, a)] {
        let r = oracle.mul(&bits_from_u64(a, w), &bits_from_u64(b, w));
        assert_eq!(r.bits_u64(), expected, "{}", message);
        assert_eq!(r.flags().as_tuple(), flags, "flags are not correct: {}", message);
    }
}

#[test]
fn normal_numbers() {
    let oracle = Oracle::new(FloatFormat::single());

    check_mul(&oracle, 0x40400000, 0x40800000, 0x41400000, (false, false, false), "3.0 * 4.0 != 12.0");
    check_mul(&oracle, 0x410B3333, 0x3E99999A, 0x40270A3E, (false, false, false), "8.7 * 0.3 != 2.6100001");
    check_mul(&oracle, 0x469C4600, 0x3DCCCCCD, 0x44FA099A, (false, false, false), "20003.0 * 0.1 != 2000.3");
    check_mul(&oracle, 0x38D1B717, 0x3F6E147B, 0x38C308FE, (false, false, false), "0.0001 * 0.93 != 9.2999995E-5");
}

#[test]
fn denormalized_numbers() {
    let oracle = Oracle::new(FloatFormat::single());

    // the smallest denormal squared flushes to a signed zero
    check_mul(&oracle, 0x00000001, 0x00000001, ZERO, (true, false, false), "tiny * tiny != +0");
    check_mul(&oracle, 0x80000001, 0x00000001, NEG_ZERO, (true, false, false), "-tiny * tiny != -0");
    check_mul(&oracle, 0x80000001, 0x80000001, ZERO, (true, false, false), "-tiny * -tiny != +0");

    // the largest denormal squared flushes as well
    check_mul(&oracle, 0x007FFFFF, 0x007FFFFF, ZERO, (true, false, false), "big denormal * big denormal != +0");
}

#[test]
fn underflow_of_normal_operands() {
    let oracle = Oracle::new(FloatFormat::single());

    // 2^-75 * 2^-75 = 2^-150, at the tie below the smallest subnormal
    check_mul(&oracle, 0x1A000000, 0x1A000000, ZERO, (true, false, false), "2^-75 * 2^-75 != +0");
    check_mul(&oracle, 0x9A000000, 0x1A000000, NEG_ZERO, (true, false, false), "-2^-75 * 2^-75 != -0");

    // 2^-70 * 2^-70 = 2^-140: a representable denormal, not flushed
    check_mul(&oracle, 0x1C800000, 0x1C800000, 0x00000200, (false, false, false), "2^-70 * 2^-70 != 2^-140");
}

#[test]
fn infinity() {
    let oracle = Oracle::new(FloatFormat::single());

    check_mul(&oracle, PLUS_INF, 0x40400000, PLUS_INF, (false, true, false), "+Inf * 3.0 != +Inf");
    check_mul(&oracle, PLUS_INF, PLUS_INF, PLUS_INF, (false, true, false), "+Inf * +Inf != +Inf");
    check_mul(&oracle, NEG_INF, PLUS_INF, NEG_INF, (false, true, false), "-Inf * +Inf != -Inf");
    check_mul(&oracle, NEG_INF, NEG_INF, PLUS_INF, (false, true, false), "-Inf * -Inf != +Inf");

    // not produced by the hardware under test, still canonicalized
    check_mul(&oracle, PLUS_INF, ZERO, QNAN, (false, false, true), "+Inf * 0.0 != QNaN");
    check_mul(&oracle, NEG_INF, NEG_ZERO, QNAN, (false, false, true), "-Inf * -0.0 != QNaN");
}

#[test]
fn nan() {
    let oracle = Oracle::new(FloatFormat::single());

    check_mul(&oracle, QNAN, 0x40800000, QNAN, (false, false, true), "QNaN * 4.0 != QNaN");
    check_mul(&oracle, SNAN, 0x40800000, QNAN, (false, false, true), "SNaN * 4.0 != QNaN");
}

#[test]
fn nan_policy() {
    let strict = Oracle::new(FloatFormat::single()).with_nan_policy(NanPolicy::SignalingOnly);

    check_mul(&strict, QNAN, 0x40800000, QNAN, (false, false, false), "QNaN * 4.0 != QNaN");
    check_mul(&strict, SNAN, 0x40800000, QNAN, (false, false, true), "SNaN * 4.0 != QNaN");
}

#[test]
fn zero() {
    let oracle = Oracle::new(FloatFormat::single());

    check_mul(&oracle, ZERO, 0x40400000, ZERO, (false, false, false), "0.0 * 3.0 != 0.0");
    check_mul(&oracle, 0x42F00000, ZERO, ZERO, (false, false, false), "120.0 * 0.0 != 0.0");
    check_mul(&oracle, QNAN, ZERO, QNAN, (false, false, true), "QNaN * 0.0 != QNaN");
    check_mul(&oracle, SNAN, ZERO, QNAN, (false, false, true), "SNaN * 0.0 != QNaN");
    check_mul(&oracle, NEG_ZERO, 0x40400000, NEG_ZERO, (false, false, false), "-0.0 * 3.0 != -0.0");
    check_mul(&oracle, NEG_ZERO, 0xC0400000, ZERO, (false, false, false), "-0.0 * -3.0 != +0.0");
}

#[test]
fn overflow() {
    let oracle = Oracle::new(FloatFormat::single());
    let max = 0x7F7FFFFF;

    check_mul(&oracle, max, 0x40000000, PLUS_INF, (false, true, false), "MAX * 2.0 != +Inf");
    check_mul(&oracle, max | 0x80000000, 0x40000000, NEG_INF, (false, true, false), "-MAX * 2.0 != -Inf");
}

#[test]
fn double_precision() {
    let oracle = Oracle::new(FloatFormat::double());

    // 3.0 * 4.0 = 12.0
    check_mul(
        &oracle,
        0x4008000000000000,
        0x4010000000000000,
        0x4028000000000000,
        (false, false, false),
        "3.0 * 4.0 != 12.0",
    );
    // the smallest double subnormal squared flushes; detection here is
    // exact, not host-float based
    check_mul(
        &oracle,
        0x0000000000000001,
        0x0000000000000001,
        0x0000000000000000,
        (true, false, false),
        "tiny * tiny != +0",
    );
    check_mul(
        &oracle,
        0x8000000000000001,
        0x0000000000000001,
        0x8000000000000000,
        (true, false, false),
        "-tiny * tiny != -0",
    );
}

#[test]
fn result_classification() {
    let oracle = Oracle::new(FloatFormat::single());

    let r = oracle.mul(&bits_from_u64(SNAN, 32), &bits_from_u64(0x40800000, 32));
    assert_eq!(r.class(), FloatClass::QuietNan);
    assert_eq!(r.is_quiet_nan(), Some(true));

    let r = oracle.mul(&bits_from_u64(0x00000001, 32), &bits_from_u64(0x00000001, 32));
    assert_eq!(r.class(), FloatClass::Zero);
}
