/*
    Stimulus generation
*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::format::{FloatFormat, FormatKind, OracleError};
use crate::oracle::{encode, BitVec, FloatValue};

/// Magnitude decades swept by the randomized path, `10^p` for each entry.
pub const DEFAULT_DECADES: [i32; 8] = [-300, -12, -6, -3, 0, 6, 12, 24];

/// Operand pairs sampled per decade.
pub const DEFAULT_COUNT_PER_DECADE: usize = 1000;

/// One operand pair to drive into the unit. `subtract` is only consumed
/// by the adder and ignored by the multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVector {
    pub a: BitVec,
    pub b: BitVec,
    pub subtract: bool,
}

impl TestVector {
    fn new(a: BitVec, b: BitVec) -> Self {
        Self {
            a,
            b,
            subtract: false,
        }
    }

    fn subtracting(a: BitVec, b: BitVec) -> Self {
        Self {
            a,
            b,
            subtract: true,
        }
    }
}

/// Behavioral categories covered by the handcrafted vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    NormalArithmetic,
    ZeroCombinations,
    InfinityCombinations,
    NanPropagation,
    DenormalProducts,
}

impl Category {
    /// Every handcrafted category, in the order the testbenches run them.
    pub const ALL: [Category; 5] = [
        Category::NormalArithmetic,
        Category::ZeroCombinations,
        Category::InfinityCombinations,
        Category::NanPropagation,
        Category::DenormalProducts,
    ];
}

/// Deterministic handcrafted vectors for one behavioral category.
///
/// Only the canonical formats have handcrafted sets; custom formats are
/// exercised through the randomized path alone and get an empty set here.
pub fn handcrafted(format: &FloatFormat, category: Category) -> Vec<TestVector> {
    if format.kind() == FormatKind::Custom {
        return Vec::new();
    }

    // canonical widths always have a host encoding
    let num = |v: f64| encode(v, format).unwrap();
    let pos_inf = FloatValue::infinity(*format, false).bits();
    let neg_inf = FloatValue::infinity(*format, true).bits();
    let zero = FloatValue::zero(*format, false).bits();
    let neg_zero = FloatValue::zero(*format, true).bits();
    let qnan = FloatValue::canonical_nan(*format).bits();
    let snan = signaling_nan(format);
    let tiny = FloatValue::smallest_subnormal(*format, false).bits();
    let neg_tiny = FloatValue::smallest_subnormal(*format, true).bits();
    let big_sub = FloatValue::largest_subnormal(*format, false).bits();

    match category {
        Category::NormalArithmetic => vec![
            TestVector::new(num(3.0), num(4.0)),
            TestVector::new(num(8.7), num(0.3)),
            TestVector::new(num(20003.0), num(0.1)),
            TestVector::new(num(0.0001), num(0.93)),
        ],
        Category::ZeroCombinations => vec![
            TestVector::new(zero.clone(), num(3.0)),
            TestVector::new(num(120.0), zero.clone()),
            TestVector::new(zero.clone(), neg_zero),
            TestVector::new(zero, FloatValue::zero(*format, false).bits()),
        ],
        Category::InfinityCombinations => vec![
            TestVector::new(pos_inf.clone(), num(3.0)),
            TestVector::new(pos_inf.clone(), pos_inf.clone()),
            TestVector::new(neg_inf.clone(), pos_inf.clone()),
            TestVector::subtracting(pos_inf, neg_inf.clone()),
            TestVector::new(neg_inf.clone(), neg_inf),
        ],
        Category::NanPropagation => vec![
            TestVector::new(qnan.clone(), num(4.0)),
            TestVector::new(snan.clone(), num(4.0)),
            TestVector::new(qnan, FloatValue::zero(*format, false).bits()),
            TestVector::new(snan, FloatValue::zero(*format, false).bits()),
        ],
        Category::DenormalProducts => vec![
            TestVector::new(tiny.clone(), tiny.clone()),
            TestVector::new(neg_tiny, tiny.clone()),
            TestVector::new(big_sub.clone(), big_sub.clone()),
            TestVector::new(big_sub, tiny),
        ],
    }
}

// A signaling NaN one bit below the quiet bit (0xFFA00000 in single
// precision, matching the hardware testbench constant).
fn signaling_nan(format: &FloatFormat) -> BitVec {
    let mut payload = BitVec::repeat(false, format.nan_payload_width());
    let top = payload.len() - 1;
    payload.set(top, true);
    FloatValue::nan(*format, true, false, payload).bits()
}

/** Seeded randomized vectors sweeping the magnitude decades.
 *
 * For each decade `p`, operand magnitudes are sampled uniformly in
 * `[0, 10^p)` with independent random signs and subtract bits. The
 * sequence is finite (`decades.len() * count_per_decade` vectors) and
 * fully determined by the seed: re-creating the generator with the same
 * arguments replays the identical sequence.
 *
 */
#[derive(Debug)]
pub struct RandomVectors {
    rng: StdRng,
    format: FloatFormat,
    decades: Vec<i32>,
    count_per_decade: usize,
    decade: usize,
    emitted: usize,
}

/// Creates the randomized vector sequence for `format`.
///
/// Fails with `UnsupportedWidth` when the format has no host-backed
/// encoding path, since sampled magnitudes must be encodable.
pub fn generate_vectors(
    seed: u64,
    decades: &[i32],
    count_per_decade: usize,
    format: &FloatFormat,
) -> Result<RandomVectors, OracleError> {
    let w = format.total_width();
    if !matches!(w, 16 | 32 | 64) {
        return Err(OracleError::UnsupportedWidth(w));
    }

    Ok(RandomVectors {
        rng: StdRng::seed_from_u64(seed),
        format: *format,
        decades: decades.to_vec(),
        count_per_decade,
        decade: 0,
        emitted: 0,
    })
}

impl RandomVectors {
    // Uniform magnitude in [0, scale) with a random sign.
    fn sample_operand(&mut self, scale: f64) -> BitVec {
        let magnitude = self.rng.gen_range(0.0..scale);
        let negative = self.rng.gen_bool(0.5);
        let value = if negative { -magnitude } else { magnitude };
        encode(value, &self.format).unwrap()
    }
}

impl Iterator for RandomVectors {
    type Item = TestVector;

    fn next(&mut self) -> Option<TestVector> {
        if self.count_per_decade == 0 || self.decade >= self.decades.len() {
            return None;
        }

        let scale = 10f64.powi(self.decades[self.decade]);
        let a = self.sample_operand(scale);
        let b = self.sample_operand(scale);
        let subtract = self.rng.gen_bool(0.5);

        self.emitted += 1;
        if self.emitted == self.count_per_decade {
            self.emitted = 0;
            self.decade += 1;
        }

        Some(TestVector { a, b, subtract })
    }
}
