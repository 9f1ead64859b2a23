//! Order-dependent seed mixing.
//!
//! Each entropy value is folded into a 64-bit accumulator with an operation
//! drawn from an auxiliary generator. All arithmetic wraps: overflow is part
//! of the mix, never a fault.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Arithmetic step used to fold one value into the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixOp {
    Add,
    Subtract,
    /// Skipped when either side is zero, so earlier contributions survive.
    Multiply,
}

impl MixOp {
    pub const ALL: [MixOp; 3] = [Self::Add, Self::Subtract, Self::Multiply];

    /// Apply this step to `acc`.
    pub fn apply(self, acc: i64, value: i64) -> i64 {
        match self {
            Self::Add => acc.wrapping_add(value),
            Self::Subtract => acc.wrapping_sub(value),
            Self::Multiply => {
                if acc == 0 || value == 0 {
                    acc
                } else {
                    acc.wrapping_mul(value)
                }
            }
        }
    }
}

impl std::fmt::Display for MixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Subtract => write!(f, "-"),
            Self::Multiply => write!(f, "*"),
        }
    }
}

/// Running accumulator plus the generator choosing each step.
pub struct SeedMixer {
    accumulator: i64,
    chooser: StdRng,
}

impl SeedMixer {
    /// Start from `initial`, with the chooser seeded from the same value.
    pub fn new(initial: i64) -> Self {
        Self::with_chooser_seed(initial, initial)
    }

    /// Start from `initial` with an independently chosen chooser seed.
    pub fn with_chooser_seed(initial: i64, chooser_seed: i64) -> Self {
        Self {
            accumulator: initial,
            chooser: StdRng::seed_from_u64(chooser_seed as u64),
        }
    }

    /// Fold `value` in and return the operation that was drawn.
    pub fn mix(&mut self, value: i64) -> MixOp {
        let op = MixOp::ALL[self.chooser.random_range(0..MixOp::ALL.len())];
        self.accumulator = op.apply(self.accumulator, value);
        log::trace!("mix {op} {value} -> {}", self.accumulator);
        op
    }

    pub fn accumulator(&self) -> i64 {
        self.accumulator
    }

    pub fn finish(self) -> i64 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // MixOp::apply
    // -----------------------------------------------------------------------

    #[test]
    fn add_and_subtract() {
        assert_eq!(MixOp::Add.apply(10, 5), 15);
        assert_eq!(MixOp::Subtract.apply(10, 5), 5);
    }

    #[test]
    fn multiply_by_zero_is_noop() {
        assert_eq!(MixOp::Multiply.apply(12345, 0), 12345);
        assert_eq!(MixOp::Multiply.apply(i64::MIN, 0), i64::MIN);
    }

    #[test]
    fn multiply_zero_accumulator_is_noop() {
        assert_eq!(MixOp::Multiply.apply(0, 99), 0);
    }

    #[test]
    fn multiply_nonzero() {
        assert_eq!(MixOp::Multiply.apply(-3, 7), -21);
    }

    #[test]
    fn overflow_wraps() {
        assert_eq!(MixOp::Add.apply(i64::MAX, 1), i64::MIN);
        assert_eq!(MixOp::Subtract.apply(i64::MIN, 1), i64::MAX);
        assert_eq!(MixOp::Multiply.apply(i64::MAX, 2), -2);
    }

    #[test]
    fn display_symbols() {
        let symbols: Vec<String> = MixOp::ALL.iter().map(|op| op.to_string()).collect();
        assert_eq!(symbols, ["+", "-", "*"]);
    }

    // -----------------------------------------------------------------------
    // SeedMixer
    // -----------------------------------------------------------------------

    #[test]
    fn same_inputs_same_result() {
        let values = [17i64, -4, 4096, 8, 0, 123_456_789, i64::MAX, 1000, 1000, 42, 7];
        let run = || {
            let mut mixer = SeedMixer::with_chooser_seed(1_700_000_000_000_000_000, 99);
            for v in values {
                mixer.mix(v);
            }
            mixer.finish()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn different_chooser_seeds_usually_diverge() {
        let values = [3i64, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
        let finals: std::collections::HashSet<i64> = (0..32)
            .map(|seed| {
                let mut mixer = SeedMixer::with_chooser_seed(1, seed);
                for v in values {
                    mixer.mix(v);
                }
                mixer.finish()
            })
            .collect();
        assert!(finals.len() > 1);
    }

    #[test]
    fn zero_value_never_changes_accumulator() {
        // Add/Subtract of zero are identities and Multiply skips zero, so
        // whichever op is drawn the accumulator must be unchanged.
        for chooser_seed in 0..64 {
            let mut mixer = SeedMixer::with_chooser_seed(987_654_321, chooser_seed);
            mixer.mix(0);
            assert_eq!(mixer.accumulator(), 987_654_321);
        }
    }

    #[test]
    fn zero_on_multiply_step_is_noop() {
        let seed = (0..1024)
            .find(|&s| {
                let mut probe = SeedMixer::with_chooser_seed(1, s);
                probe.mix(1) == MixOp::Multiply
            })
            .expect("no chooser seed drew Multiply first");
        let mut mixer = SeedMixer::with_chooser_seed(555, seed);
        assert_eq!(mixer.mix(0), MixOp::Multiply);
        assert_eq!(mixer.accumulator(), 555);
    }

    #[test]
    fn every_op_gets_drawn() {
        let mut mixer = SeedMixer::new(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(mixer.mix(1));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn accumulator_matches_replayed_ops() {
        let values = [10i64, 20, 30, 40];
        let mut mixer = SeedMixer::with_chooser_seed(5, 77);
        let mut expected = 5i64;
        for v in values {
            let op = mixer.mix(v);
            expected = op.apply(expected, v);
        }
        assert_eq!(mixer.finish(), expected);
    }
}
