use p3_field::Field;
use rand::{
    Rng, SeedableRng,
    distr::{Distribution, StandardUniform},
    rngs::SmallRng,
};
use serde::{Deserialize, Serialize};

use super::{FoldableCode, encoder::fold_weights};

/// Foldable code with independently sampled twiddles and base generator.
///
/// Every table entry is a uniformly random non-zero element drawn from a seeded RNG, so the
/// prover and the verifier rebuild the same code from `(log_inv_rate, max_log_message_len, seed)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "F: Serialize", deserialize = "F: Deserialize<'de>"))]
pub struct RandomFoldableCode<F> {
    log_inv_rate: usize,
    max_log_message_len: usize,
    seed: u64,
    base_generator: Vec<F>,
    /// `twiddles[j]` belongs to level `log_inv_rate + 1 + j`.
    twiddles: Vec<Vec<F>>,
    fold_weights: Vec<Vec<F>>,
}

impl<F: Field> RandomFoldableCode<F>
where
    StandardUniform: Distribution<F>,
{
    #[must_use]
    pub fn new(log_inv_rate: usize, max_log_message_len: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut sample = |len: usize| -> Vec<F> {
            (0..len)
                .map(|_| loop {
                    let value: F = rng.random();
                    if !value.is_zero() {
                        break value;
                    }
                })
                .collect()
        };

        let base_generator = sample(1 << log_inv_rate);
        let twiddles: Vec<Vec<F>> = (log_inv_rate + 1..=log_inv_rate + max_log_message_len)
            .map(|log_len| sample(1 << (log_len - 1)))
            .collect();
        let fold_weights = twiddles
            .iter()
            .map(Vec::as_slice)
            .map(fold_weights)
            .collect();

        Self {
            log_inv_rate,
            max_log_message_len,
            seed,
            base_generator,
            twiddles,
            fold_weights,
        }
    }
}

impl<F> RandomFoldableCode<F> {
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    fn level(&self, log_len: usize) -> usize {
        assert!(
            log_len > self.log_inv_rate && log_len <= self.log_inv_rate + self.max_log_message_len,
            "level {log_len} is not part of the code"
        );
        log_len - self.log_inv_rate - 1
    }
}

impl<F: Field> FoldableCode<F> for RandomFoldableCode<F> {
    fn log_inv_rate(&self) -> usize {
        self.log_inv_rate
    }

    fn max_log_message_len(&self) -> usize {
        self.max_log_message_len
    }

    fn base_generator(&self) -> &[F] {
        &self.base_generator
    }

    fn twiddles(&self, log_len: usize) -> &[F] {
        &self.twiddles[self.level(log_len)]
    }

    fn fold_weights(&self, log_len: usize) -> &[F] {
        &self.fold_weights[self.level(log_len)]
    }

    /// Worst case `2^{-d}`: the base code has distance 1 and each level can at most halve it.
    fn relative_distance(&self, log_message_len: usize) -> f64 {
        1. / (1u64 << log_message_len) as f64
    }
}
