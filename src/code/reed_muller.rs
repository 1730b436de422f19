use p3_field::Field;
use serde::{Deserialize, Serialize};

use super::{FoldableCode, encoder::fold_weights};

/// Reed–Muller code as a foldable code: the `(u + v | u − v)` recursion over a repetition code.
///
/// Every twiddle is one and the base generator is the all-ones vector of length `2^R`, so the
/// code works over any field of odd characteristic. A level shares its twiddles with every
/// smaller one, hence a single table whose prefixes serve as the per-level tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "F: Serialize", deserialize = "F: Deserialize<'de>"))]
pub struct ReedMullerCode<F> {
    log_inv_rate: usize,
    max_log_message_len: usize,
    base_generator: Vec<F>,
    /// Twiddles of the largest level.
    twiddles: Vec<F>,
    fold_weights: Vec<F>,
}

impl<F: Field> ReedMullerCode<F> {
    #[must_use]
    pub fn new(log_inv_rate: usize, max_log_message_len: usize) -> Self {
        let max_half = if max_log_message_len == 0 {
            0
        } else {
            1 << (log_inv_rate + max_log_message_len - 1)
        };
        let twiddles = vec![F::ONE; max_half];
        let fold_weights = fold_weights(&twiddles);

        Self {
            log_inv_rate,
            max_log_message_len,
            base_generator: vec![F::ONE; 1 << log_inv_rate],
            twiddles,
            fold_weights,
        }
    }
}

impl<F> ReedMullerCode<F> {
    fn level_len(&self, log_len: usize) -> usize {
        assert!(
            log_len > self.log_inv_rate && log_len <= self.log_inv_rate + self.max_log_message_len,
            "level {log_len} is not part of the code"
        );
        1 << (log_len - 1)
    }
}

impl<F: Field> FoldableCode<F> for ReedMullerCode<F> {
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
        &self.twiddles[..self.level_len(log_len)]
    }

    fn fold_weights(&self, log_len: usize) -> &[F] {
        &self.fold_weights[..self.level_len(log_len)]
    }

    /// Exactly `2^{-d}`: a message whose two halves agree encodes to `(2u | 0)`, so each level
    /// keeps the weight of the previous one while doubling the length.
    fn relative_distance(&self, log_message_len: usize) -> f64 {
        1. / (1u64 << log_message_len) as f64
    }
}
