use p3_field::{Field, PrimeCharacteristicRing, TwoAdicField};
use serde::{Deserialize, Serialize};

use super::{EncodingError, FoldableCode, encoder::fold_weights};

/// Reed–Solomon code on two-adic subgroups, seen as a foldable code.
///
/// The twiddles of level `L` are the powers `ω_L^i` of the generator of the subgroup of order
/// `2^L`, and the base generator is all ones. The codeword of `x` is then the evaluation, on that
/// subgroup in natural order, of the univariate polynomial whose coefficient at index
/// `bitrev(j)` is `x_j`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "F: Serialize", deserialize = "F: Deserialize<'de>"))]
pub struct ReedSolomonCode<F> {
    log_inv_rate: usize,
    max_log_message_len: usize,
    base_generator: Vec<F>,
    /// `twiddles[j]` belongs to level `log_inv_rate + 1 + j`.
    twiddles: Vec<Vec<F>>,
    fold_weights: Vec<Vec<F>>,
}

impl<F: TwoAdicField> ReedSolomonCode<F> {
    /// Builds the twiddle tables for messages of up to `2^max_log_message_len` elements.
    pub fn new(log_inv_rate: usize, max_log_message_len: usize) -> Result<Self, EncodingError> {
        let max_log_len = log_inv_rate + max_log_message_len;
        if max_log_len > F::TWO_ADICITY {
            return Err(EncodingError::TwoAdicityExceeded {
                log_len: max_log_len,
                two_adicity: F::TWO_ADICITY,
            });
        }

        let twiddles: Vec<Vec<F>> = (log_inv_rate + 1..=max_log_len)
            .map(|log_len| {
                F::two_adic_generator(log_len)
                    .powers()
                    .take(1 << (log_len - 1))
                    .collect()
            })
            .collect();
        let fold_weights = twiddles
            .iter()
            .map(Vec::as_slice)
            .map(fold_weights)
            .collect();

        Ok(Self {
            log_inv_rate,
            max_log_message_len,
            base_generator: vec![F::ONE; 1 << log_inv_rate],
            twiddles,
            fold_weights,
        })
    }
}

impl<F: Field> ReedSolomonCode<F> {
    fn level(&self, log_len: usize) -> usize {
        assert!(
            log_len > self.log_inv_rate && log_len <= self.log_inv_rate + self.max_log_message_len,
            "level {log_len} is not part of the code"
        );
        log_len - self.log_inv_rate - 1
    }
}

impl<F: Field> FoldableCode<F> for ReedSolomonCode<F> {
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

    /// `1 - ρ`, independent of the message length.
    fn relative_distance(&self, _log_message_len: usize) -> f64 {
        1. - 1. / (1u64 << self.log_inv_rate) as f64
    }
}
