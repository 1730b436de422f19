use p3_field::{ExtensionField, Field, batch_multiplicative_inverse};
use p3_maybe_rayon::prelude::*;
use p3_util::log2_strict_usize;
use tracing::instrument;

use super::{EncodingError, FoldableCode};

/// Below this half-length, a level is parallelized across blocks instead of within a block.
const PARALLEL_THRESHOLD: usize = 4096;

/// Encodes `message` under `code`.
///
/// The message is first expanded into `2^d` blocks `x_j · g` of length `2^R`, then one
/// in-place butterfly pass per level merges adjacent blocks bottom-up:
///
/// ```text
/// (lo_i, hi_i) <- (lo_i + t_i · hi_i, lo_i - t_i · hi_i)
/// ```
///
/// The first half of the message therefore ends up on the `lo` side of the top level, which is
/// exactly the `Enc_{d-1}(left)` term of the recursion.
#[instrument(skip_all, fields(len = message.len()), level = "debug")]
pub fn encode<F, EF, C>(code: &C, message: &[EF]) -> Result<Vec<EF>, EncodingError>
where
    F: Field,
    EF: ExtensionField<F>,
    C: FoldableCode<F> + ?Sized,
{
    let max_len = 1 << code.max_log_message_len();
    if !message.len().is_power_of_two() || message.len() > max_len {
        return Err(EncodingError::UnsupportedLength {
            len: message.len(),
            max_len,
        });
    }

    let log_message_len = log2_strict_usize(message.len());
    let log_inv_rate = code.log_inv_rate();
    let generator = code.base_generator();

    let mut codeword = EF::zero_vec(message.len() << log_inv_rate);
    codeword
        .par_chunks_exact_mut(1 << log_inv_rate)
        .zip(message.par_iter())
        .for_each(|(block, &x)| {
            block
                .iter_mut()
                .zip(generator)
                .for_each(|(c, &g)| *c = x * g);
        });

    for log_len in log_inv_rate + 1..=log_inv_rate + log_message_len {
        butterfly_level(&mut codeword, log_len, code.twiddles(log_len));
    }

    Ok(codeword)
}

/// Applies one level of the recursion to every block of length `2^log_len`.
fn butterfly_level<F: Field, EF: ExtensionField<F>>(
    codeword: &mut [EF],
    log_len: usize,
    twiddles: &[F],
) {
    let half = 1 << (log_len - 1);
    debug_assert_eq!(twiddles.len(), half);

    if half >= PARALLEL_THRESHOLD {
        codeword.chunks_exact_mut(2 * half).for_each(|block| {
            let (lo, hi) = block.split_at_mut(half);
            lo.par_iter_mut()
                .zip(hi.par_iter_mut())
                .zip(twiddles.par_iter())
                .for_each(|((l, h), &t)| butterfly(l, h, t));
        });
    } else {
        codeword.par_chunks_exact_mut(2 * half).for_each(|block| {
            let (lo, hi) = block.split_at_mut(half);
            lo.iter_mut()
                .zip(hi.iter_mut())
                .zip(twiddles)
                .for_each(|((l, h), &t)| butterfly(l, h, t));
        });
    }
}

#[inline(always)]
fn butterfly<F: Field, EF: ExtensionField<F>>(lo: &mut EF, hi: &mut EF, twiddle: F) {
    let t_hi = *hi * twiddle;
    *hi = *lo - t_hi;
    *lo += t_hi;
}

/// Computes `1 / (2 · t)` for every twiddle of a level.
///
/// # Panics
/// Panics if a twiddle is zero.
#[must_use]
pub fn fold_weights<F: Field>(twiddles: &[F]) -> Vec<F> {
    let doubled: Vec<F> = twiddles.iter().map(|t| t.double()).collect();
    assert!(
        doubled.iter().all(|t| !t.is_zero()),
        "twiddles of a foldable code must be non-zero"
    );
    batch_multiplicative_inverse(&doubled)
}
