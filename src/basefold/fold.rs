use p3_field::{ExtensionField, Field};
use p3_maybe_rayon::prelude::*;
use p3_util::log2_strict_usize;
use tracing::instrument;

use crate::code::FoldableCode;

/// Folds one pair `(a, b) = (x_i, x_{i+n/2})` of a codeword:
///
/// ```text
/// (a + b) / 2 + r · (a − b) / (2 · t_i)
/// ```
///
/// `fold_weight` is the precomputed `1 / (2 · t_i)`. This recovers the pair's contributions
/// `E_l[i]` and `E_r[i]` from the encoding recursion and returns `E_l[i] + r · E_r[i]`.
#[inline]
pub fn fold_pair<F: Field, EF: ExtensionField<F>>(
    a: EF,
    b: EF,
    challenge: EF,
    fold_weight: F,
) -> EF {
    (a + b).halve() + challenge * (a - b) * fold_weight
}

/// Folds a codeword of length `n` into one of length `n/2`.
///
/// The result is the encoding of `left + challenge · right` whenever the input is the encoding
/// of `left ‖ right`.
///
/// # Panics
/// Panics if the codeword is not longer than the code's base codewords.
#[instrument(skip_all, fields(len = codeword.len()), level = "debug")]
pub fn fold_codeword<F, EF, V, C>(codeword: &[V], challenge: EF, code: &C) -> Vec<EF>
where
    F: Field,
    EF: ExtensionField<F>,
    V: Copy + Into<EF> + Send + Sync,
    C: FoldableCode<F> + ?Sized,
{
    let log_len = log2_strict_usize(codeword.len());
    assert!(log_len > code.log_inv_rate(), "cannot fold a base codeword");
    let weights = code.fold_weights(log_len);
    let (lo, hi) = codeword.split_at(codeword.len() / 2);

    lo.par_iter()
        .zip(hi.par_iter())
        .zip(weights.par_iter())
        .map(|((&a, &b), &w)| fold_pair(a.into(), b.into(), challenge, w))
        .collect()
}

/// Folds a message (coefficient vector) `left ‖ right` into `left + challenge · right`.
///
/// This binds the most significant variable `X_0` of the multilinear polynomial to `challenge`.
///
/// # Panics
/// Panics if `left` and `right` differ in length.
pub fn fold_message<EF, V>(left: &[V], right: &[V], challenge: EF) -> Vec<EF>
where
    EF: Field,
    V: Copy + Into<EF> + Send + Sync,
{
    assert_eq!(left.len(), right.len());
    left.par_iter()
        .zip(right.par_iter())
        .map(|(&l, &r)| {
            let (l, r): (EF, EF) = (l.into(), r.into());
            challenge * r + l
        })
        .collect()
}
