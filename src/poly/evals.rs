use std::ops::Deref;

use p3_field::Field;
use p3_maybe_rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::coeffs::CoefficientList;

/// Represents a multilinear polynomial `f` in `n` variables, stored by its evaluations
/// over the boolean hypercube `{0,1}^n`.
///
/// The inner vector stores function evaluations at points of the hypercube in lexicographic
/// order, `X₀` being the most significant bit of the index.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct EvaluationsList<F>(Vec<F>);

impl<F: Field> EvaluationsList<F> {
    /// Constructs an `EvaluationsList` from a vector of evaluations.
    ///
    /// # Panics
    /// Panics if `evals.len()` is not a power of two.
    #[inline]
    pub fn new(evals: Vec<F>) -> Self {
        assert!(
            evals.len().is_power_of_two(),
            "Evaluation list length must be a power of two."
        );
        Self(evals)
    }

    /// Returns the number of evaluations (`2^n`).
    #[must_use]
    pub const fn num_evals(&self) -> usize {
        self.0.len()
    }

    /// Converts the evaluations to monomial coefficients.
    ///
    /// In-place Möbius transform: the inverse of the `[1 0; 1 1]` kernel, i.e. `hi -= lo` on
    /// every variable.
    #[instrument(skip_all, fields(size = self.num_evals()))]
    pub fn to_coefficients(self) -> CoefficientList<F> {
        let mut coeffs = self.0;
        let mut half = coeffs.len() / 2;
        while half > 0 {
            coeffs.par_chunks_exact_mut(2 * half).for_each(|block| {
                let (lo, hi) = block.split_at_mut(half);
                hi.iter_mut().zip(lo.iter()).for_each(|(h, &l)| *h -= l);
            });
            half /= 2;
        }
        CoefficientList::new(coeffs)
    }
}

impl<F> Deref for EvaluationsList<F> {
    type Target = [F];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
