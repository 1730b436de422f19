use std::ops::Deref;

use p3_field::{ExtensionField, Field};
use p3_maybe_rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::multilinear::MultilinearPoint;
use crate::utils::workload_size;

/// Represents a multilinear polynomial `f` in `n` variables, stored by its coefficients.
///
/// The inner vector stores the coefficients in lexicographic order of monomials. The number of
/// variables `n` is inferred from the length of this vector, where `self.len() = 2^n`.
///
/// The coefficient for the monomial `X_0^{b_{n-1}} * ... * X_{n-1}^{b_0}` is stored at index `j`
/// where the binary representation of `j` is `(b_{n-1}, ..., b_0)`.
///
/// ### Example (n = 3, variables X₀, X₁, X₂)
///
/// - `coeffs[0]` (binary 000) → Constant term (1)
/// - `coeffs[1]` (binary 001) → Coefficient of `X₂`
/// - `coeffs[2]` (binary 010) → Coefficient of `X₁`
/// - `coeffs[4]` (binary 100) → Coefficient of `X₀`
///
/// This is the message handed to the encoder: the left half holds the monomials without `X₀`,
/// the right half those with `X₀`. Folding a message with challenge `r` is therefore
/// `left + r * right`, which binds `X₀ = r`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CoefficientList<F>(Vec<F>);

impl<F> CoefficientList<F> {
    /// Creates a `CoefficientList` from a vector of coefficients.
    ///
    /// # Panics
    /// Panics if the length is not a power of two.
    #[must_use]
    pub fn new(coeffs: Vec<F>) -> Self {
        assert!(
            coeffs.len().is_power_of_two(),
            "Coefficient list length must be a power of two."
        );
        Self(coeffs)
    }

    /// Returns the number of variables (`n`).
    #[must_use]
    pub const fn num_variables(&self) -> usize {
        self.0.len().ilog2() as usize
    }
}

impl<F: Field> CoefficientList<F> {
    /// Evaluate self at `point`, where `point` is from a field extension extending the field over
    /// which the polynomial `self` is defined.
    #[instrument(skip_all, fields(size = point.num_variables()), level = "debug")]
    pub fn evaluate<EF: ExtensionField<F>>(&self, point: &MultilinearPoint<EF>) -> EF {
        assert_eq!(self.num_variables(), point.num_variables());
        eval_multivariate(&self.0, point)
    }
}

impl<F> Deref for CoefficientList<F> {
    type Target = [F];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Multivariate Horner’s method for evaluating a polynomial at a general point.
///
/// ```ignore
/// P(x₀, ..., x_{n-1}) = P_0(x₁, ..., x_{n-1}) + x₀ * P_1(x₁, ..., x_{n-1})
/// ```
///
/// where `P_0` and `P_1` are the left and right halves of the coefficient vector.
fn eval_multivariate<F, EF>(coeffs: &[F], point: &[EF]) -> EF
where
    F: Field,
    EF: ExtensionField<F>,
{
    debug_assert_eq!(coeffs.len(), 1 << point.len());
    match point {
        [] => coeffs[0].into(),
        [x] => *x * coeffs[1] + coeffs[0],
        [x, tail @ ..] => {
            let (b0t, b1t) = coeffs.split_at(coeffs.len() / 2);
            let (b0t, b1t) = if coeffs.len() > workload_size::<F>() {
                join(
                    || eval_multivariate(b0t, tail),
                    || eval_multivariate(b1t, tail),
                )
            } else {
                (eval_multivariate(b0t, tail), eval_multivariate(b1t, tail))
            };
            b0t + b1t * *x
        }
    }
}
