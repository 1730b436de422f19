use std::ops::Deref;

/// Point `(x_0, ..., x_{n-1})` in `F^n`.
///
/// `x_0` binds the most significant bit of the coefficient/evaluation index, which is also the
/// variable folded away by the first Basefold round. The sequence of folding challenges is
/// therefore directly the point at which the committed polynomial ends up being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultilinearPoint<F>(pub Vec<F>);

impl<F> MultilinearPoint<F> {
    #[must_use]
    pub const fn new(coords: Vec<F>) -> Self {
        Self(coords)
    }

    /// Returns the number of variables.
    #[must_use]
    pub const fn num_variables(&self) -> usize {
        self.0.len()
    }
}

impl<F> Deref for MultilinearPoint<F> {
    type Target = [F];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

