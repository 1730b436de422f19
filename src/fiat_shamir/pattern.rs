use p3_field::Field;

#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Sample,
    Observe,
    Hint,
}

impl Pattern {
    #[must_use]
    pub fn as_field_element<F: Field>(self) -> F {
        F::from_u8(self as u8)
    }
}

/// Labels for items that are sampled.
#[derive(Debug, Clone, Copy)]
pub enum Sample {
    FoldingChallenge,
    PowQueries,
    QueryIndices,
}

impl Sample {
    #[must_use]
    pub fn as_field_element<F: Field>(self) -> F {
        F::from_u8(self as u8)
    }
}

/// Labels for items that are observed.
#[derive(Debug, Clone, Copy)]
pub enum Observe {
    Parameters,
    MerkleDigest,
    FinalValue,
    PowNonce,
}

impl Observe {
    #[must_use]
    pub fn as_field_element<F: Field>(self) -> F {
        F::from_u8(self as u8)
    }
}

/// Labels for items that are hints.
#[derive(Debug, Clone, Copy)]
pub enum Hint {
    QueryOpenings,
}

impl Hint {
    #[must_use]
    pub fn as_field_element<F: Field>(self) -> F {
        F::from_u8(self as u8)
    }
}
