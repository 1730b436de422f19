use p3_field::{BasedVectorSpace, Field};

use super::pattern::{Hint, Observe, Pattern, Sample};

/// The IO pattern of a Basefold session, encoded as field elements.
///
/// Every entry is a triple `(kind, label, count)`; the whole pattern is absorbed by the
/// challenger before the first commitment, so transcripts of sessions with different public
/// parameters never share challenges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSeparator<F> {
    pattern: Vec<F>,
}

impl<F: Field> DomainSeparator<F> {
    /// Starts a pattern tagged with a protocol identifier.
    #[must_use]
    pub fn new(protocol_id: &str) -> Self {
        Self {
            pattern: protocol_id.bytes().map(F::from_u8).collect(),
        }
    }

    #[must_use]
    pub fn as_field_elements(&self) -> Vec<F> {
        self.pattern.clone()
    }

    pub fn observe(&mut self, count: usize, label: Observe) {
        self.push(Pattern::Observe, label.as_field_element(), count);
    }

    pub fn sample(&mut self, count: usize, label: Sample) {
        self.push(Pattern::Sample, label.as_field_element(), count);
    }

    pub fn hint(&mut self, count: usize, label: Hint) {
        self.push(Pattern::Hint, label.as_field_element(), count);
    }

    /// Binds public parameters (sizes, seeds, ...) into the pattern.
    pub fn add_parameters(&mut self, values: &[u64]) {
        self.observe(values.len(), Observe::Parameters);
        // Split so that 64-bit seeds survive small prime fields.
        self.pattern.extend(
            values
                .iter()
                .flat_map(|&v| [F::from_u32(v as u32), F::from_u32((v >> 32) as u32)]),
        );
    }

    /// Appends the message flow of a full proof over `num_variables` variables.
    pub fn add_basefold_proof<EF: BasedVectorSpace<F>>(
        &mut self,
        num_variables: usize,
        digest_elems: usize,
        num_queries: usize,
        query_pow_bits: usize,
    ) {
        for _ in 0..num_variables {
            self.observe(digest_elems, Observe::MerkleDigest);
            self.sample(EF::DIMENSION, Sample::FoldingChallenge);
        }
        self.observe(EF::DIMENSION, Observe::FinalValue);
        if query_pow_bits > 0 {
            self.sample(1, Sample::PowQueries);
            self.observe(1, Observe::PowNonce);
        }
        self.sample(num_queries, Sample::QueryIndices);
        self.hint(num_queries, Hint::QueryOpenings);
    }

    fn push(&mut self, kind: Pattern, label: F, count: usize) {
        self.pattern
            .extend([kind.as_field_element(), label, F::from_usize(count)]);
    }
}
