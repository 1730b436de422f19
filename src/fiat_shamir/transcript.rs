use std::marker::PhantomData;

use p3_challenger::{FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field};

use super::{domain_separator::DomainSeparator, errors::TranscriptError};
use crate::utils::dedup_sorted;

/// Where a transcript stands in the Basefold message flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptPhase {
    /// The root of round `round` must be absorbed next.
    AwaitingCommitment { round: usize },
    /// The folding challenge of round `round` can be squeezed.
    ReadyToSample { round: usize },
    /// Every challenge has been squeezed; the final value must be absorbed.
    AwaitingFinal,
    /// The query proof-of-work must be produced or checked.
    AwaitingPow,
    ReadyForQueries,
    Done,
}

/// Fiat-Shamir transcript of one Basefold session.
///
/// Wraps a challenger and enforces the absorb/squeeze order of the protocol: a challenge can
/// only be derived after the commitment it depends on has been absorbed. The prover and the
/// verifier drive the same type through the same sequence of calls.
#[derive(Debug, Clone)]
pub struct FoldTranscript<F, EF, Challenger> {
    challenger: Challenger,
    num_variables: usize,
    query_pow_bits: usize,
    phase: TranscriptPhase,
    _fields: PhantomData<(F, EF)>,
}

impl<F, EF, Challenger> FoldTranscript<F, EF, Challenger>
where
    F: Field,
    EF: ExtensionField<F>,
    Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
{
    /// Initializes the transcript by absorbing the domain separator.
    ///
    /// # Panics
    /// Panics if `num_variables == 0`.
    #[must_use]
    pub fn new(
        domain_separator: &DomainSeparator<F>,
        mut challenger: Challenger,
        num_variables: usize,
        query_pow_bits: usize,
    ) -> Self {
        assert_ne!(num_variables, 0, "a transcript needs at least one fold round");
        challenger.observe_slice(&domain_separator.as_field_elements());
        Self {
            challenger,
            num_variables,
            query_pow_bits,
            phase: TranscriptPhase::AwaitingCommitment { round: 0 },
            _fields: PhantomData,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> TranscriptPhase {
        self.phase
    }

    /// Absorbs the Merkle root committed in the current round.
    pub fn observe_commitment(&mut self, root: &[F]) -> Result<(), TranscriptError> {
        let TranscriptPhase::AwaitingCommitment { round } = self.phase else {
            return Err(self.out_of_order("observe_commitment"));
        };
        self.challenger.observe_slice(root);
        self.phase = TranscriptPhase::ReadyToSample { round };
        Ok(())
    }

    /// Squeezes the folding challenge of the current round.
    pub fn sample_folding_challenge(&mut self) -> Result<EF, TranscriptError> {
        let TranscriptPhase::ReadyToSample { round } = self.phase else {
            return Err(self.out_of_order("sample_folding_challenge"));
        };
        let challenge = self.challenger.sample_algebra_element();
        self.phase = if round + 1 < self.num_variables {
            TranscriptPhase::AwaitingCommitment { round: round + 1 }
        } else {
            TranscriptPhase::AwaitingFinal
        };
        Ok(challenge)
    }

    /// Absorbs the value of the fully folded message.
    pub fn observe_final_value(&mut self, value: EF) -> Result<(), TranscriptError> {
        if self.phase != TranscriptPhase::AwaitingFinal {
            return Err(self.out_of_order("observe_final_value"));
        }
        self.challenger.observe_algebra_element(value);
        self.phase = if self.query_pow_bits > 0 {
            TranscriptPhase::AwaitingPow
        } else {
            TranscriptPhase::ReadyForQueries
        };
        Ok(())
    }

    /// Grinds the query proof-of-work. Returns `None` when grinding is disabled.
    pub fn grind(&mut self) -> Result<Option<F>, TranscriptError> {
        match self.phase {
            TranscriptPhase::ReadyForQueries if self.query_pow_bits == 0 => Ok(None),
            TranscriptPhase::AwaitingPow => {
                let witness = self.challenger.grind(self.query_pow_bits);
                self.phase = TranscriptPhase::ReadyForQueries;
                Ok(Some(witness))
            }
            _ => Err(self.out_of_order("grind")),
        }
    }

    /// Checks the query proof-of-work witness sent by the prover.
    pub fn check_pow(&mut self, witness: Option<F>) -> Result<(), TranscriptError> {
        match (self.phase, witness) {
            (TranscriptPhase::ReadyForQueries, None) if self.query_pow_bits == 0 => Ok(()),
            (TranscriptPhase::AwaitingPow, Some(witness)) => {
                if self.challenger.check_witness(self.query_pow_bits, witness) {
                    self.phase = TranscriptPhase::ReadyForQueries;
                    Ok(())
                } else {
                    Err(TranscriptError::InvalidGrindingWitness)
                }
            }
            (TranscriptPhase::AwaitingPow, None) => Err(TranscriptError::InvalidGrindingWitness),
            (TranscriptPhase::ReadyForQueries, Some(_)) if self.query_pow_bits == 0 => {
                Err(TranscriptError::InvalidGrindingWitness)
            }
            _ => Err(self.out_of_order("check_pow")),
        }
    }

    /// Squeezes `num_queries` indices in `[0, 2^log_domain)`, sorted and deduplicated.
    pub fn sample_query_indices(
        &mut self,
        num_queries: usize,
        log_domain: usize,
    ) -> Result<Vec<usize>, TranscriptError> {
        if self.phase != TranscriptPhase::ReadyForQueries {
            return Err(self.out_of_order("sample_query_indices"));
        }
        let indices = (0..num_queries)
            .map(|_| self.challenger.sample_bits(log_domain))
            .collect();
        self.phase = TranscriptPhase::Done;
        Ok(dedup_sorted(indices))
    }

    const fn out_of_order(&self, operation: &'static str) -> TranscriptError {
        TranscriptError::OutOfOrder {
            operation,
            phase: self.phase,
        }
    }
}
