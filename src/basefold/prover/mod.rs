use std::ops::Deref;

use p3_challenger::{FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field};
use p3_maybe_rayon::prelude::*;
use p3_symmetric::{CryptographicHasher, PseudoCompressionFunction};
use serde::{Deserialize, Serialize};
use round_state::{RoundOutput, RoundState};
use tracing::{info_span, instrument};

use super::{committer::Witness, parameters::BasefoldConfig, proof::BasefoldProof};
use crate::fiat_shamir::transcript::FoldTranscript;

pub mod errors;
pub mod round_state;

pub use errors::ProverError;

#[derive(Debug)]
pub struct Prover<'a, F, EF, H, C, const DIGEST_ELEMS: usize>(
    /// Reference to the protocol configuration shared across prover components.
    pub &'a BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>,
);

impl<F, EF, H, C, const DIGEST_ELEMS: usize> Deref for Prover<'_, F, EF, H, C, DIGEST_ELEMS> {
    type Target = BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<'a, F, EF, H, C, const DIGEST_ELEMS: usize> Prover<'a, F, EF, H, C, DIGEST_ELEMS>
where
    F: Field,
    EF: ExtensionField<F>,
    H: CryptographicHasher<F, [F; DIGEST_ELEMS]> + Sync,
    C: PseudoCompressionFunction<[F; DIGEST_ELEMS], 2> + Sync,
    [F; DIGEST_ELEMS]: Serialize + for<'de> Deserialize<'de>,
{
    /// Starts an interactive session over a committed polynomial.
    ///
    /// The returned state is driven round by round with [`RoundState::fold`], then answers
    /// queries with [`RoundState::open`].
    pub fn start(
        &self,
        witness: Witness<F, DIGEST_ELEMS>,
    ) -> Result<RoundState<'a, F, EF, H, C, DIGEST_ELEMS>, ProverError> {
        RoundState::new(self.0, witness)
    }

    /// Runs the whole protocol non-interactively.
    ///
    /// Absorbs the initial root, then for each round squeezes a folding challenge, folds and
    /// absorbs the next root (or the final value after the last round). Query indices are
    /// squeezed last, after the optional proof-of-work.
    #[instrument(skip_all, fields(num_variables = self.num_variables))]
    pub fn prove<Challenger>(
        &self,
        transcript: &mut FoldTranscript<F, EF, Challenger>,
        witness: Witness<F, DIGEST_ELEMS>,
    ) -> Result<BasefoldProof<F, EF, DIGEST_ELEMS>, ProverError>
    where
        Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    {
        let mut state = self.start(witness)?;
        let mut commitments = Vec::with_capacity(self.num_variables);

        let root = state.initial_root();
        transcript.observe_commitment(&root)?;
        commitments.push(root);

        let mut final_value = None;
        for round in 0..self.num_variables {
            let challenge = transcript.sample_folding_challenge()?;
            match state.fold(round, challenge)? {
                RoundOutput::Commitment(root) => {
                    transcript.observe_commitment(&root)?;
                    commitments.push(root);
                }
                RoundOutput::Final(value) => {
                    transcript.observe_final_value(value)?;
                    final_value = Some(value);
                }
            }
        }
        let final_value = final_value.ok_or(ProverError::NotFinalized)?;

        let pow_witness = info_span!("grind", bits = self.query_pow_bits)
            .in_scope(|| transcript.grind())?;
        let indices =
            transcript.sample_query_indices(self.num_queries, self.log_query_domain())?;

        let queries = info_span!("open queries", count = indices.len()).in_scope(|| {
            indices
                .par_iter()
                .map(|&index| state.open(index))
                .collect::<Result<Vec<_>, _>>()
        })?;

        Ok(BasefoldProof {
            commitments,
            final_value,
            pow_witness,
            queries,
        })
    }
}
