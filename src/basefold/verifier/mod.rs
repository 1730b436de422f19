use std::ops::Deref;

use errors::{Rejection, Verdict, VerifierError};
use itertools::Itertools;
use p3_challenger::{FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field};
use p3_symmetric::{CryptographicHasher, PseudoCompressionFunction};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::{
    fold::fold_pair,
    parameters::BasefoldConfig,
    proof::{BasefoldProof, MerkleOpening, QueryProof},
};
use crate::{
    code::FoldableCode,
    fiat_shamir::{errors::TranscriptError, transcript::FoldTranscript},
};

pub mod errors;

/// Everything the verifier knows about a session before looking at query openings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldClaims<F, EF, const DIGEST_ELEMS: usize> {
    /// Roots of the initial codeword and of the folded codewords of rounds `1..num_variables`.
    pub roots: Vec<[F; DIGEST_ELEMS]>,
    /// Folding challenge of every round.
    pub challenges: Vec<EF>,
    /// Claimed fully folded message.
    pub final_value: EF,
}

/// Wrapper around the Basefold verifier configuration.
#[derive(Debug)]
pub struct Verifier<'a, F, EF, H, C, const DIGEST_ELEMS: usize>(
    pub &'a BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>,
);

impl<F, EF, H, C, const DIGEST_ELEMS: usize> Deref for Verifier<'_, F, EF, H, C, DIGEST_ELEMS> {
    type Target = BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<'a, F, EF, H, C, const DIGEST_ELEMS: usize> Verifier<'a, F, EF, H, C, DIGEST_ELEMS>
where
    F: Field,
    EF: ExtensionField<F>,
    H: CryptographicHasher<F, [F; DIGEST_ELEMS]> + Sync,
    C: PseudoCompressionFunction<[F; DIGEST_ELEMS], 2> + Sync,
    [F; DIGEST_ELEMS]: Serialize + for<'de> Deserialize<'de>,
{
    pub const fn new(config: &'a BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>) -> Self {
        Self(config)
    }

    /// Verifies a non-interactive proof.
    ///
    /// Replays the transcript: each root is absorbed before its folding challenge is squeezed,
    /// the final value and the PoW witness come next, and the query indices last. Invalid proofs
    /// yield `Ok(Verdict::Reject(_))`; errors are reserved for misuse of the transcript.
    #[instrument(skip_all, fields(num_variables = self.num_variables))]
    pub fn verify<Challenger>(
        &self,
        transcript: &mut FoldTranscript<F, EF, Challenger>,
        proof: &BasefoldProof<F, EF, DIGEST_ELEMS>,
    ) -> Result<Verdict, VerifierError>
    where
        Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    {
        if proof.commitments.len() != self.num_variables {
            return Ok(reject(Rejection::RoundCountMismatch {
                expected: self.num_variables,
                got: proof.commitments.len(),
            }));
        }

        let mut challenges = Vec::with_capacity(self.num_variables);
        for root in &proof.commitments {
            transcript.observe_commitment(root)?;
            challenges.push(transcript.sample_folding_challenge()?);
        }
        transcript.observe_final_value(proof.final_value)?;

        match transcript.check_pow(proof.pow_witness) {
            Ok(()) => {}
            Err(TranscriptError::InvalidGrindingWitness) => {
                return Ok(reject(Rejection::InvalidPowWitness));
            }
            Err(err) => return Err(err.into()),
        }

        let indices =
            transcript.sample_query_indices(self.num_queries, self.log_query_domain())?;
        if indices.len() != proof.queries.len() {
            return Ok(reject(Rejection::QueryCountMismatch {
                expected: indices.len(),
                got: proof.queries.len(),
            }));
        }

        let claims = FoldClaims {
            roots: proof.commitments.clone(),
            challenges,
            final_value: proof.final_value,
        };
        let result = indices
            .iter()
            .zip_eq(&proof.queries)
            .try_for_each(|(&index, query)| self.check_query(&claims, index, query));

        Ok(match result {
            Ok(()) => Verdict::Accept,
            Err(rejection) => reject(rejection),
        })
    }

    /// Checks openings for caller-chosen indices against caller-chosen challenges.
    ///
    /// This is the interactive form of the protocol: `claims` holds the roots received from the
    /// prover and the challenges sent to it, `openings` the prover's answer to every index.
    pub fn check_queries(
        &self,
        claims: &FoldClaims<F, EF, DIGEST_ELEMS>,
        openings: &[(usize, QueryProof<F, EF, DIGEST_ELEMS>)],
    ) -> Verdict {
        match openings
            .iter()
            .try_for_each(|(index, query)| self.check_query(claims, *index, query))
        {
            Ok(()) => Verdict::Accept,
            Err(rejection) => reject(rejection),
        }
    }

    /// The acceptance predicate of a single query.
    ///
    /// `index` selects the fold pair `(x_j, x_{j+n/2})` of the initial codeword. In round `i`
    /// the query follows position `p_i = index mod n_i/2`: the value folded in round `i - 1` must
    /// equal the opened value at `p_{i-1}`, which sits on the low or high side of leaf `p_i`.
    /// After the last round the folded value must equal the final codeword `g · final_value` at
    /// `p_{m-1}`.
    pub fn check_query(
        &self,
        claims: &FoldClaims<F, EF, DIGEST_ELEMS>,
        index: usize,
        query: &QueryProof<F, EF, DIGEST_ELEMS>,
    ) -> Result<(), Rejection> {
        let num_rounds = self.num_variables;
        if claims.roots.len() != num_rounds {
            return Err(Rejection::RoundCountMismatch {
                expected: num_rounds,
                got: claims.roots.len(),
            });
        }
        if claims.challenges.len() != num_rounds {
            return Err(Rejection::RoundCountMismatch {
                expected: num_rounds,
                got: claims.challenges.len(),
            });
        }
        if index >> self.log_query_domain() != 0 {
            return Err(Rejection::MalformedOpening { round: 0, index });
        }
        if query.rounds.len() != num_rounds - 1 {
            return Err(Rejection::MalformedOpening {
                round: (query.rounds.len() + 1).min(num_rounds),
                index,
            });
        }

        self.check_path_len(0, index, &query.initial)?;
        let log_pairs = self.log_query_domain();
        if !self
            .committer
            .verify(&claims.roots[0], log_pairs, index, &query.initial)
        {
            return Err(Rejection::MerkleVerificationFailure { round: 0, index });
        }
        let [a, b] = query.initial.values;
        let mut folded = fold_pair::<F, EF>(
            a.into(),
            b.into(),
            claims.challenges[0],
            self.fold_weight(0, index),
        );
        let mut position = index;

        for (round, opening) in (1..num_rounds).zip(&query.rounds) {
            let log_pairs = self.log_codeword_len(round) - 1;
            let half = 1 << log_pairs;
            let leaf = position & (half - 1);
            self.check_path_len(round, index, opening)?;
            if !self
                .committer
                .verify_extension(&claims.roots[round], log_pairs, leaf, opening)
            {
                return Err(Rejection::MerkleVerificationFailure { round, index });
            }

            let [lo, hi] = opening.values;
            let opened = if position < half { lo } else { hi };
            if opened != folded {
                return Err(Rejection::FoldConsistencyFailure { round, index });
            }

            folded = fold_pair(lo, hi, claims.challenges[round], self.fold_weight(round, leaf));
            position = leaf;
        }

        let expected = claims.final_value * self.code.base_generator()[position];
        if folded != expected {
            return Err(Rejection::FoldConsistencyFailure {
                round: num_rounds,
                index,
            });
        }
        Ok(())
    }

    /// Rejects an opening whose path does not match the tree height of round `round`.
    fn check_path_len<V>(
        &self,
        round: usize,
        index: usize,
        opening: &MerkleOpening<F, V, DIGEST_ELEMS>,
    ) -> Result<(), Rejection> {
        if opening.path.len() != self.log_codeword_len(round) - 1 {
            return Err(Rejection::MalformedOpening { round, index });
        }
        Ok(())
    }

    fn fold_weight(&self, round: usize, position: usize) -> F {
        self.code.fold_weights(self.log_codeword_len(round))[position]
    }
}

fn reject(rejection: Rejection) -> Verdict {
    warn!(%rejection, "proof rejected");
    Verdict::Reject(rejection)
}
