//! Per-round prover state of the Basefold fold phase.

use p3_field::{ExtensionField, Field};
use p3_symmetric::{CryptographicHasher, PseudoCompressionFunction};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::errors::ProverError;
use crate::{
    basefold::{
        committer::Witness,
        fold::{fold_codeword, fold_message},
        parameters::BasefoldConfig,
        proof::QueryProof,
    },
    code::FoldableCode,
    merkle_tree::ExtensionMerkleTree,
};

/// Lifecycle of a [`RoundState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProverPhase {
    /// The initial codeword is committed; round 0 is next.
    Committed,
    /// Round `round` is next.
    Folding { round: usize },
    /// Every round is folded and the final value is known; queries can be answered.
    Finalized,
}

/// Record of one fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRound<EF> {
    pub round: usize,
    pub challenge: EF,
    pub input_len: usize,
    pub output_len: usize,
}

/// What the prover sends after folding a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutput<F, EF, const DIGEST_ELEMS: usize> {
    /// Root of the freshly folded codeword.
    Commitment([F; DIGEST_ELEMS]),
    /// The fully folded message, sent in the clear after the last round.
    Final(EF),
}

/// A folded codeword together with its commitment.
#[derive(Debug)]
struct CommittedRound<F, EF, const DIGEST_ELEMS: usize> {
    codeword: Vec<EF>,
    prover_data: ExtensionMerkleTree<F, EF, DIGEST_ELEMS>,
}

/// Prover state across the fold rounds of one session.
///
/// Codewords live in an arena indexed by round: the initial base field codeword in the witness,
/// then one committed extension codeword per round `1..num_variables`. The codeword produced by
/// the last fold equals `g · final_value` and is not committed.
#[derive(Debug)]
pub struct RoundState<'a, F, EF, H, C, const DIGEST_ELEMS: usize> {
    config: &'a BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>,
    phase: ProverPhase,
    witness: Witness<F, DIGEST_ELEMS>,
    message: Vec<EF>,
    committed: Vec<CommittedRound<F, EF, DIGEST_ELEMS>>,
    history: Vec<FoldRound<EF>>,
    final_value: Option<EF>,
}

impl<'a, F, EF, H, C, const DIGEST_ELEMS: usize> RoundState<'a, F, EF, H, C, DIGEST_ELEMS>
where
    F: Field,
    EF: ExtensionField<F>,
    H: CryptographicHasher<F, [F; DIGEST_ELEMS]> + Sync,
    C: PseudoCompressionFunction<[F; DIGEST_ELEMS], 2> + Sync,
    [F; DIGEST_ELEMS]: Serialize + for<'de> Deserialize<'de>,
{
    pub fn new(
        config: &'a BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>,
        witness: Witness<F, DIGEST_ELEMS>,
    ) -> Result<Self, ProverError> {
        if witness.polynomial.num_variables() != config.num_variables {
            return Err(ProverError::NumVariablesMismatch {
                expected: config.num_variables,
                got: witness.polynomial.num_variables(),
            });
        }

        Ok(Self {
            config,
            phase: ProverPhase::Committed,
            message: witness.polynomial.iter().map(|&c| c.into()).collect(),
            witness,
            committed: Vec::with_capacity(config.num_variables - 1),
            history: Vec::with_capacity(config.num_variables),
            final_value: None,
        })
    }

    #[must_use]
    pub const fn phase(&self) -> ProverPhase {
        self.phase
    }

    /// Root of the initial codeword.
    #[must_use]
    pub const fn initial_root(&self) -> [F; DIGEST_ELEMS] {
        self.witness.root
    }

    /// Folds round `round` with `challenge`.
    ///
    /// Rounds must be folded in order, each exactly once.
    #[instrument(skip_all, fields(round = round))]
    pub fn fold(
        &mut self,
        round: usize,
        challenge: EF,
    ) -> Result<RoundOutput<F, EF, DIGEST_ELEMS>, ProverError> {
        let expected = match self.phase {
            ProverPhase::Committed => 0,
            ProverPhase::Folding { round } => round,
            ProverPhase::Finalized => return Err(ProverError::AlreadyFinalized),
        };
        if round != expected {
            return Err(ProverError::ChallengeOutOfOrder {
                expected,
                got: round,
            });
        }

        let code = &self.config.code;
        let folded = match self.committed.last() {
            None => fold_codeword(&self.witness.codeword, challenge, code),
            Some(previous) => fold_codeword(&previous.codeword, challenge, code),
        };
        let (left, right) = self.message.split_at(self.message.len() / 2);
        self.message = fold_message(left, right, challenge);

        self.history.push(FoldRound {
            round,
            challenge,
            input_len: 2 * folded.len(),
            output_len: folded.len(),
        });

        if round + 1 < self.config.num_variables {
            let (root, prover_data) = self.config.committer.commit_extension(&folded);
            self.committed.push(CommittedRound {
                codeword: folded,
                prover_data,
            });
            self.phase = ProverPhase::Folding { round: round + 1 };
            Ok(RoundOutput::Commitment(root))
        } else {
            let value = self.message[0];
            debug_assert!(
                folded
                    .iter()
                    .zip(code.base_generator())
                    .all(|(&x, &g)| x == value * g),
                "final codeword is not an encoding of the final value"
            );
            debug!(len = folded.len(), "reached the base code");
            self.final_value = Some(value);
            self.phase = ProverPhase::Finalized;
            Ok(RoundOutput::Final(value))
        }
    }

    /// The final value, once every round is folded.
    #[must_use]
    pub const fn final_value(&self) -> Option<EF> {
        self.final_value
    }

    /// History of the folds performed so far.
    #[must_use]
    pub fn fold_rounds(&self) -> &[FoldRound<EF>] {
        &self.history
    }

    /// Opens query `index` (a fold pair of the initial codeword) in every committed round.
    pub fn open(&self, index: usize) -> Result<QueryProof<F, EF, DIGEST_ELEMS>, ProverError> {
        if self.phase != ProverPhase::Finalized {
            return Err(ProverError::NotFinalized);
        }

        let committer = &self.config.committer;
        let initial = committer.open(
            &self.witness.prover_data,
            self.witness.codeword.len() / 2,
            index,
        )?;
        let rounds = self
            .committed
            .iter()
            .map(|round| {
                let half = round.codeword.len() / 2;
                committer.open_extension(&round.prover_data, half, index % half)
            })
            .collect::<Result<_, _>>()?;

        Ok(QueryProof { initial, rounds })
    }
}
