use thiserror::Error;

use crate::{code::EncodingError, fiat_shamir::errors::TranscriptError, merkle_tree::MerkleError};

/// Usage errors on the prover side. None of them depends on the verifier's randomness.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProverError {
    #[error("polynomial has {got} variables, the configuration expects {expected}")]
    NumVariablesMismatch { expected: usize, got: usize },

    /// A fold was requested for a round other than the next one.
    #[error("challenge for round {got} received while round {expected} is pending")]
    ChallengeOutOfOrder { expected: usize, got: usize },

    #[error("every round has already been folded")]
    AlreadyFinalized,

    /// Queries can only be answered once the final value is known.
    #[error("queries cannot be answered before the last fold")]
    NotFinalized,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}
