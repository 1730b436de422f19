//! Verifier outcomes and error types.

use thiserror::Error;

use crate::fiat_shamir::errors::TranscriptError;

/// Outcome of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Why a proof was rejected. `round` is the fold round, `index` the query index in the initial
/// codeword's fold-pair domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("proof carries {got} commitments, expected {expected}")]
    RoundCountMismatch { expected: usize, got: usize },

    #[error("proof answers {got} queries, expected {expected}")]
    QueryCountMismatch { expected: usize, got: usize },

    /// An opening does not have the shape of the claimed codeword.
    #[error("malformed opening for query {index} at round {round}")]
    MalformedOpening { round: usize, index: usize },

    #[error("Merkle path for query {index} does not match the root of round {round}")]
    MerkleVerificationFailure { round: usize, index: usize },

    #[error("folded value of query {index} is inconsistent at round {round}")]
    FoldConsistencyFailure { round: usize, index: usize },

    #[error("invalid query proof-of-work witness")]
    InvalidPowWitness,
}

/// Usage errors of the verifier. Invalid proofs are reported as [`Verdict::Reject`] instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerifierError {
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}
