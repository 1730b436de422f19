//! Main error type of the Basefold implementation.

use thiserror::Error;

use crate::{
    basefold::{prover::errors::ProverError, verifier::errors::VerifierError},
    code::EncodingError,
    fiat_shamir::errors::TranscriptError,
    merkle_tree::MerkleError,
    parameters::ConfigError,
};

/// Top-level error type for Basefold operations.
///
/// Every variant is a usage error. A proof that fails verification is not an error but a
/// [`Verdict::Reject`](crate::basefold::verifier::errors::Verdict::Reject).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BasefoldError {
    /// The protocol parameters are inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Fiat-Shamir messages were exchanged out of order.
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error(transparent)]
    Prover(#[from] ProverError),

    #[error(transparent)]
    Verifier(#[from] VerifierError),
}
