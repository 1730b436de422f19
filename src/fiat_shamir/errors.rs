//! Fiat-Shamir transcript errors for Basefold challenges.

use thiserror::Error;

use super::transcript::TranscriptPhase;

/// Granular error types for Fiat-Shamir operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// An absorb or squeeze was issued at a point the protocol does not allow.
    #[error("transcript operation `{operation}` is not allowed in phase {phase:?}")]
    OutOfOrder {
        operation: &'static str,
        phase: TranscriptPhase,
    },

    /// Proof-of-work witness fails difficulty requirement.
    #[error("Invalid grinding witness: proof-of-work verification failed")]
    InvalidGrindingWitness,
}
