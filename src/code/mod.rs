//! Foldable linear codes.
//!
//! A foldable code of rate `2^{-R}` encodes a message of length `2^d` recursively:
//!
//! ```text
//! Enc_0(c)          = c · g
//! Enc_d(left‖right) = (Enc_{d-1}(left) + T_d ∘ Enc_{d-1}(right))
//!                   ‖ (Enc_{d-1}(left) − T_d ∘ Enc_{d-1}(right))
//! ```
//!
//! where `g` is the base generator (a row vector of length `2^R`) and `T_d` holds the non-zero
//! twiddles of the level whose codewords have length `2^{d+R}`. Position `i` of a codeword of
//! length `n` is thus paired with position `i + n/2`, and one random linear combination of the
//! two halves of the message turns into a pointwise combination of each pair.

use std::fmt::Debug;

use p3_field::{ExtensionField, Field};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::{
    random::RandomFoldableCode, reed_muller::ReedMullerCode, reed_solomon::ReedSolomonCode,
};

pub mod encoder;
pub mod random;
pub mod reed_muller;
pub mod reed_solomon;

/// Errors raised while building or using a code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// The message is not a power of two or is longer than the code supports.
    #[error("unsupported message length {len} (maximum is {max_len}, powers of two only)")]
    UnsupportedLength { len: usize, max_len: usize },

    /// The field has no multiplicative subgroup large enough for the requested codewords.
    #[error("codewords of length 2^{log_len} exceed the two-adicity {two_adicity} of the field")]
    TwoAdicityExceeded { log_len: usize, two_adicity: usize },
}

/// Capability interface of a foldable linear code over `F`.
///
/// Levels are indexed by the log of the codeword length they produce: level `L` combines two
/// codewords of length `2^{L-1}` into one of length `2^L`, using `2^{L-1}` twiddles.
/// Only the levels `log_inv_rate() + 1 ..= log_inv_rate() + max_log_message_len()` exist.
pub trait FoldableCode<F: Field>: Debug + Sync {
    /// Log of the inverse rate `R`: codewords are `2^R` times longer than messages.
    fn log_inv_rate(&self) -> usize;

    /// Log of the largest message length the code can encode.
    fn max_log_message_len(&self) -> usize;

    /// The base generator `g`, of length `2^R`.
    fn base_generator(&self) -> &[F];

    /// Twiddles `t_{L,i}` of level `log_len`.
    ///
    /// # Panics
    /// Panics if the level does not exist.
    fn twiddles(&self, log_len: usize) -> &[F];

    /// The per-pair folding weights `1 / (2 · t_{L,i})` of level `log_len`.
    ///
    /// # Panics
    /// Panics if the level does not exist.
    fn fold_weights(&self, log_len: usize) -> &[F];

    /// Relative minimum distance of the code for messages of length `2^log_message_len`.
    fn relative_distance(&self, log_message_len: usize) -> f64;

    /// Length of the codeword of a message of length `2^log_message_len`.
    fn codeword_len(&self, log_message_len: usize) -> usize {
        1 << (log_message_len + self.log_inv_rate())
    }

    /// Encodes `message`, whose entries may live in any extension of `F`.
    fn encode<EF: ExtensionField<F>>(&self, message: &[EF]) -> Result<Vec<EF>, EncodingError>
    where
        Self: Sized,
    {
        encoder::encode(self, message)
    }
}

/// The code families selectable at configuration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "F: Serialize", deserialize = "F: Deserialize<'de>"))]
pub enum Code<F> {
    ReedSolomon(ReedSolomonCode<F>),
    ReedMuller(ReedMullerCode<F>),
    Random(RandomFoldableCode<F>),
}

impl<F: Field> FoldableCode<F> for Code<F> {
    fn log_inv_rate(&self) -> usize {
        match self {
            Self::ReedSolomon(code) => code.log_inv_rate(),
            Self::ReedMuller(code) => code.log_inv_rate(),
            Self::Random(code) => code.log_inv_rate(),
        }
    }

    fn max_log_message_len(&self) -> usize {
        match self {
            Self::ReedSolomon(code) => code.max_log_message_len(),
            Self::ReedMuller(code) => code.max_log_message_len(),
            Self::Random(code) => code.max_log_message_len(),
        }
    }

    fn base_generator(&self) -> &[F] {
        match self {
            Self::ReedSolomon(code) => code.base_generator(),
            Self::ReedMuller(code) => code.base_generator(),
            Self::Random(code) => code.base_generator(),
        }
    }

    fn twiddles(&self, log_len: usize) -> &[F] {
        match self {
            Self::ReedSolomon(code) => code.twiddles(log_len),
            Self::ReedMuller(code) => code.twiddles(log_len),
            Self::Random(code) => code.twiddles(log_len),
        }
    }

    fn fold_weights(&self, log_len: usize) -> &[F] {
        match self {
            Self::ReedSolomon(code) => code.fold_weights(log_len),
            Self::ReedMuller(code) => code.fold_weights(log_len),
            Self::Random(code) => code.fold_weights(log_len),
        }
    }

    fn relative_distance(&self, log_message_len: usize) -> f64 {
        match self {
            Self::ReedSolomon(code) => code.relative_distance(log_message_len),
            Self::ReedMuller(code) => code.relative_distance(log_message_len),
            Self::Random(code) => code.relative_distance(log_message_len),
        }
    }
}

impl<F> From<ReedSolomonCode<F>> for Code<F> {
    fn from(code: ReedSolomonCode<F>) -> Self {
        Self::ReedSolomon(code)
    }
}

impl<F> From<ReedMullerCode<F>> for Code<F> {
    fn from(code: ReedMullerCode<F>) -> Self {
        Self::ReedMuller(code)
    }
}

impl<F> From<RandomFoldableCode<F>> for Code<F> {
    fn from(code: RandomFoldableCode<F>) -> Self {
        Self::Random(code)
    }
}
