use std::fmt::Display;

use thiserror::Error;

pub use self::security::{SecurityAssumption, unique_decoding_queries};

pub mod security;

/// Largest number of queries a configuration accepts.
///
/// Unique decoding over a code whose distance shrinks with the message length, such as the
/// Reed–Muller or random families, quickly asks for far more.
pub const MAX_QUERIES: usize = 1 << 16;

/// Errors raised when a set of parameters cannot describe a Basefold instance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// At least one fold round is needed.
    #[error("the polynomial must have at least one variable")]
    ZeroVariables,

    /// The code must be strictly longer than the message.
    #[error("log inverse rate must be at least 1")]
    ZeroRate,

    /// The code's rate differs from the one requested in the protocol parameters.
    #[error("code has log inverse rate {code}, parameters ask for {params}")]
    RateMismatch { code: usize, params: usize },

    /// The code cannot encode messages of `2^num_variables` elements.
    #[error("{num_variables} variables exceed the code's maximum of {max}")]
    TooManyVariables { num_variables: usize, max: usize },

    /// Soundness needs at least one query.
    #[error("the number of queries must be positive")]
    ZeroQueries,

    #[error("{num_queries} queries exceed the maximum of {max}")]
    TooManyQueries { num_queries: usize, max: usize },
}

/// Configuration parameters for Basefold proofs.
#[derive(Clone, Debug)]
pub struct ProtocolParameters<H, C> {
    /// The logarithmic inverse rate of the code.
    pub log_inv_rate: usize,
    /// Number of consistency queries. Chosen by the caller, e.g. with
    /// [`SecurityAssumption::queries`], and at most [`MAX_QUERIES`].
    pub num_queries: usize,
    /// Proof-of-work bits required before the query indices are derived. Zero disables grinding.
    pub query_pow_bits: usize,
    /// Hash used for the Merkle leaves.
    pub merkle_hash: H,
    /// Compression used for the inner Merkle nodes.
    pub merkle_compress: C,
}

impl<H, C> Display for ProtocolParameters<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Rate: 2^-{}, queries: {}, query PoW: {} bits",
            self.log_inv_rate, self.num_queries, self.query_pow_bits
        )
    }
}
