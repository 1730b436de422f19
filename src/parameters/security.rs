use std::{f64::consts::LOG2_10, fmt::Display, str::FromStr};

use serde::Serialize;

/// Proximity regime assumed when turning a security level into a number of queries.
///
/// A query catches a word at relative distance `δ` from the code with probability `δ`, so `t`
/// independent queries leave a cheating prover a chance of `(1 - δ)^t`. The assumption decides
/// which `δ` the analysis may rely on for a Reed–Solomon code of rate `ρ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SecurityAssumption {
    /// Unique decoding radius `δ = (1 - ρ) / 2`. Requires no conjecture.
    UniqueDecoding,

    /// Johnson bound `δ = 1 - √ρ - η`, relying on correlated agreement up to the Johnson bound.
    JohnsonBound,

    /// Capacity bound `δ = 1 - ρ - η`, conjecturing list decoding and correlated agreement up
    /// to capacity.
    CapacityBound,
}

impl SecurityAssumption {
    /// The gap `η` between the chosen proximity parameter and the bound, in bits.
    ///
    /// Set to `√ρ/20` under JB and `ρ/20` under CB; unused under UD.
    #[must_use]
    pub const fn log_eta(&self, log_inv_rate: usize) -> f64 {
        match self {
            Self::UniqueDecoding => 0.,
            Self::JohnsonBound => -(0.5 * log_inv_rate as f64 + LOG2_10 + 1.),
            Self::CapacityBound => -(log_inv_rate as f64 + LOG2_10 + 1.),
        }
    }

    /// Computes `log2(1 - δ)` for a code of rate `2^{-log_inv_rate}`.
    #[must_use]
    pub fn log_1_delta(&self, log_inv_rate: usize) -> f64 {
        let eta = self.log_eta(log_inv_rate).exp2();
        let rate = 1. / f64::from(1 << log_inv_rate);

        let delta = match self {
            Self::UniqueDecoding => 0.5 * (1. - rate),
            Self::JohnsonBound => 1. - rate.sqrt() - eta,
            Self::CapacityBound => 1. - rate - eta,
        };

        (1. - delta).log2()
    }

    /// Number of queries `t` such that `(1 - δ)^t <= 2^{-security_level}`.
    #[must_use]
    pub fn queries(&self, security_level: usize, log_inv_rate: usize) -> usize {
        (-(security_level as f64) / self.log_1_delta(log_inv_rate)).ceil() as usize
    }

    /// Bits of security reached by `num_queries` queries.
    #[must_use]
    pub fn queries_error(&self, log_inv_rate: usize, num_queries: usize) -> f64 {
        -(num_queries as f64) * self.log_1_delta(log_inv_rate)
    }
}

/// Number of queries needed in the unique decoding regime of a code with the given relative
/// distance, i.e. with `δ = distance / 2`.
///
/// This is the only analysis available for codes that are not Reed–Solomon.
#[must_use]
pub fn unique_decoding_queries(security_level: usize, relative_distance: f64) -> usize {
    let log_1_delta = (1. - relative_distance / 2.).log2();
    (-(security_level as f64) / log_1_delta).ceil() as usize
}

impl Display for SecurityAssumption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::JohnsonBound => "JohnsonBound",
            Self::CapacityBound => "CapacityBound",
            Self::UniqueDecoding => "UniqueDecoding",
        })
    }
}

impl FromStr for SecurityAssumption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JohnsonBound" => Ok(Self::JohnsonBound),
            "CapacityBound" => Ok(Self::CapacityBound),
            "UniqueDecoding" => Ok(Self::UniqueDecoding),
            _ => Err(format!("Invalid soundness specification: {s}")),
        }
    }
}
