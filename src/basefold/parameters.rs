use std::{fmt::Display, marker::PhantomData};

use p3_challenger::{FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field};
use p3_symmetric::{CryptographicHasher, PseudoCompressionFunction};
use serde::{Deserialize, Serialize};

use crate::{
    code::{Code, FoldableCode},
    fiat_shamir::{domain_separator::DomainSeparator, transcript::FoldTranscript},
    merkle_tree::MerkleCommitter,
    parameters::{ConfigError, MAX_QUERIES, ProtocolParameters},
};

/// Public parameters of a Basefold instance over `num_variables` variables.
#[derive(Debug, Clone)]
pub struct BasefoldConfig<F, EF, H, C, const DIGEST_ELEMS: usize> {
    pub num_variables: usize,
    pub code: Code<F>,
    pub num_queries: usize,
    pub query_pow_bits: usize,
    pub committer: MerkleCommitter<F, H, C, DIGEST_ELEMS>,
    _extension_field: PhantomData<EF>,
}

impl<F, EF, H, C, const DIGEST_ELEMS: usize> BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>
where
    F: Field,
    EF: ExtensionField<F>,
    H: CryptographicHasher<F, [F; DIGEST_ELEMS]> + Sync,
    C: PseudoCompressionFunction<[F; DIGEST_ELEMS], 2> + Sync,
    [F; DIGEST_ELEMS]: Serialize + for<'de> Deserialize<'de>,
{
    pub fn new(
        num_variables: usize,
        code: impl Into<Code<F>>,
        params: ProtocolParameters<H, C>,
    ) -> Result<Self, ConfigError> {
        let code = code.into();
        if num_variables == 0 {
            return Err(ConfigError::ZeroVariables);
        }
        if params.log_inv_rate == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if code.log_inv_rate() != params.log_inv_rate {
            return Err(ConfigError::RateMismatch {
                code: code.log_inv_rate(),
                params: params.log_inv_rate,
            });
        }
        if num_variables > code.max_log_message_len() {
            return Err(ConfigError::TooManyVariables {
                num_variables,
                max: code.max_log_message_len(),
            });
        }
        if params.num_queries == 0 {
            return Err(ConfigError::ZeroQueries);
        }
        if params.num_queries > MAX_QUERIES {
            return Err(ConfigError::TooManyQueries {
                num_queries: params.num_queries,
                max: MAX_QUERIES,
            });
        }

        Ok(Self {
            num_variables,
            code,
            num_queries: params.num_queries,
            query_pow_bits: params.query_pow_bits,
            committer: MerkleCommitter::new(params.merkle_hash, params.merkle_compress),
            _extension_field: PhantomData,
        })
    }

    #[must_use]
    pub fn log_inv_rate(&self) -> usize {
        self.code.log_inv_rate()
    }

    /// Log length of the codeword folded in round `round` (`round == num_variables` is the final
    /// codeword).
    #[must_use]
    pub fn log_codeword_len(&self, round: usize) -> usize {
        self.num_variables - round + self.log_inv_rate()
    }

    /// Log of the number of fold pairs of the initial codeword, i.e. of the query domain.
    #[must_use]
    pub fn log_query_domain(&self) -> usize {
        self.log_codeword_len(0) - 1
    }

    #[must_use]
    pub fn domain_separator(&self) -> DomainSeparator<F> {
        let (family, seed) = match &self.code {
            Code::ReedSolomon(_) => (0, 0),
            Code::Random(code) => (1, code.seed()),
            Code::ReedMuller(_) => (2, 0),
        };

        let mut domsep = DomainSeparator::new("basefold");
        domsep.add_parameters(&[
            self.num_variables as u64,
            self.log_inv_rate() as u64,
            family,
            seed,
        ]);
        domsep.add_basefold_proof::<EF>(
            self.num_variables,
            DIGEST_ELEMS,
            self.num_queries,
            self.query_pow_bits,
        );
        domsep
    }

    /// A fresh transcript for one session under these parameters.
    pub fn transcript<Challenger>(
        &self,
        challenger: Challenger,
    ) -> FoldTranscript<F, EF, Challenger>
    where
        Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    {
        FoldTranscript::new(
            &self.domain_separator(),
            challenger,
            self.num_variables,
            self.query_pow_bits,
        )
    }
}

impl<F, EF, H, C, const DIGEST_ELEMS: usize> Display for BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>
where
    F: Field,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let family = match self.code {
            Code::ReedSolomon(_) => "Reed-Solomon",
            Code::ReedMuller(_) => "Reed-Muller",
            Code::Random(_) => "random foldable",
        };
        writeln!(
            f,
            "Basefold over {} variables, {family} code of rate 2^-{} (distance {:.3})",
            self.num_variables,
            self.code.log_inv_rate(),
            self.code.relative_distance(self.num_variables),
        )?;
        writeln!(
            f,
            "{} queries, {} bits of query PoW",
            self.num_queries, self.query_pow_bits
        )
    }
}
