use std::ops::Deref;

use p3_field::{ExtensionField, Field};
use p3_symmetric::{CryptographicHasher, PseudoCompressionFunction};
use serde::{Deserialize, Serialize};
use tracing::{info_span, instrument};

use super::{parameters::BasefoldConfig, prover::errors::ProverError};
use crate::{
    code::FoldableCode,
    merkle_tree::BaseMerkleTree,
    poly::{coeffs::CoefficientList, evals::EvaluationsList},
};

/// Prover-side data of a commitment: the polynomial, its codeword and the Merkle tree over it.
#[derive(Debug)]
pub struct Witness<F, const DIGEST_ELEMS: usize> {
    /// The committed polynomial in coefficient form.
    pub polynomial: CoefficientList<F>,
    /// Its encoding under the configured code.
    pub codeword: Vec<F>,
    /// The commitment sent to the verifier.
    pub root: [F; DIGEST_ELEMS],
    /// Prover data of the Merkle tree over the fold pairs of `codeword`.
    pub prover_data: BaseMerkleTree<F, DIGEST_ELEMS>,
}

/// Encodes and commits polynomials under a fixed configuration.
#[derive(Debug)]
pub struct CommitmentWriter<'a, F, EF, H, C, const DIGEST_ELEMS: usize>(
    &'a BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>,
);

impl<'a, F, EF, H, C, const DIGEST_ELEMS: usize> CommitmentWriter<'a, F, EF, H, C, DIGEST_ELEMS>
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

    /// Encodes `polynomial` and builds the Merkle tree over its codeword.
    #[instrument(skip_all, fields(num_variables = polynomial.num_variables()))]
    pub fn commit(
        &self,
        polynomial: CoefficientList<F>,
    ) -> Result<Witness<F, DIGEST_ELEMS>, ProverError> {
        if polynomial.num_variables() != self.num_variables {
            return Err(ProverError::NumVariablesMismatch {
                expected: self.num_variables,
                got: polynomial.num_variables(),
            });
        }

        let codeword = info_span!("encode").in_scope(|| self.code.encode::<F>(&polynomial))?;
        let (root, prover_data) = self.committer.commit(&codeword);

        Ok(Witness {
            polynomial,
            codeword,
            root,
            prover_data,
        })
    }

    /// Commits a polynomial given by its evaluations over the hypercube.
    pub fn commit_evaluations(
        &self,
        evals: EvaluationsList<F>,
    ) -> Result<Witness<F, DIGEST_ELEMS>, ProverError> {
        self.commit(evals.to_coefficients())
    }
}

impl<F, EF, H, C, const DIGEST_ELEMS: usize> Deref
    for CommitmentWriter<'_, F, EF, H, C, DIGEST_ELEMS>
{
    type Target = BasefoldConfig<F, EF, H, C, DIGEST_ELEMS>;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}
