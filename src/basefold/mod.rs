use committer::CommitmentWriter;
use p3_baby_bear::{BabyBear, Poseidon2BabyBear};
use p3_challenger::DuplexChallenger;
use p3_field::extension::BinomialExtensionField;
use p3_symmetric::{PaddingFreeSponge, TruncatedPermutation};
use parameters::BasefoldConfig;
use prover::Prover;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::info;
use verifier::{Verifier, errors::Verdict};

use crate::{
    code::{Code, FoldableCode},
    errors::BasefoldError,
    parameters::ProtocolParameters,
    poly::coeffs::CoefficientList,
};

pub mod committer;
pub mod fold;
pub mod parameters;
pub mod proof;
pub mod prover;
pub mod verifier;

#[cfg(test)]
mod tests;

type F = BabyBear;
type EF = BinomialExtensionField<F, 4>;
type Perm = Poseidon2BabyBear<16>;

type MyHash = PaddingFreeSponge<Perm, 16, 8, 8>;
type MyCompress = TruncatedPermutation<Perm, 2, 8, 16>;
type MyChallenger = DuplexChallenger<F, Perm, 16, 8>;

/// Run a complete Basefold lifecycle over BabyBear.
///
/// - Samples a random multilinear polynomial over `num_variables` variables
/// - Commits to it under `code`
/// - Proves with a fresh Fiat-Shamir transcript
/// - Verifies against a second transcript built from the same parameters
pub fn make_basefold_things(
    num_variables: usize,
    code: Code<F>,
    num_queries: usize,
    query_pow_bits: usize,
) -> Result<Verdict, BasefoldError> {
    // Create hash and compression functions for the Merkle tree
    let mut rng = SmallRng::seed_from_u64(1);
    let perm = Perm::new_from_rng_128(&mut rng);

    let params = ProtocolParameters {
        log_inv_rate: code.log_inv_rate(),
        num_queries,
        query_pow_bits,
        merkle_hash: MyHash::new(perm.clone()),
        merkle_compress: MyCompress::new(perm.clone()),
    };
    let config = BasefoldConfig::<F, EF, _, _, 8>::new(num_variables, code, params)?;

    let polynomial =
        CoefficientList::<F>::new((0..1 << num_variables).map(|_| rng.random()).collect());

    let witness = CommitmentWriter::new(&config).commit(polynomial)?;

    let mut prover_transcript = config.transcript(MyChallenger::new(perm.clone()));
    let proof = Prover(&config).prove(&mut prover_transcript, witness)?;
    info!(elements = proof.num_elements(), "proof generated");

    let mut verifier_transcript = config.transcript(MyChallenger::new(perm));
    Ok(Verifier::new(&config).verify(&mut verifier_transcript, &proof)?)
}
