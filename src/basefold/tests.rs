use p3_field::PrimeCharacteristicRing;
use proptest::prelude::*;

use super::{
    proof::BasefoldProof,
    prover::{
        ProverError,
        round_state::{ProverPhase, RoundOutput, RoundState},
    },
    verifier::{FoldClaims, errors::Rejection},
    *,
};
use crate::{
    code::{RandomFoldableCode, ReedMullerCode, ReedSolomonCode},
    merkle_tree::MerkleError,
    parameters::{ConfigError, MAX_QUERIES, SecurityAssumption, unique_decoding_queries},
    poly::{evals::EvaluationsList, multilinear::MultilinearPoint},
};

type Config = BasefoldConfig<F, EF, MyHash, MyCompress, 8>;

fn perm() -> Perm {
    Perm::new_from_rng_128(&mut SmallRng::seed_from_u64(1))
}

fn params(
    log_inv_rate: usize,
    num_queries: usize,
    query_pow_bits: usize,
) -> ProtocolParameters<MyHash, MyCompress> {
    ProtocolParameters {
        log_inv_rate,
        num_queries,
        query_pow_bits,
        merkle_hash: MyHash::new(perm()),
        merkle_compress: MyCompress::new(perm()),
    }
}

fn config(
    num_variables: usize,
    code: impl Into<Code<F>>,
    num_queries: usize,
    query_pow_bits: usize,
) -> Config {
    let code = code.into();
    let params = params(code.log_inv_rate(), num_queries, query_pow_bits);
    Config::new(num_variables, code, params).unwrap()
}

fn rs(log_inv_rate: usize, max_log_message_len: usize) -> Code<F> {
    ReedSolomonCode::<F>::new(log_inv_rate, max_log_message_len)
        .unwrap()
        .into()
}

fn random_polynomial(num_variables: usize, rng: &mut SmallRng) -> CoefficientList<F> {
    CoefficientList::new((0..1 << num_variables).map(|_| rng.random()).collect())
}

fn prove(config: &Config, polynomial: CoefficientList<F>) -> BasefoldProof<F, EF, 8> {
    let witness = CommitmentWriter::new(config).commit(polynomial).unwrap();
    let mut transcript = config.transcript(MyChallenger::new(perm()));
    Prover(config).prove(&mut transcript, witness).unwrap()
}

fn verify(config: &Config, proof: &BasefoldProof<F, EF, 8>) -> Verdict {
    let mut transcript = config.transcript(MyChallenger::new(perm()));
    Verifier::new(config).verify(&mut transcript, proof).unwrap()
}

/// Runs every fold round with caller-chosen challenges, as in the interactive protocol.
fn fold_all<'a>(
    config: &'a Config,
    polynomial: CoefficientList<F>,
    challenges: &[EF],
) -> (RoundState<'a, F, EF, MyHash, MyCompress, 8>, FoldClaims<F, EF, 8>) {
    let witness = CommitmentWriter::new(config).commit(polynomial).unwrap();
    let mut state = Prover(config).start(witness).unwrap();

    let mut roots = vec![state.initial_root()];
    let mut final_value = None;
    for (round, &challenge) in challenges.iter().enumerate() {
        match state.fold(round, challenge).unwrap() {
            RoundOutput::Commitment(root) => roots.push(root),
            RoundOutput::Final(value) => final_value = Some(value),
        }
    }

    let claims = FoldClaims {
        roots,
        challenges: challenges.to_vec(),
        final_value: final_value.unwrap(),
    };
    (state, claims)
}

#[test]
fn test_completeness_reed_solomon() {
    let mut rng = SmallRng::seed_from_u64(0);
    for num_variables in 1..=8 {
        for log_inv_rate in 1..=3 {
            for query_pow_bits in [0, 3] {
                let config = config(num_variables, rs(log_inv_rate, 8), 20, query_pow_bits);
                let proof = prove(&config, random_polynomial(num_variables, &mut rng));
                assert_eq!(verify(&config, &proof), Verdict::Accept);
            }
        }
    }
}

#[test]
fn test_completeness_random_code() {
    let mut rng = SmallRng::seed_from_u64(1);
    for num_variables in 1..=7 {
        for log_inv_rate in 1..=3 {
            let code = RandomFoldableCode::<F>::new(log_inv_rate, 7, num_variables as u64);
            let config = config(num_variables, code, 20, 0);
            let proof = prove(&config, random_polynomial(num_variables, &mut rng));
            assert_eq!(verify(&config, &proof), Verdict::Accept);
        }
    }
}

#[test]
fn test_completeness_reed_muller() {
    let mut rng = SmallRng::seed_from_u64(14);
    for num_variables in 1..=7 {
        for log_inv_rate in 1..=3 {
            let code = ReedMullerCode::<F>::new(log_inv_rate, 7);
            let config = config(num_variables, code, 20, 0);
            let proof = prove(&config, random_polynomial(num_variables, &mut rng));
            assert_eq!(verify(&config, &proof), Verdict::Accept);
        }
    }
}

#[test]
fn test_reed_muller_final_value_and_tampering() {
    let config = config(4, ReedMullerCode::<F>::new(1, 4), 8, 0);
    let polynomial = random_polynomial(4, &mut SmallRng::seed_from_u64(15));
    let challenges: Vec<EF> = (1..=4).map(EF::from_u64).collect();
    let (_, claims) = fold_all(&config, polynomial.clone(), &challenges);
    assert_eq!(
        claims.final_value,
        polynomial.evaluate(&MultilinearPoint::new(challenges))
    );

    let mut proof = prove(&config, polynomial);
    proof.final_value += EF::ONE;
    assert!(!verify(&config, &proof).is_accept());
}

#[test]
fn test_make_basefold_things() {
    assert_eq!(make_basefold_things(6, rs(2, 8), 30, 0), Ok(Verdict::Accept));
    assert_eq!(
        make_basefold_things(5, RandomFoldableCode::<F>::new(1, 5, 3).into(), 30, 2),
        Ok(Verdict::Accept)
    );
    assert_eq!(
        make_basefold_things(0, rs(1, 4), 30, 0),
        Err(BasefoldError::Config(ConfigError::ZeroVariables))
    );
}

#[test]
fn test_proving_is_deterministic() {
    let config = config(5, rs(1, 5), 16, 2);
    let polynomial = random_polynomial(5, &mut SmallRng::seed_from_u64(2));
    assert_eq!(
        prove(&config, polynomial.clone()),
        prove(&config, polynomial)
    );
}

#[test]
fn test_round_count() {
    let mut rng = SmallRng::seed_from_u64(3);
    for num_variables in [1, 4, 10] {
        let config = config(num_variables, rs(1, 10), 16, 0);
        let polynomial = random_polynomial(num_variables, &mut rng);

        let proof = prove(&config, polynomial.clone());
        assert_eq!(proof.commitments.len(), num_variables);
        assert!(!proof.queries.is_empty() && proof.queries.len() <= 16);
        for query in &proof.queries {
            assert_eq!(query.rounds.len(), num_variables - 1);
            assert_eq!(query.initial.path.len(), num_variables);
            for (round, opening) in (1..).zip(&query.rounds) {
                assert_eq!(opening.path.len(), num_variables - round);
            }
        }

        let challenges: Vec<EF> = (0..num_variables).map(|_| rng.random()).collect();
        let (state, _) = fold_all(&config, polynomial, &challenges);
        let rounds = state.fold_rounds();
        assert_eq!(rounds.len(), num_variables);
        for (i, round) in rounds.iter().enumerate() {
            assert_eq!(round.round, i);
            assert_eq!(round.challenge, challenges[i]);
            assert_eq!(round.input_len, 1 << config.log_codeword_len(i));
            assert_eq!(round.output_len, round.input_len / 2);
        }
    }
}

#[test]
fn test_final_value_is_evaluation() {
    let mut rng = SmallRng::seed_from_u64(4);
    let codes = [rs(2, 6), RandomFoldableCode::<F>::new(2, 6, 9).into()];
    for code in codes {
        let config = config(6, code, 8, 0);
        let polynomial = random_polynomial(6, &mut rng);
        let challenges: Vec<EF> = (0..6).map(|_| rng.random()).collect();
        let expected = polynomial.evaluate(&MultilinearPoint::new(challenges.clone()));

        let (state, claims) = fold_all(&config, polynomial, &challenges);
        assert_eq!(state.final_value(), Some(expected));
        assert_eq!(claims.final_value, expected);
    }
}

#[test]
fn test_proof_claims_evaluation_at_transcript_challenges() {
    let config = config(5, rs(1, 5), 8, 0);
    let polynomial = random_polynomial(5, &mut SmallRng::seed_from_u64(16));
    let proof = prove(&config, polynomial.clone());

    // Replaying the transcript yields the point; nothing else in the proof names one.
    let mut transcript = config.transcript(MyChallenger::new(perm()));
    let challenges: Vec<EF> = proof
        .commitments
        .iter()
        .map(|root| {
            transcript.observe_commitment(root).unwrap();
            transcript.sample_folding_challenge().unwrap()
        })
        .collect();
    assert_eq!(
        proof.final_value,
        polynomial.evaluate(&MultilinearPoint::new(challenges))
    );
}

#[test]
fn test_commit_evaluations_matches_coefficients() {
    let config = config(5, rs(1, 5), 8, 0);
    let mut rng = SmallRng::seed_from_u64(5);
    let evals = EvaluationsList::<F>::new((0..32).map(|_| rng.random()).collect());
    let writer = CommitmentWriter::new(&config);
    let from_evals = writer.commit_evaluations(evals.clone()).unwrap();
    let from_coeffs = writer.commit(evals.to_coefficients()).unwrap();
    assert_eq!(from_evals.root, from_coeffs.root);
}

#[test]
fn test_tampered_initial_opening_is_rejected() {
    let config = config(4, rs(1, 4), 8, 0);
    let mut proof = prove(&config, random_polynomial(4, &mut SmallRng::seed_from_u64(6)));
    proof.queries[0].initial.values[0] += F::ONE;
    assert!(matches!(
        verify(&config, &proof),
        Verdict::Reject(Rejection::MerkleVerificationFailure { round: 0, .. })
    ));
}

#[test]
fn test_tampered_round_opening_is_rejected() {
    let config = config(4, rs(1, 4), 8, 0);
    let mut proof = prove(&config, random_polynomial(4, &mut SmallRng::seed_from_u64(7)));
    proof.queries[0].rounds[1].values[1] += EF::ONE;
    assert!(matches!(
        verify(&config, &proof),
        Verdict::Reject(Rejection::MerkleVerificationFailure { round: 2, .. })
    ));
}

#[test]
fn test_tampered_final_value_is_rejected() {
    let config = config(4, rs(2, 4), 8, 0);
    let mut proof = prove(&config, random_polynomial(4, &mut SmallRng::seed_from_u64(8)));
    proof.final_value += EF::ONE;
    assert!(!verify(&config, &proof).is_accept());
}

#[test]
fn test_proof_shape_is_checked() {
    let config = config(4, rs(1, 4), 8, 0);
    let proof = prove(&config, random_polynomial(4, &mut SmallRng::seed_from_u64(9)));

    let mut missing_root = proof.clone();
    missing_root.commitments.pop();
    assert_eq!(
        verify(&config, &missing_root),
        Verdict::Reject(Rejection::RoundCountMismatch {
            expected: 4,
            got: 3
        })
    );

    let mut missing_query = proof.clone();
    missing_query.queries.pop();
    assert_eq!(
        verify(&config, &missing_query),
        Verdict::Reject(Rejection::QueryCountMismatch {
            expected: proof.queries.len(),
            got: proof.queries.len() - 1
        })
    );

    let mut missing_round = proof;
    missing_round.queries[0].rounds.pop();
    assert!(matches!(
        verify(&config, &missing_round),
        Verdict::Reject(Rejection::MalformedOpening { round: 3, .. })
    ));
}

#[test]
fn test_pow_witness_is_checked() {
    let mut rng = SmallRng::seed_from_u64(10);

    let with_pow = config(3, rs(1, 3), 8, 4);
    let mut proof = prove(&with_pow, random_polynomial(3, &mut rng));
    assert!(proof.pow_witness.is_some());
    proof.pow_witness = None;
    assert_eq!(
        verify(&with_pow, &proof),
        Verdict::Reject(Rejection::InvalidPowWitness)
    );

    let without_pow = config(3, rs(1, 3), 8, 0);
    let mut proof = prove(&without_pow, random_polynomial(3, &mut rng));
    assert_eq!(proof.pow_witness, None);
    proof.pow_witness = Some(F::ONE);
    assert_eq!(
        verify(&without_pow, &proof),
        Verdict::Reject(Rejection::InvalidPowWitness)
    );
}

#[test]
fn test_eight_coefficient_example() {
    // m = 3, rate 1/2: codewords of length 16, 8 fold pairs.
    let config = config(3, rs(1, 3), 4, 0);
    assert_eq!(config.log_codeword_len(0), 4);

    let polynomial = CoefficientList::new((1..=8).map(F::from_u64).collect());
    let challenges = [3, 5, 2].map(EF::from_u64);
    let (state, claims) = fold_all(&config, polynomial, &challenges);

    // [1..4] + 3·[5..8] = [16, 20, 24, 28], then [16, 20] + 5·[24, 28] = [136, 160],
    // then 136 + 2·160.
    assert_eq!(claims.final_value, EF::from_u64(456));

    let verifier = Verifier::new(&config);
    let openings: Vec<_> = [0, 3, 5, 7]
        .into_iter()
        .map(|index| (index, state.open(index).unwrap()))
        .collect();
    assert_eq!(verifier.check_queries(&claims, &openings), Verdict::Accept);

    let mut corrupted = openings.clone();
    corrupted[1].1.initial.values[0] += F::ONE;
    assert_eq!(
        verifier.check_queries(&claims, &corrupted),
        Verdict::Reject(Rejection::MerkleVerificationFailure { round: 0, index: 3 })
    );

    // Index 5 sits on leaf 1 of round 1, index 3 on leaf 3.
    let mut stale = openings.clone();
    stale[1].1.rounds[0] = openings[2].1.rounds[0].clone();
    assert_eq!(
        verifier.check_queries(&claims, &stale),
        Verdict::Reject(Rejection::MerkleVerificationFailure { round: 1, index: 3 })
    );

    let mut wrong_final = claims.clone();
    wrong_final.final_value += EF::ONE;
    assert_eq!(
        verifier.check_queries(&wrong_final, &openings),
        Verdict::Reject(Rejection::FoldConsistencyFailure { round: 3, index: 0 })
    );
}

#[test]
fn test_switching_polynomials_after_commitment_is_rejected() {
    let config = config(3, rs(1, 3), 4, 0);
    let challenges = [3, 5, 2].map(EF::from_u64);

    let committed = CoefficientList::new((1..=8).map(F::from_u64).collect());
    // Shifting the constant coefficient shifts every codeword entry, in every round.
    let folded =
        CoefficientList::new((1..=8).map(|i| F::from_u64(i + u64::from(i == 1))).collect());

    let (committed_state, committed_claims) = fold_all(&config, committed, &challenges);
    let (folded_state, folded_claims) = fold_all(&config, folded, &challenges);

    let claims = FoldClaims {
        roots: [&committed_claims.roots[..1], &folded_claims.roots[1..]].concat(),
        ..folded_claims
    };
    let openings: Vec<_> = (0..8)
        .map(|index| {
            let mut query = folded_state.open(index).unwrap();
            query.initial = committed_state.open(index).unwrap().initial;
            (index, query)
        })
        .collect();

    for (index, query) in &openings {
        assert_eq!(
            Verifier::new(&config).check_query(&claims, *index, query),
            Err(Rejection::FoldConsistencyFailure {
                round: 1,
                index: *index
            })
        );
    }
}

#[test]
fn test_empirical_soundness() {
    // m = 4, R = 1: 16 fold pairs, 4 of them corrupted (δ = 1/4).
    let config = config(4, rs(1, 4), 1, 0);
    let mut rng = SmallRng::seed_from_u64(11);
    let polynomial = random_polynomial(4, &mut rng);
    let challenges: Vec<EF> = (0..4).map(|_| rng.random()).collect();

    let honest = CommitmentWriter::new(&config)
        .commit(polynomial.clone())
        .unwrap();
    let corrupted_pairs = [1, 6, 11, 12];
    let mut corrupted = honest.codeword;
    for &pair in &corrupted_pairs {
        corrupted[pair] += F::ONE;
    }
    let (corrupted_root, corrupted_tree) = config.committer.commit(&corrupted);

    // The prover commits to the corrupted codeword but folds the honest one.
    let (state, mut claims) = fold_all(&config, polynomial, &challenges);
    claims.roots[0] = corrupted_root;

    let verifier = Verifier::new(&config);
    let passes: Vec<bool> = (0..16)
        .map(|index| {
            let mut query = state.open(index).unwrap();
            query.initial = config
                .committer
                .open(&corrupted_tree, 16, index)
                .unwrap();
            assert_eq!(query.initial.values, [corrupted[index], corrupted[index + 16]]);
            let result = verifier.check_query(&claims, index, &query);
            if corrupted_pairs.contains(&index) {
                assert_eq!(
                    result,
                    Err(Rejection::FoldConsistencyFailure { round: 1, index })
                );
            }
            result.is_ok()
        })
        .collect();
    assert_eq!(passes.iter().filter(|&&pass| pass).count(), 12);

    let trials: u32 = 400;
    for num_queries in [1, 4, 8] {
        let accepted = (0..trials)
            .filter(|_| (0..num_queries).all(|_| passes[rng.random_range(0..16)]))
            .count();
        let rate = accepted as f64 / f64::from(trials);
        let expected = 0.75f64.powi(num_queries);
        assert!(
            (rate - expected).abs() < 0.1,
            "t = {num_queries}: accepted {rate}, expected {expected}"
        );
    }
}

#[test]
fn test_prover_round_order() {
    let config = config(3, rs(1, 3), 4, 0);
    let witness = CommitmentWriter::new(&config)
        .commit(random_polynomial(3, &mut SmallRng::seed_from_u64(12)))
        .unwrap();
    let mut state = Prover(&config).start(witness).unwrap();

    assert_eq!(state.phase(), ProverPhase::Committed);
    assert_eq!(
        state.fold(1, EF::ONE),
        Err(ProverError::ChallengeOutOfOrder {
            expected: 0,
            got: 1
        })
    );
    assert_eq!(state.open(0), Err(ProverError::NotFinalized));

    assert!(matches!(state.fold(0, EF::TWO), Ok(RoundOutput::Commitment(_))));
    assert_eq!(state.phase(), ProverPhase::Folding { round: 1 });
    assert_eq!(
        state.fold(0, EF::TWO),
        Err(ProverError::ChallengeOutOfOrder {
            expected: 1,
            got: 0
        })
    );
    assert!(matches!(state.fold(1, EF::TWO), Ok(RoundOutput::Commitment(_))));
    assert!(matches!(state.fold(2, EF::TWO), Ok(RoundOutput::Final(_))));
    assert_eq!(state.phase(), ProverPhase::Finalized);
    assert_eq!(state.fold(3, EF::ONE), Err(ProverError::AlreadyFinalized));

    assert!(state.open(7).is_ok());
    assert_eq!(
        state.open(8),
        Err(ProverError::Merkle(MerkleError::IndexOutOfRange { index: 8, len: 8 }))
    );
}

#[test]
fn test_config_errors() {
    assert!(matches!(
        Config::new(0, rs(1, 4), params(1, 10, 0)),
        Err(ConfigError::ZeroVariables)
    ));
    assert!(matches!(
        Config::new(3, rs(1, 4), params(0, 10, 0)),
        Err(ConfigError::ZeroRate)
    ));
    assert!(matches!(
        Config::new(3, rs(2, 4), params(1, 10, 0)),
        Err(ConfigError::RateMismatch { code: 2, params: 1 })
    ));
    assert!(matches!(
        Config::new(5, rs(1, 4), params(1, 10, 0)),
        Err(ConfigError::TooManyVariables {
            num_variables: 5,
            max: 4
        })
    ));
    assert!(matches!(
        Config::new(3, rs(1, 4), params(1, 0, 0)),
        Err(ConfigError::ZeroQueries)
    ));

    assert!(matches!(
        Config::new(3, rs(1, 4), params(1, MAX_QUERIES + 1, 0)),
        Err(ConfigError::TooManyQueries { .. })
    ));

    let config = config(3, rs(1, 4), 10, 0);
    let polynomial = random_polynomial(4, &mut SmallRng::seed_from_u64(13));
    assert!(matches!(
        CommitmentWriter::new(&config).commit(polynomial),
        Err(ProverError::NumVariablesMismatch {
            expected: 3,
            got: 4
        })
    ));
}

#[test]
fn test_shrinking_distance_caps_derived_queries() {
    // Random and Reed–Muller codes only guarantee distance 2^-d, so unique decoding asks for
    // about 2^d queries; the configuration refuses them instead of sampling that many indices.
    let random: Code<F> = RandomFoldableCode::<F>::new(1, 12, 0).into();
    let reed_muller: Code<F> = ReedMullerCode::<F>::new(1, 12).into();
    for code in [random, reed_muller] {
        let num_queries = unique_decoding_queries(100, code.relative_distance(12));
        assert!(num_queries > MAX_QUERIES);
        assert_eq!(
            Config::new(12, code, params(1, num_queries, 0)).err(),
            Some(ConfigError::TooManyQueries {
                num_queries,
                max: MAX_QUERIES
            })
        );
    }

    // Reed–Solomon keeps distance 1 - ρ at every size.
    let num_queries = SecurityAssumption::UniqueDecoding.queries(100, 1);
    assert!(num_queries <= MAX_QUERIES);
    assert!(Config::new(12, rs(1, 12), params(1, num_queries, 0)).is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_honest_proofs_verify(
        num_variables in 1usize..7,
        log_inv_rate in 1usize..4,
        family in 0u8..3,
        seed in any::<u64>(),
    ) {
        let code: Code<F> = match family {
            0 => rs(log_inv_rate, 6),
            1 => RandomFoldableCode::<F>::new(log_inv_rate, 6, seed).into(),
            _ => ReedMullerCode::<F>::new(log_inv_rate, 6).into(),
        };
        let config = config(num_variables, code, 12, 0);
        let mut rng = SmallRng::seed_from_u64(seed);
        let proof = prove(&config, random_polynomial(num_variables, &mut rng));
        prop_assert_eq!(verify(&config, &proof), Verdict::Accept);
    }
}
