use basefold_p3::{
    basefold::{committer::CommitmentWriter, parameters::BasefoldConfig, prover::Prover},
    code::{FoldableCode, RandomFoldableCode, ReedMullerCode, ReedSolomonCode},
    parameters::{ProtocolParameters, SecurityAssumption},
    poly::coeffs::CoefficientList,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use p3_challenger::DuplexChallenger;
use p3_field::extension::BinomialExtensionField;
use p3_koala_bear::{KoalaBear, Poseidon2KoalaBear};
use p3_symmetric::{PaddingFreeSponge, TruncatedPermutation};
use rand::{
    Rng, SeedableRng,
    rngs::{SmallRng, StdRng},
};

type F = KoalaBear;
type EF = BinomialExtensionField<F, 4>;

type Poseidon16 = Poseidon2KoalaBear<16>;

type MerkleHash = PaddingFreeSponge<Poseidon16, 16, 8, 8>; // leaf hashing
type MerkleCompress = TruncatedPermutation<Poseidon16, 2, 8, 16>; // 2-to-1 compression
type MyChallenger = DuplexChallenger<F, Poseidon16, 16, 8>;

const LOG_INV_RATE: usize = 1;

fn random_message(num_variables: usize) -> Vec<F> {
    // Use a fixed-seed RNG to ensure deterministic benchmark inputs.
    let mut rng = StdRng::seed_from_u64(0);
    (0..1 << num_variables).map(|_| rng.random()).collect()
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for num_variables in [16, 20] {
        let message = random_message(num_variables);

        let rs = ReedSolomonCode::<F>::new(LOG_INV_RATE, num_variables).unwrap();
        group.bench_with_input(
            BenchmarkId::new("reed_solomon", num_variables),
            &message,
            |b, message| b.iter(|| rs.encode::<F>(message).unwrap()),
        );

        let random = RandomFoldableCode::<F>::new(LOG_INV_RATE, num_variables, 0);
        group.bench_with_input(
            BenchmarkId::new("random", num_variables),
            &message,
            |b, message| b.iter(|| random.encode::<F>(message).unwrap()),
        );

        let reed_muller = ReedMullerCode::<F>::new(LOG_INV_RATE, num_variables);
        group.bench_with_input(
            BenchmarkId::new("reed_muller", num_variables),
            &message,
            |b, message| b.iter(|| reed_muller.encode::<F>(message).unwrap()),
        );
    }
    group.finish();
}

fn benchmark_commit_and_prove(c: &mut Criterion) {
    let num_variables = 20;

    let mut rng = SmallRng::seed_from_u64(1);
    let poseidon16 = Poseidon16::new_from_rng_128(&mut rng);

    // Target 100 bits of security in the unique decoding regime.
    let num_queries = SecurityAssumption::UniqueDecoding.queries(100, LOG_INV_RATE);
    let params = ProtocolParameters {
        log_inv_rate: LOG_INV_RATE,
        num_queries,
        query_pow_bits: 0,
        merkle_hash: MerkleHash::new(poseidon16.clone()),
        merkle_compress: MerkleCompress::new(poseidon16.clone()),
    };
    let code = ReedSolomonCode::<F>::new(LOG_INV_RATE, num_variables).unwrap();
    let config = BasefoldConfig::<F, EF, _, _, 8>::new(num_variables, code, params).unwrap();

    let polynomial = CoefficientList::new(random_message(num_variables));
    let challenger = MyChallenger::new(poseidon16);

    c.bench_function("commit", |b| {
        b.iter(|| {
            CommitmentWriter::new(&config)
                .commit(polynomial.clone())
                .unwrap()
        });
    });

    c.bench_function("prove", |b| {
        b.iter(|| {
            let witness = CommitmentWriter::new(&config)
                .commit(polynomial.clone())
                .unwrap();
            let mut transcript = config.transcript(challenger.clone());
            Prover(&config).prove(&mut transcript, witness).unwrap()
        });
    });
}

criterion_group!(benches, benchmark_encode, benchmark_commit_and_prove);
criterion_main!(benches);
