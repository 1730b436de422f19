use std::time::Instant;

use basefold_p3::{
    basefold::{
        committer::CommitmentWriter,
        parameters::BasefoldConfig,
        prover::Prover,
        verifier::{Verifier, errors::Verdict},
    },
    code::{Code, FoldableCode, RandomFoldableCode, ReedMullerCode, ReedSolomonCode},
    errors::BasefoldError,
    parameters::{ProtocolParameters, SecurityAssumption, unique_decoding_queries},
    poly::coeffs::CoefficientList,
};
use clap::{Parser, ValueEnum};
use p3_baby_bear::{BabyBear, Poseidon2BabyBear};
use p3_challenger::DuplexChallenger;
use p3_field::{ExtensionField, PrimeField64, TwoAdicField, extension::BinomialExtensionField};
use p3_koala_bear::{KoalaBear, Poseidon2KoalaBear};
use p3_symmetric::{CryptographicPermutation, PaddingFreeSponge, TruncatedPermutation};
use rand::{
    Rng, SeedableRng,
    distr::{Distribution, StandardUniform},
    rngs::SmallRng,
};
use tracing_forest::{ForestLayer, util::LevelFilter};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FieldChoice {
    BabyBear,
    KoalaBear,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodeFamily {
    ReedSolomon,
    Random,
    ReedMuller,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short = 'd', long, default_value = "20")]
    num_variables: usize,

    #[arg(short = 'r', long, default_value = "1")]
    rate: usize,

    /// Number of queries. Derived from the security level when absent.
    ///
    /// Random and Reed–Muller codes only guarantee relative distance `2^-d`, so the derived count
    /// exceeds the configured maximum beyond a dozen variables and must be given explicitly.
    #[arg(short = 'q', long)]
    num_queries: Option<usize>,

    #[arg(short = 'l', long, default_value = "100")]
    security_level: usize,

    #[arg(long = "sec", default_value = "UniqueDecoding")]
    soundness_type: SecurityAssumption,

    #[arg(short = 'p', long, default_value = "0")]
    pow_bits: usize,

    #[arg(long, value_enum, default_value = "baby-bear")]
    field: FieldChoice,

    #[arg(long, value_enum, default_value = "reed-solomon")]
    code: CodeFamily,

    /// Seed of the random code and of the committed polynomial.
    #[arg(long, default_value = "0")]
    seed: u64,
}

fn main() -> Result<(), BasefoldError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();

    let args = Args::parse();
    let mut rng = SmallRng::seed_from_u64(1);

    let verdict = match args.field {
        FieldChoice::BabyBear => run::<BabyBear, BinomialExtensionField<BabyBear, 4>, _>(
            &args,
            Poseidon2BabyBear::<16>::new_from_rng_128(&mut rng),
        ),
        FieldChoice::KoalaBear => run::<KoalaBear, BinomialExtensionField<KoalaBear, 4>, _>(
            &args,
            Poseidon2KoalaBear::<16>::new_from_rng_128(&mut rng),
        ),
    }?;

    println!("Verdict: {verdict:?}");
    Ok(())
}

fn run<F, EF, Perm>(args: &Args, perm: Perm) -> Result<Verdict, BasefoldError>
where
    F: TwoAdicField + PrimeField64,
    EF: ExtensionField<F>,
    Perm: CryptographicPermutation<[F; 16]> + Sync,
    StandardUniform: Distribution<F>,
{
    let code: Code<F> = match args.code {
        CodeFamily::ReedSolomon => {
            ReedSolomonCode::<F>::new(args.rate, args.num_variables)?.into()
        }
        CodeFamily::Random => {
            RandomFoldableCode::<F>::new(args.rate, args.num_variables, args.seed).into()
        }
        CodeFamily::ReedMuller => ReedMullerCode::<F>::new(args.rate, args.num_variables).into(),
    };

    let num_queries = args.num_queries.unwrap_or_else(|| {
        let bits = args.security_level.saturating_sub(args.pow_bits);
        match args.code {
            CodeFamily::ReedSolomon => args.soundness_type.queries(bits, args.rate),
            CodeFamily::Random | CodeFamily::ReedMuller => {
                unique_decoding_queries(bits, code.relative_distance(args.num_variables))
            }
        }
    });

    let params = ProtocolParameters {
        log_inv_rate: args.rate,
        num_queries,
        query_pow_bits: args.pow_bits,
        merkle_hash: PaddingFreeSponge::<_, 16, 8, 8>::new(perm.clone()),
        merkle_compress: TruncatedPermutation::<_, 2, 8, 16>::new(perm.clone()),
    };
    println!("=========================================");
    print!("{params}");

    let config = BasefoldConfig::<F, EF, _, _, 8>::new(args.num_variables, code, params)?;
    print!("{config}");

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let polynomial =
        CoefficientList::<F>::new((0..1 << args.num_variables).map(|_| rng.random()).collect());

    let time = Instant::now();
    let witness = CommitmentWriter::new(&config).commit(polynomial)?;
    let mut prover_transcript =
        config.transcript(DuplexChallenger::<F, _, 16, 8>::new(perm.clone()));
    let proof = Prover(&config).prove(&mut prover_transcript, witness)?;
    println!("Prover time: {:.1?}", time.elapsed());

    let time = Instant::now();
    let mut verifier_transcript = config.transcript(DuplexChallenger::<F, _, 16, 8>::new(perm));
    let verdict = Verifier::new(&config).verify(&mut verifier_transcript, &proof)?;
    println!("Verifier time: {:.1?}", time.elapsed());

    println!(
        "Proof size: {} field elements, {} queries",
        proof.num_elements(),
        proof.queries.len()
    );
    Ok(verdict)
}
