use criterion::{criterion_group, criterion_main, Criterion};
use merlin::Transcript;
use sha2::{Digest, Sha256};
use zksok_algebra::{bn254::BN254Scalar, prelude::*};
use zksok_frontend::{circuits::Sha256Circuit, compile, ConstraintForm};
use zksok_plonk::plonk::constraint_system::{ConstraintSystem, PlonkCircuit};
use zksok_plonk::plonk::indexer::indexer_with_lagrange;
use zksok_plonk::plonk::prover::prover_with_lagrange;
use zksok_plonk::plonk::verifier::verifier;
use zksok_plonk::poly_commit::{kzg_poly_com::KZGCommitmentSchemeBN254, pcs::PolyComScheme};

fn bench_plonk(c: &mut Criterion) {
    let mut prng = test_rng();

    let preimage = b"hudaqi";
    let digest = Sha256::digest(preimage);
    let circuit = Sha256Circuit {
        input_len: preimage.len(),
    };
    let compiled = compile::<BN254Scalar, _>(&circuit, ConstraintForm::Sparse).unwrap();
    let cs = PlonkCircuit::new(compiled.as_sparse().unwrap()).unwrap();

    let tau = BN254Scalar::random(&mut prng);
    let pcs = KZGCommitmentSchemeBN254::from_tau(cs.size() + 2, &tau);
    let lagrange_pcs = KZGCommitmentSchemeBN254::lagrange_from_tau(cs.size(), &tau).unwrap();
    let prover_params = indexer_with_lagrange(&cs, &pcs, Some(&lagrange_pcs)).unwrap();

    let witness = compiled
        .expand(&Sha256Circuit::assignment(preimage, &digest))
        .unwrap();

    let mut prover_group = c.benchmark_group("bench_prover");
    prover_group.sample_size(10);
    prover_group.bench_function("sha256 prover", |b| {
        b.iter(|| {
            prover_with_lagrange(
                &mut prng,
                &mut Transcript::new(b"BenchPlonk"),
                &pcs,
                Some(&lagrange_pcs),
                &cs,
                &prover_params,
                &witness.full.0,
            )
            .unwrap()
        })
    });
    prover_group.finish();

    let proof = prover_with_lagrange(
        &mut prng,
        &mut Transcript::new(b"BenchPlonk"),
        &pcs,
        Some(&lagrange_pcs),
        &cs,
        &prover_params,
        &witness.full.0,
    )
    .unwrap();
    let verifier_params = pcs.shrink_to_verifier_only();

    let mut verifier_group = c.benchmark_group("bench_verifier");
    verifier_group.bench_function("sha256 verifier", |b| {
        b.iter(|| {
            verifier::<_, PlonkCircuit<BN254Scalar>>(
                &mut Transcript::new(b"BenchPlonk"),
                &verifier_params,
                &prover_params.verifier_params,
                &witness.public.0,
                &proof,
            )
            .unwrap()
        })
    });
    verifier_group.finish();
}

criterion_group!(benches, bench_plonk);
criterion_main!(benches);
