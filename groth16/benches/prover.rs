use criterion::{criterion_group, criterion_main, Criterion};
use zksok_algebra::{
    bn254::{BN254PairingEngine, BN254Scalar},
    prelude::*,
};
use zksok_frontend::{circuits::RangeCircuit, compile, ConstraintForm};
use zksok_groth16::{prove, verify, Groth16Setup};

type P = BN254PairingEngine;

fn bench_range_proof(c: &mut Criterion) {
    let circuit = RangeCircuit { bits: 64 };
    let cs = compile::<BN254Scalar, _>(&circuit, ConstraintForm::R1cs).unwrap();
    let r1cs = cs.as_r1cs().unwrap();
    let mut prng = test_rng();
    let setup = Groth16Setup::<P>::unsafe_setup(r1cs, &mut prng).unwrap();
    let witness = cs.expand(&RangeCircuit::assignment(665115184)).unwrap();

    let mut group = c.benchmark_group("groth16");
    group.bench_function("range64 prove", |b| {
        b.iter(|| prove(&mut prng, &setup.pk, r1cs, &witness.full.0).unwrap())
    });
    let proof = prove(&mut prng, &setup.pk, r1cs, &witness.full.0).unwrap();
    group.bench_function("range64 verify", |b| {
        b.iter(|| verify(&setup.vk, &witness.public.0, &proof).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_range_proof);
criterion_main!(benches);
