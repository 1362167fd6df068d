use criterion::{criterion_group, criterion_main, Criterion};
use sha2::{Digest, Sha256};
use zksok::{
    circuits::{RangeCircuit, Sha256Circuit},
    Backend, Pipeline, PipelineConfig,
};
use zksok_algebra::prelude::*;

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range32");
    group.sample_size(10);
    for backend in [Backend::Groth16, Backend::Plonk] {
        let pipeline = Pipeline::new(PipelineConfig::for_backend(backend)).unwrap();
        let cs = pipeline.compile(&RangeCircuit { bits: 32 }).unwrap();
        let mut prng = test_rng();
        let setup = pipeline.unsafe_setup(&cs, &mut prng).unwrap();
        let witness = pipeline
            .expand(&cs, &RangeCircuit::assignment(665115184))
            .unwrap();

        group.bench_function(format!("{:?} prove", backend), |b| {
            b.iter(|| {
                pipeline
                    .prove(&cs, &setup.pk, &witness.full, &mut prng)
                    .unwrap()
            })
        });
        let proof = pipeline
            .prove(&cs, &setup.pk, &witness.full, &mut prng)
            .unwrap();
        group.bench_function(format!("{:?} verify", backend), |b| {
            b.iter(|| pipeline.verify(&setup.vk, &witness.public, &proof).unwrap())
        });
    }
    group.finish();
}

fn bench_sha256(c: &mut Criterion) {
    let preimage = b"hudaqi";
    let digest = Sha256::digest(preimage);
    let circuit = Sha256Circuit {
        input_len: preimage.len(),
    };

    let mut group = c.benchmark_group("sha256");
    group.sample_size(10);
    let pipeline = Pipeline::new(PipelineConfig::for_backend(Backend::Plonk)).unwrap();
    let cs = pipeline.compile(&circuit).unwrap();
    let mut prng = test_rng();
    let setup = pipeline.unsafe_setup(&cs, &mut prng).unwrap();
    let asg = Sha256Circuit::assignment(preimage, &digest);

    group.bench_function("expand", |b| {
        b.iter(|| pipeline.expand(&cs, &asg).unwrap())
    });
    let witness = pipeline.expand(&cs, &asg).unwrap();
    group.bench_function("Plonk prove", |b| {
        b.iter(|| {
            pipeline
                .prove(&cs, &setup.pk, &witness.full, &mut prng)
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_range, bench_sha256);
criterion_main!(benches);
