use criterion::{criterion_group, criterion_main, Criterion};
use zksok_algebra::{
    bn254::{BN254Scalar, BN254G1},
    prelude::*,
};

fn bench_msm(c: &mut Criterion) {
    let mut prng = test_rng();
    let count = 1 << 12;

    let points: Vec<BN254G1> = (0..count).map(|_| BN254G1::random(&mut prng)).collect();
    let scalars: Vec<BN254Scalar> = (0..count).map(|_| BN254Scalar::random(&mut prng)).collect();

    let points_ptr = points.iter().collect::<Vec<&BN254G1>>();
    let scalars_ptr = scalars.iter().collect::<Vec<&BN254Scalar>>();

    let mut group = c.benchmark_group("bn254");
    group.sample_size(10);
    group.bench_function("g1 multi_exp 4096", |b| {
        b.iter(|| BN254G1::multi_exp(&scalars_ptr, &points_ptr))
    });
    group.finish();
}

criterion_group!(benches, bench_msm);
criterion_main!(benches);
