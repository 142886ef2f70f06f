use std::sync::Arc;

use boltzmann_collision::matrix_element::d_functions::{d1, d3};
use boltzmann_collision::{
    CollisionIntegral, CollisionSweep, CosmologyContext, FourParticleM, Functional,
    IntegralConfig, IntegralHistory, MatrixElement, MomentumGrid, Particle, Reaction,
    ReactionParticle, Species, Statistics, ThreeParticleM,
};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};

fn thermal(symbol: &str, mass: f64, grid: &MomentumGrid) -> Arc<dyn Species> {
    Arc::new(
        Particle::in_equilibrium_at(symbol, mass, Statistics::FermiDirac, grid.clone(), 1.0, 1.0)
            .expect("Failed to tabulate species"),
    )
}

fn setup_scattering(samples: usize) -> CollisionIntegral {
    let grid = MomentumGrid::new(0.0, 10.0, samples).expect("Failed to create grid");
    let reaction = Reaction::new(vec![
        ReactionParticle::incoming(thermal("ν", 0.0, &grid)),
        ReactionParticle::incoming(thermal("e", 0.5, &grid)),
        ReactionParticle::outgoing(thermal("ν", 0.0, &grid)),
        ReactionParticle::outgoing(thermal("e", 0.5, &grid)),
    ])
    .expect("Failed to create reaction");
    let terms: Vec<MatrixElement> = vec![
        FourParticleM::new(1.0, 0.0, [0, 1, 2, 3]).unwrap().into(),
        FourParticleM::new(0.5, -0.2, [0, 3, 1, 2]).unwrap().into(),
    ];
    let mut integral = CollisionIntegral::new(reaction, terms, IntegralConfig::default())
        .expect("Failed to create collision integral");
    integral.initialize(&CosmologyContext::default());
    integral
}

fn setup_decay() -> (Arc<dyn Species>, Vec<CollisionIntegral>) {
    let grid = MomentumGrid::new(0.0, 200.0, 201).expect("Failed to create grid");
    let muon = thermal("μ", 105.7, &grid);
    let reaction = Reaction::new(vec![
        ReactionParticle::incoming(muon.clone()),
        ReactionParticle::outgoing(thermal("e", 0.0, &grid)),
        ReactionParticle::outgoing(thermal("ν", 0.0, &grid)),
    ])
    .expect("Failed to create reaction");
    let term: MatrixElement = ThreeParticleM::new(1.0).unwrap().into();
    let mut integral = CollisionIntegral::new(reaction, vec![term], IntegralConfig::default())
        .expect("Failed to create collision integral");
    integral.initialize(&CosmologyContext::default());
    (muon, vec![integral])
}

fn bench_d_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("d_functions");
    let p = [2.0, 1.5, 1.8, 1.7];
    group.bench_function("d1", |b| b.iter(|| d1(std::hint::black_box(p))));
    group.bench_function("d3", |b| b.iter(|| d3(std::hint::black_box(p))));
    group.finish();
}

fn bench_four_particle(c: &mut Criterion) {
    let mut group = c.benchmark_group("four_particle");
    group.sample_size(10);

    let integral = setup_scattering(21);
    group.bench_function("integrand", |b| {
        b.iter(|| integral.integrand(std::hint::black_box(&[2.0, 1.5, 1.8]), Functional::NAIVE))
    });
    for p0 in [0.0, 2.0, 6.0] {
        group.bench_with_input(BenchmarkId::new("integral", p0), &p0, |b, &p0| {
            b.iter(|| integral.integral(p0, Functional::CONSTANT).unwrap())
        });
    }
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.sample_size(10);

    let context = CosmologyContext::default();
    let history = IntegralHistory::new();
    for num_threads in [1, 4] {
        group.bench_with_input(
            BenchmarkId::new("muon_decay", num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter_batched(
                    || {
                        let mut sweep = CollisionSweep::new().expect("Failed to build sweep");
                        sweep
                            .set_num_threads(num_threads)
                            .expect("Failed to set threads");
                        (sweep, setup_decay())
                    },
                    |(sweep, (muon, integrals))| {
                        sweep
                            .compute(&muon, &integrals, &history, &context)
                            .expect("Sweep failed")
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_d_functions, bench_four_particle, bench_sweep);
criterion_main!(benches);
