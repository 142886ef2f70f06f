#![allow(dead_code)]

use std::sync::Arc;

use boltzmann_collision::species::{MomentumGrid, Particle, Species, Statistics};
use boltzmann_collision::utils::quadrature::{QuadratureConfig, QuadratureRule};
use boltzmann_collision::{
    CollisionIntegral, CosmologyContext, FourParticleM, IntegralConfig, MatrixElement, Reaction,
    ReactionParticle, ThreeParticleM,
};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;

pub fn grid(max: f64, samples: usize) -> MomentumGrid {
    MomentumGrid::new(0.0, max, samples).unwrap()
}

pub fn thermal(
    symbol: &str,
    mass: f64,
    statistics: Statistics,
    grid: &MomentumGrid,
    temperature: f64,
) -> Arc<dyn Species> {
    Arc::new(
        Particle::in_equilibrium_at(symbol, mass, statistics, grid.clone(), temperature, 1.0)
            .unwrap(),
    )
}

pub fn flat(symbol: &str, mass: f64, statistics: Statistics, grid: &MomentumGrid, value: f64) -> Arc<dyn Species> {
    let distribution = Array1::from_elem(grid.samples(), value);
    Arc::new(Particle::new(symbol, mass, statistics, grid.clone(), distribution).unwrap())
}

/// Random occupation numbers in `[0, 1)` on every grid point.
pub fn random(
    symbol: &str,
    mass: f64,
    statistics: Statistics,
    grid: &MomentumGrid,
    rng: &mut StdRng,
) -> Arc<dyn Species> {
    let distribution = Array1::from_shape_fn(grid.samples(), |_| rng.random_range(0.0..1.0));
    Arc::new(Particle::new(symbol, mass, statistics, grid.clone(), distribution).unwrap())
}

pub fn scattering(species: [Arc<dyn Species>; 4]) -> Reaction {
    let [a, b, c, d] = species;
    Reaction::new(vec![
        ReactionParticle::incoming(a),
        ReactionParticle::incoming(b),
        ReactionParticle::outgoing(c),
        ReactionParticle::outgoing(d),
    ])
    .unwrap()
}

pub fn decay(species: [Arc<dyn Species>; 3]) -> Reaction {
    let [a, b, c] = species;
    Reaction::new(vec![
        ReactionParticle::incoming(a),
        ReactionParticle::outgoing(b),
        ReactionParticle::outgoing(c),
    ])
    .unwrap()
}

pub fn precise() -> QuadratureConfig {
    QuadratureConfig::new(QuadratureRule::G15K31, 1e-10, 40).unwrap()
}

pub fn elastic_integral(reaction: Reaction) -> CollisionIntegral {
    let term: MatrixElement = FourParticleM::new(1.0, 0.0, [0, 1, 2, 3]).unwrap().into();
    CollisionIntegral::new(
        reaction,
        vec![term],
        IntegralConfig {
            quadrature: precise(),
            ..IntegralConfig::default()
        },
    )
    .unwrap()
}

pub fn decay_integral(reaction: Reaction, k: f64) -> CollisionIntegral {
    let term: MatrixElement = ThreeParticleM::new(k).unwrap().into();
    CollisionIntegral::new(
        reaction,
        vec![term],
        IntegralConfig {
            quadrature: precise(),
            ..IntegralConfig::default()
        },
    )
    .unwrap()
}

pub fn unit_context() -> CosmologyContext {
    CosmologyContext::new(1.0, 1.0, 1.0, 0.01).unwrap()
}
