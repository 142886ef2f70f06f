//! Relaxation of a distorted neutrino spectrum through elastic scattering
//! off a thermal electron bath, plus the decay rate of a heavy scalar.

use std::error::Error;
use std::sync::Arc;

use boltzmann_collision::sweep::activate;
use boltzmann_collision::{
    CollisionIntegral, CollisionSweep, CosmologyContext, FourParticleM, Functional,
    IntegralConfig, IntegralHistory, MatrixElement, MomentumGrid, Particle, Reaction,
    ReactionParticle, Species, Statistics, ThreeParticleM,
};
use env_logger::{Builder, Env};
use log::info;
use ndarray::Array1;

fn main() -> Result<(), Box<dyn Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let grid = MomentumGrid::new(0.0, 12.0, 25)?;
    let temperature = 1.0;

    // Neutrinos with a 20% deficit at high momenta.
    let distorted = grid.template().mapv(|p| {
        let suppression = if p > 4.0 { 0.8 } else { 1.0 };
        suppression * Statistics::FermiDirac.equilibrium(p, temperature)
    });
    let neutrino = Arc::new(Particle::new(
        "ν",
        0.0,
        Statistics::FermiDirac,
        grid.clone(),
        distorted,
    )?);
    let neutrino_species: Arc<dyn Species> = neutrino.clone();
    let electron: Arc<dyn Species> = Arc::new(
        Particle::in_equilibrium_at("e", 0.5, Statistics::FermiDirac, grid.clone(), temperature, 1.0)?
            .with_equilibrium(true),
    );

    let scattering = Reaction::new(vec![
        ReactionParticle::incoming(neutrino_species.clone()),
        ReactionParticle::incoming(electron.clone()),
        ReactionParticle::outgoing(neutrino_species.clone()),
        ReactionParticle::outgoing(electron.clone()),
    ])?;
    let terms: Vec<MatrixElement> = vec![
        FourParticleM::new(1.0, 0.0, [0, 1, 2, 3])?.into(),
        FourParticleM::new(0.25, 0.0, [0, 3, 1, 2])?.into(),
        FourParticleM::new(0.0, -0.5, [1, 3, 0, 2])?.into(),
    ];
    let mut integrals = vec![CollisionIntegral::new(
        scattering,
        terms,
        IntegralConfig::default(),
    )?];

    let sweep = CollisionSweep::new()?;
    let mut history = IntegralHistory::new();
    let context = CosmologyContext::new(temperature, 1.0, 1.0, 0.5)?;
    info!("{} on {} threads", integrals[0], sweep.num_threads());

    for step in 0..4 {
        let active = activate(&mut integrals, &context);
        let result = sweep.compute(&neutrino_species, &integrals, &history, &context)?;
        let deficit = deficit(&grid, &result.distribution, temperature);
        info!("step {step}: {active} active integral(s), high-momentum deficit {deficit:.4}");

        neutrino.update(result.distribution)?;
        history.push(result.integral)?;
    }

    let rates = integrals[0].rate()?;
    info!(
        "forward {:.4e}, backward {:.4e}, net {:.4e}",
        rates.forward, rates.backward, rates.net
    );

    let scalar: Arc<dyn Species> = Arc::new(Particle::in_equilibrium_at(
        "φ",
        3.0,
        Statistics::BoseEinstein,
        grid.clone(),
        temperature,
        1.0,
    )?);
    let photon = || -> Result<Arc<dyn Species>, Box<dyn Error>> {
        Ok(Arc::new(Particle::in_equilibrium_at(
            "γ",
            0.0,
            Statistics::BoseEinstein,
            grid.clone(),
            temperature,
            1.0,
        )?))
    };
    let decay = Reaction::new(vec![
        ReactionParticle::incoming(scalar),
        ReactionParticle::outgoing(photon()?),
        ReactionParticle::outgoing(photon()?),
    ])?;
    let mut decay = CollisionIntegral::new(
        decay,
        vec![ThreeParticleM::new(0.1)?.into()],
        IntegralConfig::default(),
    )?;
    decay.initialize(&context);
    for p0 in [0.0, 1.0, 5.0] {
        info!(
            "{decay}: I({p0}) forward {:.4e}, backward {:.4e}",
            decay.integral(p0, Functional::FORWARD)?,
            decay.integral(p0, Functional::BACKWARD)?
        );
    }
    Ok(())
}

/// Mean ratio of the distribution to equilibrium above `p = 4`, minus one.
fn deficit(grid: &MomentumGrid, distribution: &Array1<f64>, temperature: f64) -> f64 {
    let ratios: Vec<f64> = grid
        .template()
        .iter()
        .zip(distribution.iter())
        .filter(|&(&p, _)| p > 4.0)
        .map(|(&p, &f)| f / Statistics::FermiDirac.equilibrium(p, temperature) - 1.0)
        .collect();
    ratios.iter().sum::<f64>() / ratios.len().max(1) as f64
}
