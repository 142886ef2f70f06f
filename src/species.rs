pub mod grid;
pub mod particle;

pub use grid::{GridError, MomentumGrid};
pub use particle::{Particle, ParticleError};

use std::fmt::Debug;

/// Quantum statistics of a species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Statistics {
    FermiDirac,
    BoseEinstein,
}

impl Statistics {
    /// Sign entering the blocking/enhancement factor `1 - eta * f`.
    #[inline]
    pub fn eta(self) -> f64 {
        match self {
            Statistics::FermiDirac => 1.0,
            Statistics::BoseEinstein => -1.0,
        }
    }

    /// Equilibrium occupation number $1 / (e^{E/T} + \eta)$ at zero chemical
    /// potential, in conformal units.
    #[inline]
    pub fn equilibrium(self, energy: f64, temperature: f64) -> f64 {
        1.0 / ((energy / temperature).exp() + self.eta())
    }
}

/// The view of a particle species the collision engine consumes.
///
/// Implementations must be safe to read from many threads while a sweep is in
/// progress; updates to the distribution happen only between sweeps.
pub trait Species: Send + Sync + Debug {
    fn symbol(&self) -> &str;

    /// Mass rescaled by the current scale factor.
    fn conformal_mass(&self) -> f64;

    /// Conformal energy $\sqrt{p^2 + m^2}$ for conformal momentum `p`.
    fn conformal_energy(&self, p: f64) -> f64 {
        let m = self.conformal_mass();
        (p * p + m * m).sqrt()
    }

    fn statistics(&self) -> Statistics;

    fn eta(&self) -> f64 {
        self.statistics().eta()
    }

    /// Whether the species is held in equilibrium and needs no collision
    /// integral.
    fn in_equilibrium(&self) -> bool;

    /// Temperature below which this species' integrals are left inert.
    fn decoupling_temperature(&self) -> f64;

    fn grid(&self) -> &MomentumGrid;

    /// Occupation number at conformal momentum `p`.
    fn distribution(&self, p: f64) -> f64;
}
