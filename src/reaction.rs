pub mod functional;

pub use functional::{DistributionFunctional, Functional};

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::species::Species;

#[derive(Error, Debug, PartialEq)]
pub enum ReactionError {
    #[error("A reaction needs at least 3 particles, got {0}")]
    TooFewParticles(usize),

    #[error("A reaction needs particles on both sides, all {0} particles are {1}")]
    OneSided(usize, Side),

    #[error("The primary particle must be incoming")]
    PrimaryNotIncoming,

    #[error("F_1 and F_f are exclusive decompositions and can't be requested together")]
    ConflictingFunctional,
}

/// Which side of the reaction a particle is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Incoming,
    Outgoing,
}

impl Side {
    /// Sign in the energy balance $\sum_i s_i E_i = 0$.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Side::Incoming => -1.0,
            Side::Outgoing => 1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Incoming => write!(f, "incoming"),
            Side::Outgoing => write!(f, "outgoing"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReactionParticle {
    pub species: Arc<dyn Species>,
    pub side: Side,
    pub antiparticle: bool,
}

impl ReactionParticle {
    pub fn incoming(species: Arc<dyn Species>) -> Self {
        Self {
            species,
            side: Side::Incoming,
            antiparticle: false,
        }
    }

    pub fn outgoing(species: Arc<dyn Species>) -> Self {
        Self {
            species,
            side: Side::Outgoing,
            antiparticle: false,
        }
    }

    pub fn antiparticle(mut self) -> Self {
        self.antiparticle = true;
        self
    }

    #[inline]
    pub fn sign(&self) -> f64 {
        self.side.sign()
    }
}

impl fmt::Display for ReactionParticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.species.symbol())?;
        if self.antiparticle {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// Ordered participants of a reaction.
///
/// Index 0 is the primary particle whose distribution the collision integral
/// updates. The last particle is the dependent one: its energy and momentum
/// always follow from energy conservation and are never supplied.
#[derive(Clone, Debug)]
pub struct Reaction {
    particles: Vec<ReactionParticle>,
}

impl Reaction {
    pub fn new(particles: Vec<ReactionParticle>) -> Result<Self, ReactionError> {
        if particles.len() < 3 {
            return Err(ReactionError::TooFewParticles(particles.len()));
        }
        let first_side = particles[0].side;
        if particles.iter().all(|particle| particle.side == first_side) {
            return Err(ReactionError::OneSided(particles.len(), first_side));
        }
        if first_side != Side::Incoming {
            return Err(ReactionError::PrimaryNotIncoming);
        }
        Ok(Self { particles })
    }

    pub fn particles(&self) -> &[ReactionParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn primary(&self) -> &ReactionParticle {
        &self.particles[0]
    }

    pub fn signs(&self) -> Vec<f64> {
        self.particles.iter().map(ReactionParticle::sign).collect()
    }
}

impl DistributionFunctional for Reaction {
    fn participants(&self) -> &[ReactionParticle] {
        &self.particles
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |side: Side| {
            self.particles
                .iter()
                .filter(|particle| particle.side == side)
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" + ")
        };
        write!(f, "{} ⟶ {}", side(Side::Incoming), side(Side::Outgoing))
    }
}
