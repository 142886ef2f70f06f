//! Boltzmann collision integrals for particle species out of equilibrium in an
//! expanding universe.
//!
//! A [`CollisionIntegral`] couples a [`Reaction`] (three or four participants)
//! with the terms of its squared matrix element. For every momentum of the
//! primary species' grid it reconstructs on-shell kinematics, locates the
//! kinematically allowed region, integrates the matrix element weighted by the
//! distribution functional and folds the result into an implicit
//! Adams–Moulton step. [`CollisionSweep`] evaluates all grid points of a
//! species in parallel.

pub mod adams_moulton;
pub mod context;
pub mod integral;
pub mod kinematics;
pub mod matrix_element;
pub mod reaction;
pub mod region;
pub mod species;
pub mod sweep;
pub mod utils;

pub use context::{ContextError, CosmologyContext};
pub use integral::{
    Activation, CollisionIntegral, CollisionIntegralError, IntegralConfig, RateSummary,
    ReactionFamily, StepContribution,
};
pub use kinematics::Kinematics;
pub use matrix_element::{FourParticleM, MatrixElement, ThreeParticleM};
pub use reaction::{DistributionFunctional, Functional, Reaction, ReactionParticle, Side};
pub use species::{MomentumGrid, Particle, Species, Statistics};
pub use sweep::{CollisionSweep, IntegralHistory, SweepResult};
