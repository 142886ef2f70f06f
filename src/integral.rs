mod four_particle;
mod three_particle;

use std::f64::consts::PI;
use std::fmt;
use std::time::Instant;

use log::{debug, trace};
use ndarray::{Array1, ArrayView2, Zip};
use thiserror::Error;

use crate::adams_moulton::{self, MAX_ORDER, StepError};
use crate::context::{ContextError, CosmologyContext};
use crate::matrix_element::{MatrixElement, MatrixElementError};
use crate::reaction::{Functional, Reaction, ReactionError};
use crate::species::{GridError, MomentumGrid, ParticleError, Species};
use crate::utils::integrate::{Integrate, IntegrationError};
use crate::utils::quadrature::{QuadratureConfig, QuadratureError};

#[derive(Error, Debug)]
pub enum CollisionIntegralError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    #[error("Collision integral `{0}` used before initialize()")]
    NotInitialized(String),

    #[error("History step has {got} points, expected {expected}")]
    HistoryLength { expected: usize, got: usize },

    #[error("Reaction error: {0}")]
    Reaction(#[from] ReactionError),

    #[error("Matrix element error: {0}")]
    MatrixElement(#[from] MatrixElementError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Particle error: {0}")]
    Particle(#[from] ParticleError),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Quadrature error: {0}")]
    Quadrature(#[from] QuadratureError),

    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),

    #[error("Step error: {0}")]
    Step(#[from] StepError),

    #[error("Failed to build thread pool: {0}")]
    ThreadPoolBuildError(#[from] rayon::ThreadPoolBuildError),
}

/// Kinematic family of a reaction, selected by its particle count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionFamily {
    /// $1 \leftrightarrow 2$ processes, integrated over one momentum.
    ThreeParticle,
    /// $2 \leftrightarrow 2$ processes, integrated over two momenta.
    FourParticle,
}

impl ReactionFamily {
    pub fn for_arity(arity: usize) -> Result<Self, CollisionIntegralError> {
        match arity {
            3 => Ok(ReactionFamily::ThreeParticle),
            4 => Ok(ReactionFamily::FourParticle),
            n => Err(CollisionIntegralError::Unimplemented(format!(
                "no kinematic family for {n}-particle reactions"
            ))),
        }
    }

    pub fn arity(self) -> usize {
        match self {
            ReactionFamily::ThreeParticle => 3,
            ReactionFamily::FourParticle => 4,
        }
    }
}

/// Construction-time settings of a collision integral.
#[derive(Clone, Debug, Default)]
pub struct IntegralConfig {
    /// Defaults to the primary species' decoupling temperature.
    pub decoupling_temperature: Option<f64>,
    pub quadrature: QuadratureConfig,
    /// Grids of the integrated particles `1..n-1`. Defaults to each particle's
    /// own grid.
    pub grids: Option<Vec<MomentumGrid>>,
}

/// Outcome of [`CollisionIntegral::initialize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Active,
    /// The primary species is held in equilibrium.
    Equilibrium,
    /// The temperature is at or below the decoupling temperature.
    Decoupled,
    /// The integral has no matrix-element terms.
    NoTerms,
}

impl Activation {
    pub fn is_active(self) -> bool {
        self == Activation::Active
    }
}

/// Per-grid-point result of one implicit step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepContribution {
    /// Predicted distribution value of the primary species.
    pub distribution: f64,
    /// `(distribution - f) / h`, the collision integral of this step.
    pub integral: f64,
}

/// Reaction rates integrated over the primary grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateSummary {
    /// Integral with the forward functional `F_A`; never positive.
    pub forward: f64,
    /// Integral with the backward functional `F_B`; never negative.
    pub backward: f64,
    /// `backward + forward`; vanishes at detailed balance.
    pub net: f64,
}

/// Collision integral of one reaction for its primary (first) particle.
///
/// # Lifecycle
/// Built once per reaction with [`CollisionIntegral::new`], which validates
/// the reaction, the matrix-element terms and the integration grids.
/// [`CollisionIntegral::initialize`] is called once per coarse step with the
/// current background; it recomputes the normalization and decides whether the
/// integral contributes to the step. Evaluation before the first
/// `initialize` fails with [`CollisionIntegralError::NotInitialized`].
#[derive(Debug)]
pub struct CollisionIntegral {
    reaction: Reaction,
    family: ReactionFamily,
    terms: Vec<MatrixElement>,
    signs: Vec<f64>,
    decoupling_temperature: f64,
    quadrature: QuadratureConfig,
    grids: Vec<MomentumGrid>,
    context: Option<CosmologyContext>,
    constant: f64,
    active: bool,
}

impl CollisionIntegral {
    pub fn new(
        reaction: Reaction,
        terms: Vec<MatrixElement>,
        config: IntegralConfig,
    ) -> Result<Self, CollisionIntegralError> {
        let family = ReactionFamily::for_arity(reaction.len())?;

        if let Some(term) = terms.iter().find(|term| term.arity() != family.arity()) {
            return Err(CollisionIntegralError::Configuration(format!(
                "matrix element `{term}` is written for {} particles but `{reaction}` has {}",
                term.arity(),
                reaction.len()
            )));
        }

        let integrated = &reaction.particles()[1..reaction.len() - 1];
        let grids = match config.grids {
            Some(grids) => {
                if grids.len() != integrated.len() {
                    return Err(CollisionIntegralError::Configuration(format!(
                        "`{reaction}` integrates over {} momenta, got {} grids",
                        integrated.len(),
                        grids.len()
                    )));
                }
                grids
            }
            None => integrated
                .iter()
                .map(|particle| particle.species.grid().clone())
                .collect(),
        };

        let decoupling_temperature = config
            .decoupling_temperature
            .unwrap_or_else(|| reaction.primary().species.decoupling_temperature());
        if !decoupling_temperature.is_finite() || decoupling_temperature < 0.0 {
            return Err(CollisionIntegralError::Configuration(format!(
                "decoupling temperature must be finite and non-negative, got {decoupling_temperature}"
            )));
        }

        let signs = reaction.signs();
        Ok(Self {
            reaction,
            family,
            terms,
            signs,
            decoupling_temperature,
            quadrature: config.quadrature,
            grids,
            context: None,
            constant: 0.0,
            active: false,
        })
    }

    pub fn reaction(&self) -> &Reaction {
        &self.reaction
    }

    pub fn family(&self) -> ReactionFamily {
        self.family
    }

    pub fn terms(&self) -> &[MatrixElement] {
        &self.terms
    }

    pub fn grids(&self) -> &[MomentumGrid] {
        &self.grids
    }

    pub fn decoupling_temperature(&self) -> f64 {
        self.decoupling_temperature
    }

    /// Normalization computed by the last [`initialize`](Self::initialize).
    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn primary(&self) -> &dyn Species {
        self.reaction.primary().species.as_ref()
    }

    /// Recomputes the normalization for `context` and decides whether the
    /// integral contributes to the current step.
    pub fn initialize(&mut self, context: &CosmologyContext) -> Activation {
        self.context = Some(*context);
        self.constant = match self.family {
            ReactionFamily::FourParticle => {
                1.0 / (64.0 * PI.powi(3) * context.scale_factor().powi(5) * context.hubble_rate())
            }
            ReactionFamily::ThreeParticle => {
                context.scale_factor() / (16.0 * PI * context.hubble_rate())
            }
        };

        let activation = if self.primary().in_equilibrium() {
            Activation::Equilibrium
        } else if context.temperature() <= self.decoupling_temperature {
            Activation::Decoupled
        } else if self.terms.is_empty() {
            Activation::NoTerms
        } else {
            Activation::Active
        };
        self.active = activation.is_active();

        debug!(
            "{self}: {activation:?} at T = {:.4e} (decoupling at {:.4e})",
            context.temperature(),
            self.decoupling_temperature
        );
        activation
    }

    fn context(&self) -> Result<&CosmologyContext, CollisionIntegralError> {
        self.context
            .as_ref()
            .ok_or_else(|| CollisionIntegralError::NotInitialized(self.to_string()))
    }

    /// Integrand at one phase-space point.
    ///
    /// `momenta` are the driving momenta `(p0, p1, p2)` of a four-particle
    /// reaction or `(p0, p1)` of a three-particle one; missing entries are
    /// zero. Returns exactly 0 outside the kinematically allowed region.
    pub fn integrand(&self, momenta: &[f64], functional: Functional) -> f64 {
        let at = |index: usize| momenta.get(index).copied().unwrap_or(0.0);
        match self.family {
            ReactionFamily::FourParticle => {
                self.four_particle_integrand(at(0), at(1), at(2), functional)
            }
            ReactionFamily::ThreeParticle => {
                self.three_particle_integrand(at(0), at(1), functional)
            }
        }
    }

    /// Integrand at every row of `points`, evaluated in parallel.
    pub fn integrand_batch(&self, points: ArrayView2<'_, f64>, functional: Functional) -> Array1<f64> {
        let mut values = Array1::zeros(points.nrows());
        Zip::from(&mut values)
            .and(points.rows())
            .par_for_each(|value, row| {
                let momenta: Vec<f64> = row.iter().copied().collect();
                *value = self.integrand(&momenta, functional);
            });
        values
    }

    fn evaluate(&self, p0: f64, functional: Functional) -> f64 {
        match self.family {
            ReactionFamily::FourParticle => self.four_particle_integral(p0, functional),
            ReactionFamily::ThreeParticle => self.three_particle_integral(p0, functional),
        }
    }

    /// Collision integral at primary momentum `p0` with the selected
    /// functional.
    pub fn integral(&self, p0: f64, functional: Functional) -> Result<f64, CollisionIntegralError> {
        self.context()?;
        let start = Instant::now();
        let value = self.evaluate(p0, functional);
        trace!(
            "{self}\tI({p0:5.2}) = {value:.5e}\t[{functional:?}, {:?}]",
            start.elapsed()
        );
        Ok(value)
    }

    /// `F_1` weighted integral, the part independent of the primary
    /// distribution.
    pub fn integral_constant(&self, p0: f64) -> Result<f64, CollisionIntegralError> {
        self.integral(p0, Functional::CONSTANT)
    }

    /// `F_f` weighted integral, the coefficient of the primary distribution.
    pub fn integral_linear(&self, p0: f64) -> Result<f64, CollisionIntegralError> {
        self.integral(p0, Functional::LINEAR)
    }

    /// Rest-frame closed form of a three-particle integral at `p0 = 0`.
    pub fn rest_integral(&self, functional: Functional) -> Result<f64, CollisionIntegralError> {
        self.context()?;
        match self.family {
            ReactionFamily::ThreeParticle => Ok(self.three_particle_rest_integral(functional)),
            ReactionFamily::FourParticle => Err(CollisionIntegralError::Unimplemented(format!(
                "`{self}` has no rest-frame closed form"
            ))),
        }
    }

    /// One implicit step at grid momentum `p0`.
    ///
    /// `history` holds the species' past collision integrals at `p0`, oldest
    /// first. An inactive integral leaves the distribution unchanged.
    pub fn integrate(&self, p0: f64, history: &[f64]) -> Result<StepContribution, CollisionIntegralError> {
        let context = self.context()?;
        let current = self.primary().distribution(p0);
        if !self.active {
            return Ok(StepContribution {
                distribution: current,
                integral: 0.0,
            });
        }

        let constant = self.integral_constant(p0)?;
        let linear = self.integral_linear(p0)?;
        let order = adams_moulton::order_for(MAX_ORDER, history.len());
        let prediction =
            adams_moulton::advance(current, history, constant, linear, context.step(), order)?;

        Ok(StepContribution {
            distribution: prediction.distribution,
            integral: prediction.integral,
        })
    }

    fn grid_rate(&self, functional: Functional) -> Result<f64, CollisionIntegralError> {
        self.context()?;
        let grid = self.primary().grid();
        let samples = Zip::from(grid.template()).par_map_collect(|&p0| {
            p0 * p0 / (2.0 * PI).powi(3) * self.evaluate(p0, functional)
        });
        Ok(samples.simpson(grid.step())?)
    }

    /// Forward (`F_A`) and backward (`F_B`) rates over the full primary grid.
    pub fn rates(&self) -> Result<(f64, f64), CollisionIntegralError> {
        Ok((
            self.grid_rate(Functional::FORWARD)?,
            self.grid_rate(Functional::BACKWARD)?,
        ))
    }

    pub fn rate(&self) -> Result<RateSummary, CollisionIntegralError> {
        let (forward, backward) = self.rates()?;
        Ok(RateSummary {
            forward,
            backward,
            net: backward + forward,
        })
    }
}

impl fmt::Display for CollisionIntegral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.terms.iter().map(ToString::to_string).collect();
        write!(f, "{}\t({})", self.reaction, terms.join("; "))
    }
}
