use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use ndarray::Array1;
use thiserror::Error;

use super::{MomentumGrid, Species, Statistics};

#[derive(Error, Debug)]
pub enum ParticleError {
    #[error("Distribution has {got} samples but the momentum grid has {expected}")]
    DistributionShapeMismatch { expected: usize, got: usize },

    #[error("Mass must be finite and non-negative, got {0}")]
    InvalidMass(f64),

    #[error("Scale factor must be finite and positive, got {0}")]
    InvalidScaleFactor(f64),

    #[error("Temperature must be finite and positive, got {0}")]
    InvalidTemperature(f64),

    #[error("Particle state lock was poisoned")]
    PoisonedState,
}

impl<T> From<PoisonError<T>> for ParticleError {
    fn from(_: PoisonError<T>) -> Self {
        ParticleError::PoisonedState
    }
}

#[derive(Debug, Clone)]
struct ParticleState {
    scale_factor: f64,
    distribution: Array1<f64>,
}

/// A species with its distribution function tabulated on a uniform
/// [`MomentumGrid`].
///
/// Off-grid lookups interpolate linearly between samples. Below the grid the
/// first sample is used; above it a decaying tail is continued exponentially
/// from the last two samples, which is exact for a Boltzmann tail. A tail that
/// is not decaying is held at the last sample.
///
/// The distribution and scale factor are replaced between steps by the
/// evolution driver through [`Particle::update`] and
/// [`Particle::set_scale_factor`]; readers only ever see a complete state.
#[derive(Debug)]
pub struct Particle {
    symbol: String,
    mass: f64,
    statistics: Statistics,
    in_equilibrium: bool,
    decoupling_temperature: f64,
    grid: MomentumGrid,
    state: RwLock<ParticleState>,
}

impl Particle {
    pub fn new(
        symbol: impl Into<String>,
        mass: f64,
        statistics: Statistics,
        grid: MomentumGrid,
        distribution: Array1<f64>,
    ) -> Result<Self, ParticleError> {
        if !mass.is_finite() || mass < 0.0 {
            return Err(ParticleError::InvalidMass(mass));
        }
        if distribution.len() != grid.samples() {
            return Err(ParticleError::DistributionShapeMismatch {
                expected: grid.samples(),
                got: distribution.len(),
            });
        }
        Ok(Self {
            symbol: symbol.into(),
            mass,
            statistics,
            in_equilibrium: false,
            decoupling_temperature: 0.0,
            grid,
            state: RwLock::new(ParticleState {
                scale_factor: 1.0,
                distribution,
            }),
        })
    }

    /// Tabulates the equilibrium distribution at conformal `temperature` for
    /// the given `scale_factor`.
    pub fn in_equilibrium_at(
        symbol: impl Into<String>,
        mass: f64,
        statistics: Statistics,
        grid: MomentumGrid,
        temperature: f64,
        scale_factor: f64,
    ) -> Result<Self, ParticleError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(ParticleError::InvalidTemperature(temperature));
        }
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(ParticleError::InvalidScaleFactor(scale_factor));
        }
        let conformal_mass = mass * scale_factor;
        let distribution = grid.template().mapv(|p| {
            let energy = (p * p + conformal_mass * conformal_mass).sqrt();
            statistics.equilibrium(energy, temperature)
        });
        let particle = Self::new(symbol, mass, statistics, grid, distribution)?;
        particle.set_scale_factor(scale_factor)?;
        Ok(particle)
    }

    /// Marks the species as kept in equilibrium by the driver: its collision
    /// integrals stay inert.
    pub fn with_equilibrium(mut self, in_equilibrium: bool) -> Self {
        self.in_equilibrium = in_equilibrium;
        self
    }

    pub fn with_decoupling_temperature(mut self, decoupling_temperature: f64) -> Self {
        self.decoupling_temperature = decoupling_temperature;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn scale_factor(&self) -> f64 {
        self.read_state().scale_factor
    }

    pub fn set_scale_factor(&self, scale_factor: f64) -> Result<(), ParticleError> {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(ParticleError::InvalidScaleFactor(scale_factor));
        }
        self.state.write()?.scale_factor = scale_factor;
        Ok(())
    }

    /// Replaces the tabulated distribution.
    pub fn update(&self, distribution: Array1<f64>) -> Result<(), ParticleError> {
        if distribution.len() != self.grid.samples() {
            return Err(ParticleError::DistributionShapeMismatch {
                expected: self.grid.samples(),
                got: distribution.len(),
            });
        }
        self.state.write()?.distribution = distribution;
        Ok(())
    }

    /// Copy of the tabulated distribution.
    pub fn distribution_samples(&self) -> Array1<f64> {
        self.read_state().distribution.clone()
    }

    // A poisoned lock still holds a complete state: writers only swap whole
    // fields.
    fn read_state(&self) -> RwLockReadGuard<'_, ParticleState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Species for Particle {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn conformal_mass(&self) -> f64 {
        self.mass * self.read_state().scale_factor
    }

    fn statistics(&self) -> Statistics {
        self.statistics
    }

    fn in_equilibrium(&self) -> bool {
        self.in_equilibrium
    }

    fn decoupling_temperature(&self) -> f64 {
        self.decoupling_temperature
    }

    fn grid(&self) -> &MomentumGrid {
        &self.grid
    }

    fn distribution(&self, p: f64) -> f64 {
        let state = self.read_state();
        let values = &state.distribution;
        let grid = &self.grid;
        let last = grid.samples() - 1;

        if p <= grid.min() {
            return values[0];
        }
        if p >= grid.max() {
            let (f_prev, f_last) = (values[last - 1], values[last]);
            if p == grid.max() || f_last <= 0.0 {
                return if p == grid.max() { f_last } else { 0.0 };
            }
            if f_prev <= f_last {
                return f_last;
            }
            let slope = (f_last / f_prev).ln() / grid.step();
            return f_last * (slope * (p - grid.max())).exp();
        }

        let index = grid.floor_index(p).min(last - 1);
        let weight = (p - grid.value(index)) / grid.step();
        values[index] * (1.0 - weight) + values[index + 1] * weight
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (m = {}, {:?})", self.symbol, self.mass, self.statistics)
    }
}
