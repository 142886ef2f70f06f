use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;
use ndarray::Array1;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::adams_moulton::MAX_ORDER;
use crate::context::CosmologyContext;
use crate::integral::{CollisionIntegral, CollisionIntegralError};
use crate::species::Species;

/// Past collision integrals of one species, oldest first.
///
/// Keeps the `MAX_ORDER - 1` most recent steps, as many as the highest-order
/// Adams–Moulton formula reads.
#[derive(Clone, Debug, Default)]
pub struct IntegralHistory {
    steps: VecDeque<Array1<f64>>,
}

impl IntegralHistory {
    pub const DEPTH: usize = MAX_ORDER - 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the integral of the latest step, dropping the oldest one
    /// beyond [`Self::DEPTH`]. Every step must cover the same grid.
    pub fn push(&mut self, integral: Array1<f64>) -> Result<(), CollisionIntegralError> {
        if let Some(expected) = self.points()
            && expected != integral.len()
        {
            return Err(CollisionIntegralError::HistoryLength {
                expected,
                got: integral.len(),
            });
        }
        if self.steps.len() == Self::DEPTH {
            self.steps.pop_front();
        }
        self.steps.push_back(integral);
        Ok(())
    }

    /// Grid points per stored step, `None` while empty.
    pub fn points(&self) -> Option<usize> {
        self.steps.front().map(Array1::len)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// History at grid index `index`, oldest first. Empty past the end of
    /// the grid.
    pub fn at(&self, index: usize) -> Vec<f64> {
        if self.points().is_none_or(|points| index >= points) {
            return Vec::new();
        }
        self.steps.iter().map(|step| step[index]).collect()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

/// New distribution and total collision integral of one species on its grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepResult {
    pub integral: Array1<f64>,
    pub distribution: Array1<f64>,
}

/// Runs [`CollisionIntegral::initialize`] on every integral and returns how
/// many are active for the step.
pub fn activate(integrals: &mut [CollisionIntegral], context: &CosmologyContext) -> usize {
    integrals
        .iter_mut()
        .map(|integral| integral.initialize(context))
        .filter(|activation| activation.is_active())
        .count()
}

/// Evaluates the collision integrals of a species at every grid point in
/// parallel.
///
/// Distributions are only read during a sweep; the caller applies the returned
/// arrays once every species has been swept.
pub struct CollisionSweep {
    thread_pool: ThreadPool,
}

impl CollisionSweep {
    pub fn new() -> Result<Self, CollisionIntegralError> {
        let default_num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(default_num_threads)
            .build()?;
        Ok(Self { thread_pool })
    }

    pub fn set_num_threads(&mut self, num_threads: usize) -> Result<(), CollisionIntegralError> {
        self.thread_pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
        Ok(())
    }

    pub fn num_threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Sums the step contributions of all active `integrals` of `species` at
    /// every grid point and predicts the distribution after a step of
    /// `context.step()`.
    ///
    /// Every integral must have `species` as its primary particle.
    pub fn compute(
        &self,
        species: &Arc<dyn Species>,
        integrals: &[CollisionIntegral],
        history: &IntegralHistory,
        context: &CosmologyContext,
    ) -> Result<SweepResult, CollisionIntegralError> {
        if let Some(foreign) = integrals.iter().find(|integral| {
            !std::ptr::addr_eq(
                Arc::as_ptr(&integral.reaction().primary().species),
                Arc::as_ptr(species),
            )
        }) {
            return Err(CollisionIntegralError::Configuration(format!(
                "`{foreign}` does not update species {}",
                species.symbol()
            )));
        }

        let active: Vec<&CollisionIntegral> = integrals
            .iter()
            .filter(|integral| integral.is_active())
            .collect();
        let grid = species.grid();
        if let Some(points) = history.points()
            && points != grid.samples()
        {
            return Err(CollisionIntegralError::HistoryLength {
                expected: grid.samples(),
                got: points,
            });
        }
        let current = grid.template().mapv(|p| species.distribution(p));

        if active.is_empty() {
            debug!("{}: no active collision integrals", species.symbol());
            return Ok(SweepResult {
                integral: Array1::zeros(grid.samples()),
                distribution: current,
            });
        }

        let momenta = grid.template().to_vec();
        let totals: Vec<f64> = self.thread_pool.install(|| {
            momenta
                .par_iter()
                .enumerate()
                .map(|(index, &p0)| {
                    let past = history.at(index);
                    active.iter().try_fold(0.0, |total, integral| {
                        Ok::<f64, CollisionIntegralError>(
                            total + integral.integrate(p0, &past)?.integral,
                        )
                    })
                })
                .collect::<Result<Vec<f64>, _>>()
        })?;

        let integral = Array1::from_vec(totals);
        let distribution = &current + &(&integral * context.step());
        debug!(
            "{}: swept {} grid points with {} active integrals, max |I| = {:.3e}",
            species.symbol(),
            grid.samples(),
            active.len(),
            integral.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
        );

        Ok(SweepResult {
            integral,
            distribution,
        })
    }
}
