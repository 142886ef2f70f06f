use ndarray::Array1;
use thiserror::Error;

/// Errors raised while validating a momentum grid.
#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    #[error("Invalid range: min ({min}) >= max ({max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("Momentum grid must start at a non-negative momentum, got {0}")]
    NegativeMomentum(f64),

    #[error("Invalid parameter '{param}': {value}")]
    InvalidParameter { param: &'static str, value: f64 },

    #[error("At least 2 momentum samples required, got {0}")]
    InsufficientSamples(usize),
}

/// Uniform grid of conformal momenta a species distribution is tabulated on.
///
/// # Constraints
/// - `0 <= min < max`, both finite
/// - `samples >= 2`
///
/// The grid is ascending and `template[i] = min + i * step`, with the last
/// sample pinned to `max` exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentumGrid {
    min: f64,
    max: f64,
    samples: usize,
    step: f64,
    template: Array1<f64>,
}

impl MomentumGrid {
    pub fn new(min: f64, max: f64, samples: usize) -> Result<Self, GridError> {
        if !min.is_finite() {
            return Err(GridError::InvalidParameter {
                param: "min",
                value: min,
            });
        }
        if !max.is_finite() {
            return Err(GridError::InvalidParameter {
                param: "max",
                value: max,
            });
        }
        if min >= max {
            return Err(GridError::InvalidRange { min, max });
        }
        if min < 0.0 {
            return Err(GridError::NegativeMomentum(min));
        }
        if samples < 2 {
            return Err(GridError::InsufficientSamples(samples));
        }

        let step = (max - min) / (samples - 1) as f64;
        let mut template = Array1::linspace(min, max, samples);
        template[samples - 1] = max;

        Ok(Self {
            min,
            max,
            samples,
            step,
            template,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Ordered sample momenta.
    pub fn template(&self) -> &Array1<f64> {
        &self.template
    }

    #[inline]
    pub fn value(&self, index: usize) -> f64 {
        self.template[index]
    }

    /// Index of the grid point at or below `p`, clamped into the grid.
    #[inline]
    pub fn floor_index(&self, p: f64) -> usize {
        if p <= self.min {
            return 0;
        }
        let index = ((p - self.min) / self.step) as usize;
        index.min(self.samples - 1)
    }

    /// Index of the grid sample equal to `p`, if `p` is a grid member.
    pub fn index_of(&self, p: f64) -> Option<usize> {
        if p < self.min || p > self.max {
            return None;
        }
        let index = ((p - self.min) / self.step).round() as usize;
        let index = index.min(self.samples - 1);
        let tolerance = 1e-9 * self.step;
        ((self.template[index] - p).abs() <= tolerance).then_some(index)
    }

    #[inline]
    pub fn contains(&self, p: f64) -> bool {
        p >= self.min && p <= self.max
    }
}
