use peroxide::numerical::integral::{Integral, gauss_kronrod_quadrature};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum QuadratureError {
    #[error("Tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),

    #[error("Maximum number of subdivisions must be positive")]
    InvalidMaxIter,
}

/// Gauss–Kronrod pair used for adaptive integration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuadratureRule {
    G7K15,
    G15K31,
    G30K61,
}

/// Adaptive quadrature settings shared by the 1-D and nested 2-D
/// integrations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadratureConfig {
    rule: QuadratureRule,
    tolerance: f64,
    max_iter: u32,
}

impl QuadratureConfig {
    pub fn new(rule: QuadratureRule, tolerance: f64, max_iter: u32) -> Result<Self, QuadratureError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(QuadratureError::InvalidTolerance(tolerance));
        }
        if max_iter == 0 {
            return Err(QuadratureError::InvalidMaxIter);
        }
        Ok(Self {
            rule,
            tolerance,
            max_iter,
        })
    }

    pub fn rule(&self) -> QuadratureRule {
        self.rule
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    fn method(&self) -> Integral {
        match self.rule {
            QuadratureRule::G7K15 => Integral::G7K15(self.tolerance, self.max_iter),
            QuadratureRule::G15K31 => Integral::G15K31(self.tolerance, self.max_iter),
            QuadratureRule::G30K61 => Integral::G30K61(self.tolerance, self.max_iter),
        }
    }

    /// $\int_a^b f(x)\,dx$. Empty or reversed intervals integrate to zero.
    pub fn integrate_1d<F>(&self, integrand: F, (a, b): (f64, f64)) -> f64
    where
        F: Fn(f64) -> f64 + Copy,
    {
        if !(b > a) {
            return 0.0;
        }
        gauss_kronrod_quadrature(integrand, (a, b), self.method())
    }

    /// $\int_a^b dx \int_{y_0(x)}^{y_1(x)} f(x, y)\,dy$ as nested adaptive
    /// 1-D integrations.
    pub fn integrate_2d<F, L>(&self, integrand: &F, (a, b): (f64, f64), inner: &L) -> f64
    where
        F: Fn(f64, f64) -> f64,
        L: Fn(f64) -> (f64, f64),
    {
        let config = *self;
        let outer = move |x: f64| {
            let (lower, upper) = inner(x);
            config.integrate_1d(move |y: f64| integrand(x, y), (lower, upper))
        };
        self.integrate_1d(outer, (a, b))
    }
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            rule: QuadratureRule::G7K15,
            tolerance: 1e-6,
            max_iter: 20,
        }
    }
}
