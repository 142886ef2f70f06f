pub mod d_functions;

use std::fmt;
use std::ops::{AddAssign, DivAssign, MulAssign};

use thiserror::Error;

use d_functions::{Factor, angular_integral};

#[derive(Error, Debug, PartialEq)]
pub enum MatrixElementError {
    #[error("Term ordering {0:?} is not a permutation of (0, 1, 2, 3)")]
    InvalidOrder([usize; 4]),

    #[error("Invalid coefficient '{param}': {value}")]
    InvalidCoefficient { param: &'static str, value: f64 },
}

/// Four-particle term of the squared matrix element
/// $$K_1 (p_i \cdot p_j)(p_k \cdot p_l) + K_2\, m_i m_j (p_k \cdot p_l)$$
/// where `order = (i, j, k, l)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourParticleM {
    k1: f64,
    k2: f64,
    order: [usize; 4],
}

impl FourParticleM {
    pub fn new(k1: f64, k2: f64, order: [usize; 4]) -> Result<Self, MatrixElementError> {
        if !k1.is_finite() {
            return Err(MatrixElementError::InvalidCoefficient {
                param: "K1",
                value: k1,
            });
        }
        if !k2.is_finite() {
            return Err(MatrixElementError::InvalidCoefficient {
                param: "K2",
                value: k2,
            });
        }
        let mut seen = [false; 4];
        for &index in &order {
            if index >= 4 || seen[index] {
                return Err(MatrixElementError::InvalidOrder(order));
            }
            seen[index] = true;
        }
        Ok(Self { k1, k2, order })
    }

    pub fn k1(&self) -> f64 {
        self.k1
    }

    pub fn k2(&self) -> f64 {
        self.k2
    }

    pub fn order(&self) -> [usize; 4] {
        self.order
    }

    /// Angle-integrated value of the term at one phase-space point.
    ///
    /// `s` are the energy-balance signs. With `primary_at_rest` the result is
    /// the limit of the angular integral divided by `p[0]` as `p[0] -> 0`:
    /// sine slots of the primary become [`Factor::Origin`] and every radial
    /// slot of the primary vanishes.
    pub fn angular(
        &self,
        p: &[f64; 4],
        e: &[f64; 4],
        m: &[f64; 4],
        s: &[f64; 4],
        primary_at_rest: bool,
    ) -> f64 {
        let [i, j, k, l] = self.order;

        let sine = |index: usize| {
            if primary_at_rest && index == 0 {
                Factor::Origin
            } else {
                Factor::Sine(p[index])
            }
        };
        let radial = |index: usize| {
            if primary_at_rest && index == 0 {
                None
            } else {
                Some(Factor::Radial(p[index]))
            }
        };
        let d2 = |sines: [usize; 2], radials: [usize; 2]| {
            match (radial(radials[0]), radial(radials[1])) {
                (Some(a), Some(b)) => angular_integral(&[sine(sines[0]), sine(sines[1]), a, b]),
                _ => 0.0,
            }
        };

        let d1 = angular_integral(&[sine(0), sine(1), sine(2), sine(3)]);
        let d2_ij_kl = d2([i, j], [k, l]);

        let mut value = 0.0;
        if self.k1 != 0.0 {
            let d2_kl_ij = d2([k, l], [i, j]);
            let d3 = match (radial(0), radial(1), radial(2), radial(3)) {
                (Some(a), Some(b), Some(c), Some(d)) => angular_integral(&[a, b, c, d]),
                _ => 0.0,
            };
            value += self.k1
                * (e[0] * e[1] * e[2] * e[3] * d1
                    + s[k] * s[l] * e[i] * e[j] * d2_ij_kl
                    + s[i] * s[j] * e[k] * e[l] * d2_kl_ij
                    + s[0] * s[1] * s[2] * s[3] * d3);
        }
        if self.k2 != 0.0 {
            value += self.k2 * m[i] * m[j] * (e[k] * e[l] * d1 + s[k] * s[l] * d2_ij_kl);
        }
        value
    }
}

impl fmt::Display for FourParticleM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [i, j, k, l] = self.order;
        write!(
            f,
            "K1={:.2e}, K2={:.2e}, order=({i}, {j}, {k}, {l})",
            self.k1, self.k2
        )
    }
}

/// Constant three-particle matrix element.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ThreeParticleM {
    pub k: f64,
}

impl ThreeParticleM {
    pub fn new(k: f64) -> Result<Self, MatrixElementError> {
        if !k.is_finite() {
            return Err(MatrixElementError::InvalidCoefficient {
                param: "K",
                value: k,
            });
        }
        Ok(Self { k })
    }
}

impl AddAssign for ThreeParticleM {
    fn add_assign(&mut self, other: Self) {
        self.k += other.k;
    }
}

impl MulAssign<f64> for ThreeParticleM {
    fn mul_assign(&mut self, factor: f64) {
        self.k *= factor;
    }
}

impl DivAssign<f64> for ThreeParticleM {
    fn div_assign(&mut self, divisor: f64) {
        self.k /= divisor;
    }
}

impl fmt::Display for ThreeParticleM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K={:.2e}", self.k)
    }
}

/// One term of a reaction's squared matrix element; the total is the sum of
/// all terms attached to a collision integral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatrixElement {
    FourParticle(FourParticleM),
    ThreeParticle(ThreeParticleM),
}

impl MatrixElement {
    /// Number of reaction participants the term is written for.
    pub fn arity(&self) -> usize {
        match self {
            MatrixElement::FourParticle(_) => 4,
            MatrixElement::ThreeParticle(_) => 3,
        }
    }
}

impl From<FourParticleM> for MatrixElement {
    fn from(m: FourParticleM) -> Self {
        MatrixElement::FourParticle(m)
    }
}

impl From<ThreeParticleM> for MatrixElement {
    fn from(m: ThreeParticleM) -> Self {
        MatrixElement::ThreeParticle(m)
    }
}

impl fmt::Display for MatrixElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixElement::FourParticle(m) => write!(f, "{m}"),
            MatrixElement::ThreeParticle(m) => write!(f, "{m}"),
        }
    }
}
