//! The distribution functional $\mathcal{F}(f)$ of a reaction.
//!
//! In naive form
//! $$\mathcal{F} = \mathcal{F}_B + \mathcal{F}_A
//!   = f_3 f_4 (1 - \eta_1 f_1)(1 - \eta_2 f_2) - f_1 f_2 (1 - \eta_3 f_3)(1 - \eta_4 f_4)$$
//! and linearized in the primary distribution $f_1$
//! $$\mathcal{F} = \mathcal{F}_B^{(1)} + f_1 \left(\mathcal{F}_A^{(1)} - \eta_1 \mathcal{F}_B^{(1)}\right)$$
//! where $^{(i)}$ marks the expression with $f_i$ omitted.

use super::{ReactionError, ReactionParticle, Side};

/// Forward/backward products over the participants of a reaction.
pub trait DistributionFunctional {
    fn participants(&self) -> &[ReactionParticle];

    /// Forward (loss) term: incoming particles contribute `f`, outgoing ones
    /// `1 - eta * f`, overall sign `-1`.
    fn f_a(&self, p: &[f64], skip_index: Option<usize>) -> f64 {
        product(self.participants(), p, skip_index, Side::Incoming, -1.0)
    }

    /// Backward (gain) term: outgoing particles contribute `f`, incoming ones
    /// `1 - eta * f`.
    fn f_b(&self, p: &[f64], skip_index: Option<usize>) -> f64 {
        product(self.participants(), p, skip_index, Side::Outgoing, 1.0)
    }

    /// Part of the functional independent of the primary distribution.
    fn f_1(&self, p: &[f64]) -> f64 {
        self.f_b(p, Some(0))
    }

    /// Coefficient of the primary distribution in the linearized functional.
    fn f_f(&self, p: &[f64]) -> f64 {
        let eta = self.participants()[0].species.eta();
        self.f_a(p, Some(0)) - eta * self.f_b(p, Some(0))
    }
}

fn product(
    particles: &[ReactionParticle],
    p: &[f64],
    skip_index: Option<usize>,
    occupied: Side,
    sign: f64,
) -> f64 {
    particles
        .iter()
        .zip(p)
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip_index)
        .fold(sign, |acc, (_, (particle, &momentum))| {
            let f = particle.species.distribution(momentum);
            if particle.side == occupied {
                acc * f
            } else {
                acc * (1.0 - particle.species.eta() * f)
            }
        })
}

/// Selection of functional terms summed into an integrand.
///
/// `F_A`/`F_B` may be combined freely with each other and with one of the
/// linearized terms; `F_1` and `F_f` are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Functional {
    forward: bool,
    backward: bool,
    constant: bool,
    linear: bool,
}

impl Functional {
    /// `F_A + F_B`.
    pub const NAIVE: Self = Self::unchecked(true, true, false, false);
    /// `F_A`.
    pub const FORWARD: Self = Self::unchecked(true, false, false, false);
    /// `F_B`.
    pub const BACKWARD: Self = Self::unchecked(false, true, false, false);
    /// `F_1`.
    pub const CONSTANT: Self = Self::unchecked(false, false, true, false);
    /// `F_f`.
    pub const LINEAR: Self = Self::unchecked(false, false, false, true);

    const fn unchecked(forward: bool, backward: bool, constant: bool, linear: bool) -> Self {
        Self {
            forward,
            backward,
            constant,
            linear,
        }
    }

    pub fn from_terms(
        f_a: bool,
        f_b: bool,
        f_1: bool,
        f_f: bool,
    ) -> Result<Self, ReactionError> {
        if f_1 && f_f {
            return Err(ReactionError::ConflictingFunctional);
        }
        Ok(Self::unchecked(f_a, f_b, f_1, f_f))
    }

    pub fn evaluate<F: DistributionFunctional + ?Sized>(&self, functional: &F, p: &[f64]) -> f64 {
        let mut value = 0.0;
        if self.backward {
            value += functional.f_b(p, None);
        }
        if self.forward {
            value += functional.f_a(p, None);
        }
        if self.constant {
            value += functional.f_1(p);
        }
        if self.linear {
            value += functional.f_f(p);
        }
        value
    }
}

impl Default for Functional {
    fn default() -> Self {
        Self::NAIVE
    }
}
