use approx::{AbsDiffEq, RelativeEq};

use crate::reaction::ReactionParticle;

/// On-shell momenta, conformal energies and conformal masses of every
/// participant at one phase-space point.
#[derive(Clone, Debug, PartialEq)]
pub struct Kinematics {
    pub p: Vec<f64>,
    pub e: Vec<f64>,
    pub m: Vec<f64>,
}

impl Kinematics {
    /// Builds the kinematics for driving `momenta`, solving energy
    /// conservation for the last particle:
    /// $$E_{n} = s_{n} \sum_{i < n} (-s_i E_i), \qquad p_n = \sqrt{|E_n^2 - m_n^2|}$$
    ///
    /// `momenta` is padded with zeros or truncated to the particle count; the
    /// entry for the last particle is ignored. The result is not validated:
    /// unphysical points are rejected by the region admissibility tests.
    pub fn reconstruct(momenta: &[f64], particles: &[ReactionParticle]) -> Self {
        let n = particles.len();
        let mut p: Vec<f64> = momenta
            .iter()
            .copied()
            .chain(std::iter::repeat(0.0))
            .take(n)
            .collect();
        let mut e = Vec::with_capacity(n);
        let mut m = Vec::with_capacity(n);
        for (particle, &momentum) in particles.iter().zip(&p) {
            e.push(particle.species.conformal_energy(momentum));
            m.push(particle.species.conformal_mass());
        }

        if let Some(last) = n.checked_sub(1) {
            let balance: f64 = particles[..last]
                .iter()
                .zip(&e)
                .map(|(particle, energy)| -particle.sign() * energy)
                .sum();
            e[last] = particles[last].sign() * balance;
            p[last] = (e[last] * e[last] - m[last] * m[last]).abs().sqrt();
        }

        Self { p, e, m }
    }

    pub fn len(&self) -> usize {
        self.p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    /// Energy of the dependent particle is at least its mass.
    #[inline]
    pub fn dependent_on_shell(&self) -> bool {
        match (self.e.last(), self.m.last()) {
            (Some(e), Some(m)) => e >= m,
            _ => false,
        }
    }
}

fn slices_abs_diff_eq(a: &[f64], b: &[f64], epsilon: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.abs_diff_eq(y, epsilon))
}

fn slices_relative_eq(a: &[f64], b: &[f64], epsilon: f64, max_relative: f64) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.relative_eq(y, epsilon, max_relative))
}

impl AbsDiffEq for Kinematics {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        slices_abs_diff_eq(&self.p, &other.p, epsilon)
            && slices_abs_diff_eq(&self.e, &other.e, epsilon)
            && slices_abs_diff_eq(&self.m, &other.m, epsilon)
    }
}

impl RelativeEq for Kinematics {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        slices_relative_eq(&self.p, &other.p, epsilon, max_relative)
            && slices_relative_eq(&self.e, &other.e, epsilon, max_relative)
            && slices_relative_eq(&self.m, &other.m, epsilon, max_relative)
    }
}
