use super::CollisionIntegral;
use crate::kinematics::Kinematics;
use crate::matrix_element::MatrixElement;
use crate::reaction::Functional;
use crate::region::{DecayRegion, three_particle_in_bounds};

/// Relative mismatch tolerated between the rest-frame momentum and the
/// reconstructed momentum of the dependent particle.
const REST_FRAME_TOLERANCE: f64 = 1e-9;

impl CollisionIntegral {
    fn three_particle_k(&self) -> f64 {
        self.terms
            .iter()
            .map(|term| match term {
                MatrixElement::ThreeParticle(m) => m.k,
                MatrixElement::FourParticle(_) => 0.0,
            })
            .sum()
    }

    /// $$\frac{C K}{p_0 E_0} \frac{p_1}{E_1} \mathcal{F}(p)$$
    ///
    /// No `p1` closes a strict triangle at `p0 = 0`, so the integrand vanishes
    /// there; the integral at rest comes from
    /// [`Self::three_particle_rest_integral`].
    pub(super) fn three_particle_integrand(&self, p0: f64, p1: f64, functional: Functional) -> f64 {
        let kinematics = Kinematics::reconstruct(&[p0, p1], self.reaction.particles());
        if !three_particle_in_bounds(&kinematics) {
            return 0.0;
        }
        let Kinematics { p, e, m } = &kinematics;

        let mut integrand = self.constant * self.three_particle_k() / (p[0] * e[0]);
        if m[1] != 0.0 {
            integrand *= p[1] / e[1];
        }
        if integrand == 0.0 {
            return 0.0;
        }

        integrand * functional.evaluate(&self.reaction, p)
    }

    /// Closed form of the integral as `p0 -> 0`.
    ///
    /// The primary sits at rest and the products are back to back with
    /// $p^* = \sqrt{\lambda(m_0^2, m_1^2, m_2^2)} / 2 m_0$, giving
    /// $$I = \frac{2 C K p^* \mathcal{F}}{E_0\, |s_1 E_1 + s_2 E_2|}.$$
    /// Zero for a massless primary or a closed channel.
    pub(super) fn three_particle_rest_integral(&self, functional: Functional) -> f64 {
        let particles = self.reaction.particles();
        let masses: Vec<f64> = particles
            .iter()
            .map(|particle| particle.species.conformal_mass())
            .collect();
        let (m0, m1, m2) = (masses[0], masses[1], masses[2]);
        if m0 == 0.0 {
            return 0.0;
        }

        let kallen = (m0 + m1 + m2) * (m0 - m1 - m2) * (m0 - m1 + m2) * (m0 + m1 - m2);
        if kallen < 0.0 {
            return 0.0;
        }
        let p_star = kallen.sqrt() / (2.0 * m0);

        let kinematics = Kinematics::reconstruct(&[0.0, p_star], particles);
        let Kinematics { p, e, .. } = &kinematics;
        let mismatch = (p[2] - p_star).abs();
        if !kinematics.dependent_on_shell() || mismatch > REST_FRAME_TOLERANCE * p_star.max(m0) {
            return 0.0;
        }

        let denominator = (self.signs[1] * e[1] + self.signs[2] * e[2]).abs();
        if denominator == 0.0 {
            return 0.0;
        }
        2.0 * self.constant * self.three_particle_k() * p_star / (e[0] * denominator)
            * functional.evaluate(&self.reaction, p)
    }

    /// 1-D integral over `p1`, restricted to the located support. `p0 = 0`
    /// uses the rest-frame closed form.
    pub(super) fn three_particle_integral(&self, p0: f64, functional: Functional) -> f64 {
        if p0 == 0.0 {
            return self.three_particle_rest_integral(functional);
        }
        let region = DecayRegion::new(self.reaction.particles(), &self.grids[0]);
        match region.support(p0) {
            Some(range) => self.quadrature.integrate_1d(
                |p1: f64| self.three_particle_integrand(p0, p1, functional),
                range,
            ),
            None => 0.0,
        }
    }
}
