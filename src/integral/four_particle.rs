use super::CollisionIntegral;
use crate::kinematics::Kinematics;
use crate::matrix_element::MatrixElement;
use crate::reaction::Functional;
use crate::region::{ScatteringRegion, four_particle_in_bounds, inner_limits};

#[inline]
fn quad(values: &[f64]) -> [f64; 4] {
    [values[0], values[1], values[2], values[3]]
}

impl CollisionIntegral {
    /// $$\frac{C}{p_0 E_0} \sum_M \langle|\mathcal{M}|^2\rangle_\Omega
    ///   \prod_{i=1,2} \frac{p_i}{E_i}\, \mathcal{F}(p)$$
    ///
    /// At `p0 = 0` the limit of the angular integrals divided by `p0` is
    /// taken in closed form. For a massless primary the remaining `1/E0` is
    /// absorbed by the single power of `E0` carried by every surviving term.
    pub(super) fn four_particle_integrand(
        &self,
        p0: f64,
        p1: f64,
        p2: f64,
        functional: Functional,
    ) -> f64 {
        let kinematics = Kinematics::reconstruct(&[p0, p1, p2], self.reaction.particles());
        if !four_particle_in_bounds(&kinematics) {
            return 0.0;
        }

        let p = quad(&kinematics.p);
        let mut e = quad(&kinematics.e);
        let m = quad(&kinematics.m);
        let s = quad(&self.signs);

        let at_rest = p[0] == 0.0;
        let scale = if at_rest {
            if e[0] == 0.0 {
                e[0] = 1.0;
            }
            e[0]
        } else {
            p[0] * e[0]
        };

        let matrix_element: f64 = self
            .terms
            .iter()
            .map(|term| match term {
                MatrixElement::FourParticle(term) => term.angular(&p, &e, &m, &s, at_rest),
                MatrixElement::ThreeParticle(_) => 0.0,
            })
            .sum();

        let mut integrand = self.constant * matrix_element / scale;
        for i in [1, 2] {
            if m[i] != 0.0 {
                integrand *= p[i] / e[i];
            }
        }
        if integrand == 0.0 {
            return 0.0;
        }

        integrand * functional.evaluate(&self.reaction, &p)
    }

    /// 2-D integral over `(p1, p2)`. The inner limits follow the region
    /// located on the grids, widened by one step.
    pub(super) fn four_particle_integral(&self, p0: f64, functional: Functional) -> f64 {
        let (outer, inner) = (&self.grids[0], &self.grids[1]);
        let region = ScatteringRegion::new(self.reaction.particles(), outer, inner);
        let boundaries = region.bounds(p0);

        let integrand = |p1: f64, p2: f64| self.four_particle_integrand(p0, p1, p2, functional);
        let limits = |p1: f64| inner_limits(&boundaries, outer, inner, p1);

        self.quadrature
            .integrate_2d(&integrand, (outer.min(), outer.max()), &limits)
    }
}
