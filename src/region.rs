//! Kinematically allowed integration regions.
//!
//! The admissible region is located by scanning the momentum grid of the
//! integrated particle. The scans assume that, at fixed driving momenta, the
//! region is a single interval along the scanned direction. This holds for
//! equal-mass and massless scattering; for strongly asymmetric masses it is an
//! approximation.

use crate::kinematics::Kinematics;
use crate::reaction::ReactionParticle;
use crate::species::MomentumGrid;

/// Subdivisions per grid cell when no grid point of a decay region is
/// admissible (narrow regions at small `p0`).
pub const REFINEMENT: usize = 32;

/// Four-particle admissibility: the dependent particle is on shell and the
/// momenta of each pair close a triangle with the other pair,
/// `max(p0, p1) <= min(p0, p1) + p2 + p3` and likewise for `(p2, p3)`.
pub fn four_particle_in_bounds(kinematics: &Kinematics) -> bool {
    let p = &kinematics.p;
    if p.len() != 4 || !kinematics.dependent_on_shell() {
        return false;
    }
    let (q1, q2) = if p[0] > p[1] { (p[0], p[1]) } else { (p[1], p[0]) };
    let (q3, q4) = if p[2] > p[3] { (p[2], p[3]) } else { (p[3], p[2]) };
    q1 <= q2 + q3 + q4 && q3 <= q1 + q2 + q4
}

/// Three-particle admissibility: the dependent particle is on shell and the
/// three momenta satisfy the strict triangle inequalities.
pub fn three_particle_in_bounds(kinematics: &Kinematics) -> bool {
    let p = &kinematics.p;
    if p.len() != 3 || !kinematics.dependent_on_shell() {
        return false;
    }
    p[0] + p[1] > p[2] && p[0] + p[2] > p[1] && p[1] + p[2] > p[0]
}

/// Located inner integration limits at one grid value of `p1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionBoundary {
    pub p1: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Region of a four-particle reaction in the `(p1, p2)` plane at fixed `p0`.
#[derive(Clone, Copy, Debug)]
pub struct ScatteringRegion<'a> {
    particles: &'a [ReactionParticle],
    outer: &'a MomentumGrid,
    inner: &'a MomentumGrid,
}

impl<'a> ScatteringRegion<'a> {
    /// `outer` is the grid of `p1`, `inner` the grid of `p2`.
    pub fn new(
        particles: &'a [ReactionParticle],
        outer: &'a MomentumGrid,
        inner: &'a MomentumGrid,
    ) -> Self {
        Self {
            particles,
            outer,
            inner,
        }
    }

    pub fn in_bounds(&self, p0: f64, p1: f64, p2: f64) -> bool {
        four_particle_in_bounds(&Kinematics::reconstruct(&[p0, p1, p2], self.particles))
    }

    /// First grid value of `p2` inside the region, or the grid minimum.
    pub fn lower_bound(&self, p0: f64, p1: f64) -> f64 {
        self.inner
            .template()
            .iter()
            .copied()
            .find(|&p2| self.in_bounds(p0, p1, p2))
            .unwrap_or(self.inner.min())
    }

    /// Last grid value of `p2` inside the region, or the grid minimum.
    ///
    /// The scan starts one grid point above `min(p0 + p1, max)` and runs
    /// downwards. An admissible start means the region reaches past
    /// `p0 + p1` (massive driving particles), and the scan climbs instead.
    pub fn upper_bound(&self, p0: f64, p1: f64) -> f64 {
        let last = self.inner.samples() - 1;
        let start = (self.inner.floor_index((p0 + p1).min(self.inner.max())) + 1).min(last);
        let admissible = |index: usize| self.in_bounds(p0, p1, self.inner.value(index));

        if admissible(start) {
            let end = (start + 1..=last)
                .take_while(|&index| admissible(index))
                .last()
                .unwrap_or(start);
            return self.inner.value(end);
        }
        (0..start)
            .rev()
            .find(|&index| admissible(index))
            .map_or(self.inner.min(), |index| self.inner.value(index))
    }

    /// Located `p2` limits for every grid value of `p1`.
    pub fn bounds(&self, p0: f64) -> Vec<RegionBoundary> {
        self.outer
            .template()
            .iter()
            .map(|&p1| RegionBoundary {
                p1,
                lower: self.lower_bound(p0, p1),
                upper: self.upper_bound(p0, p1),
            })
            .collect()
    }
}

/// Inner limits between tabulated boundaries.
///
/// Takes the envelope of the two boundaries bracketing `p1`, widened by one
/// step of the inner grid and clamped to it.
pub fn inner_limits(
    boundaries: &[RegionBoundary],
    outer: &MomentumGrid,
    inner: &MomentumGrid,
    p1: f64,
) -> (f64, f64) {
    if boundaries.is_empty() {
        return (inner.min(), inner.max());
    }
    let index = outer.floor_index(p1).min(boundaries.len() - 1);
    let next = (index + 1).min(boundaries.len() - 1);
    let (a, b) = (&boundaries[index], &boundaries[next]);
    let lower = (a.lower.min(b.lower) - inner.step()).max(inner.min());
    let upper = (a.upper.max(b.upper) + inner.step()).min(inner.max());
    (lower, upper.max(lower))
}

/// Region of a three-particle reaction along `p1` at fixed `p0`.
#[derive(Clone, Copy, Debug)]
pub struct DecayRegion<'a> {
    particles: &'a [ReactionParticle],
    grid: &'a MomentumGrid,
}

impl<'a> DecayRegion<'a> {
    pub fn new(particles: &'a [ReactionParticle], grid: &'a MomentumGrid) -> Self {
        Self { particles, grid }
    }

    pub fn in_bounds(&self, p0: f64, p1: f64) -> bool {
        three_particle_in_bounds(&Kinematics::reconstruct(&[p0, p1], self.particles))
    }

    /// Range of `p1` between the outermost admissible points, with both edges
    /// bisected down to rounding. `None` when nothing is admissible even on
    /// the refined grid.
    ///
    /// The three-particle integrand is discontinuous at the region edges;
    /// callers integrate over exactly this range.
    pub fn support(&self, p0: f64) -> Option<(f64, f64)> {
        let grid = self.grid;
        self.scan(p0, grid.samples(), grid.step()).or_else(|| {
            let samples = (grid.samples() - 1) * REFINEMENT + 1;
            self.scan(p0, samples, grid.step() / REFINEMENT as f64)
        })
    }

    fn scan(&self, p0: f64, samples: usize, step: f64) -> Option<(f64, f64)> {
        let grid = self.grid;
        let at = |index: usize| (grid.min() + index as f64 * step).min(grid.max());
        let first = (0..samples).find(|&index| self.in_bounds(p0, at(index)))?;
        let last = (first..samples)
            .rev()
            .find(|&index| self.in_bounds(p0, at(index)))
            .unwrap_or(first);

        let lower = match first {
            0 => at(0),
            _ => self.edge(p0, at(first), at(first - 1)),
        };
        let upper = if last + 1 < samples {
            self.edge(p0, at(last), at(last + 1))
        } else {
            at(last)
        };
        Some((lower, upper))
    }

    /// Bisects between an admissible and an inadmissible `p1` and returns the
    /// last admissible point found.
    fn edge(&self, p0: f64, mut inside: f64, mut outside: f64) -> f64 {
        for _ in 0..64 {
            let middle = 0.5 * (inside + outside);
            if middle == inside || middle == outside {
                break;
            }
            if self.in_bounds(p0, middle) {
                inside = middle;
            } else {
                outside = middle;
            }
        }
        inside
    }
}
