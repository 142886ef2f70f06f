//! Angle-integrated products of four-momentum dot products.
//!
//! After the angular integrations of a $2 \leftrightarrow 2$ collision
//! integral, every product of scalar products reduces to one-dimensional
//! integrals of the form
//! $$D = \frac{4}{\pi} \int_0^\infty \frac{d\lambda}{\lambda^2} \prod_{i=0}^{3} g_i(\lambda)$$
//! with, per momentum slot, either $g = \sin(p\lambda)$ or the radial factor
//! $g = p\cos(p\lambda) - \sin(p\lambda)/\lambda$. These integrals are
//! elementary: every factor is expanded into monomials
//! $\lambda^{-n} \prod \mathrm{trig}(p_i \lambda)$, the trigonometric product
//! is reduced to single harmonics of $k = \sum_i \pm p_i$ and the Hadamard
//! finite part of $\int_0^\infty \lambda^{-n} \mathrm{trig}(k\lambda)\,d\lambda$
//! is taken term by term. The divergent pieces cancel between terms, leaving a
//! piecewise polynomial in the momenta.
//!
//! [`Factor::Origin`] is the $p \to 0$ limit of $\sin(p\lambda)/p$ and is used
//! when the primary momentum vanishes.

use std::f64::consts::PI;

const MAX_SLOTS: usize = 4;
const MAX_MONOMIALS: usize = 1 << MAX_SLOTS;

/// One momentum slot of a D-function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Factor {
    /// $\sin(p \lambda)$.
    Sine(f64),
    /// $p \cos(p \lambda) - \sin(p \lambda) / \lambda$.
    Radial(f64),
    /// $\lambda$.
    Origin,
}

#[derive(Clone, Copy, Debug)]
struct Harmonic {
    sine: bool,
    momentum: f64,
}

#[derive(Clone, Copy, Debug)]
struct Monomial {
    coefficient: f64,
    // Net power of lambda contributed by the factors.
    power: i32,
    harmonics: [Harmonic; MAX_SLOTS],
    len: usize,
}

impl Monomial {
    const UNIT: Self = Self {
        coefficient: 1.0,
        power: 0,
        harmonics: [Harmonic {
            sine: false,
            momentum: 0.0,
        }; MAX_SLOTS],
        len: 0,
    };

    fn with(mut self, coefficient: f64, power: i32, harmonic: Option<Harmonic>) -> Self {
        self.coefficient *= coefficient;
        self.power += power;
        if let Some(harmonic) = harmonic {
            self.harmonics[self.len] = harmonic;
            self.len += 1;
        }
        self
    }

    /// $\int_0^\infty \lambda^{power - 2} \prod_i \mathrm{trig}(p_i \lambda)\,d\lambda$
    /// in the finite-part sense.
    fn integrate(&self) -> f64 {
        let n = 2 - self.power;
        let harmonics = &self.harmonics[..self.len];
        let sines = harmonics.iter().filter(|h| h.sine).count();
        let odd = sines % 2 == 1;
        let sigma = if (sines / 2) % 2 == 0 { 1.0 } else { -1.0 };

        let mut total = 0.0;
        for signs in 0..(1usize << self.len) {
            let mut k = 0.0;
            let mut weight = 1.0;
            for (bit, harmonic) in harmonics.iter().enumerate() {
                let epsilon = if signs & (1 << bit) == 0 { 1.0 } else { -1.0 };
                k += epsilon * harmonic.momentum;
                if harmonic.sine {
                    weight *= epsilon;
                }
            }
            total += weight * finite_part(n, k, odd);
        }
        self.coefficient * sigma * total / (1u32 << self.len) as f64
    }
}

/// Finite part of $\int_0^\infty \lambda^{-n} \sin(k\lambda)\,d\lambda$ for odd
/// `n` (`odd = true`) or of the cosine integral for even `n`.
fn finite_part(n: i32, k: f64, odd: bool) -> f64 {
    if n < 1 {
        return 0.0;
    }
    let factorial: f64 = (1..n).map(f64::from).product();
    let sign = if (n / 2) % 2 == 0 { 1.0 } else { -1.0 };
    let value = sign * PI / (2.0 * factorial) * k.abs().powi(n - 1);
    if odd {
        if k > 0.0 {
            value
        } else if k < 0.0 {
            -value
        } else {
            0.0
        }
    } else {
        value
    }
}

/// $\frac{4}{\pi}\int_0^\infty \lambda^{-2} \prod_i g_i(\lambda)\,d\lambda$ for up to
/// four factors.
pub fn angular_integral(factors: &[Factor]) -> f64 {
    debug_assert!(factors.len() <= MAX_SLOTS);

    let mut monomials = [Monomial::UNIT; MAX_MONOMIALS];
    let mut count = 1;
    for factor in factors.iter().take(MAX_SLOTS) {
        match *factor {
            Factor::Sine(momentum) => {
                for monomial in monomials[..count].iter_mut() {
                    *monomial = monomial.with(
                        1.0,
                        0,
                        Some(Harmonic {
                            sine: true,
                            momentum,
                        }),
                    );
                }
            }
            Factor::Origin => {
                for monomial in monomials[..count].iter_mut() {
                    *monomial = monomial.with(1.0, 1, None);
                }
            }
            Factor::Radial(momentum) => {
                for i in 0..count {
                    let base = monomials[i];
                    monomials[i] = base.with(
                        momentum,
                        0,
                        Some(Harmonic {
                            sine: false,
                            momentum,
                        }),
                    );
                    monomials[count + i] = base.with(
                        -1.0,
                        -1,
                        Some(Harmonic {
                            sine: true,
                            momentum,
                        }),
                    );
                }
                count *= 2;
            }
        }
    }

    let total: f64 = monomials[..count]
        .iter()
        .filter(|monomial| monomial.coefficient != 0.0)
        .map(Monomial::integrate)
        .sum();
    4.0 / PI * total
}

/// $D_1$: all four slots $\sin(p_i\lambda)$. Vanishes when the largest
/// momentum exceeds the sum of the other three.
pub fn d1(p: [f64; 4]) -> f64 {
    angular_integral(&p.map(Factor::Sine))
}

/// $D_2(a, b; c, d)$: sine slots for `a`, `b` and radial slots for `c`, `d`.
pub fn d2(a: f64, b: f64, c: f64, d: f64) -> f64 {
    angular_integral(&[
        Factor::Sine(a),
        Factor::Sine(b),
        Factor::Radial(c),
        Factor::Radial(d),
    ])
}

/// $D_3$: all four slots radial.
pub fn d3(p: [f64; 4]) -> f64 {
    angular_integral(&p.map(Factor::Radial))
}
