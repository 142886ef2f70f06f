//! Implicit Adams–Moulton step for a single distribution value.
//!
//! The collision integral at the new step is linear in the unknown value,
//! $I(y_{n+1}) = A + B\,y_{n+1}$, so the implicit formula
//! $$y_{n+1} = y_n + \frac{h}{d}\Big(\sum_{i} c_i I_{n+1-s+i} + c_s (A + B y_{n+1})\Big)$$
//! is solved in closed form.

use thiserror::Error;

/// Highest supported order.
pub const MAX_ORDER: usize = 5;

const COEFFICIENTS: [(&[f64], f64); MAX_ORDER] = [
    (&[1.0], 1.0),
    (&[1.0, 1.0], 2.0),
    (&[-1.0, 8.0, 5.0], 12.0),
    (&[1.0, -5.0, 19.0, 9.0], 24.0),
    (&[-19.0, 106.0, -264.0, 646.0, 251.0], 720.0),
];

#[derive(Error, Debug, PartialEq)]
pub enum StepError {
    #[error("Step size must be finite and positive, got {0}")]
    InvalidStep(f64),

    #[error("Order must be at least 1")]
    ZeroOrder,

    #[error("Implicit solve is singular: 1 - a*B = {0}")]
    Singular(f64),
}

/// Updated distribution value and the collision integral it implies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub distribution: f64,
    pub integral: f64,
}

/// Order actually used for a requested `order` and the available history.
#[inline]
pub fn order_for(order: usize, history_len: usize) -> usize {
    order.min(MAX_ORDER).min(history_len + 1)
}

/// Advances `y` by one step of size `h`.
///
/// `history` holds past collision-integral values at this grid point, oldest
/// first; the last `order - 1` of them enter the formula. `constant` and
/// `linear` are the `F_1` and `F_f` weighted integrals of the current step.
pub fn advance(
    y: f64,
    history: &[f64],
    constant: f64,
    linear: f64,
    h: f64,
    order: usize,
) -> Result<Prediction, StepError> {
    if !h.is_finite() || h <= 0.0 {
        return Err(StepError::InvalidStep(h));
    }
    if order == 0 {
        return Err(StepError::ZeroOrder);
    }
    if constant == 0.0 && linear == 0.0 {
        return Ok(Prediction {
            distribution: y,
            integral: 0.0,
        });
    }

    let order = order_for(order, history.len());
    let (coefficients, denominator) = COEFFICIENTS[order - 1];
    let past = &history[history.len() + 1 - order..];

    let explicit: f64 = coefficients
        .iter()
        .zip(past)
        .map(|(c, f)| c * f)
        .sum::<f64>()
        * h
        / denominator;
    let implicit = h * coefficients[order - 1] / denominator;

    let divisor = 1.0 - implicit * linear;
    if divisor == 0.0 {
        return Err(StepError::Singular(divisor));
    }
    let distribution = (y + explicit + implicit * constant) / divisor;

    Ok(Prediction {
        distribution,
        integral: (distribution - y) / h,
    })
}
