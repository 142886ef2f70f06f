use ndarray::{ArrayBase, Data, Ix1};
use num_traits::Float;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum IntegrationError {
    #[error("At least 2 points required for integration, got {len}")]
    InsufficientPoints { len: usize },

    #[error("Sample spacing must be finite and positive")]
    InvalidSpacing,

    #[error("Cannot get contiguous slice from array")]
    NonContiguousSlice,
}

/// Fixed-step integration of uniformly sampled data.
pub trait Integrate<T: Float> {
    fn trapezoid(&self, dx: T) -> Result<T, IntegrationError>;

    /// Composite Simpson's rule; an even number of samples closes the first
    /// three intervals with Simpson's 3/8 rule.
    fn simpson(&self, dx: T) -> Result<T, IntegrationError>;
}

#[inline]
fn constant<T: Float>(value: f64) -> T {
    <T as num_traits::NumCast>::from(value).unwrap_or_else(T::nan)
}

fn check<T: Float>(y: &[T], dx: T) -> Result<(), IntegrationError> {
    if y.len() < 2 {
        return Err(IntegrationError::InsufficientPoints { len: y.len() });
    }
    if !dx.is_finite() || dx <= T::zero() {
        return Err(IntegrationError::InvalidSpacing);
    }
    Ok(())
}

fn simpson_odd<T: Float>(y: &[T], h: T) -> T {
    let n = y.len();
    let (two, four) = (constant::<T>(2.0), constant::<T>(4.0));
    let interior = y[1..n - 1]
        .iter()
        .enumerate()
        .fold(T::zero(), |acc, (i, &v)| {
            acc + if i % 2 == 0 { four * v } else { two * v }
        });
    (y[0] + y[n - 1] + interior) * h / constant(3.0)
}

impl<T: Float> Integrate<T> for [T] {
    fn trapezoid(&self, dx: T) -> Result<T, IntegrationError> {
        check(self, dx)?;
        let sum = self.windows(2).fold(T::zero(), |acc, w| acc + w[0] + w[1]);
        Ok(constant::<T>(0.5) * dx * sum)
    }

    fn simpson(&self, dx: T) -> Result<T, IntegrationError> {
        check(self, dx)?;
        let y = self;
        let n = y.len();
        Ok(match n {
            2 => constant::<T>(0.5) * dx * (y[0] + y[1]),
            _ if n % 2 == 1 => simpson_odd(y, dx),
            _ => {
                let three = constant::<T>(3.0);
                let head = three * dx / constant(8.0) * (y[0] + three * y[1] + three * y[2] + y[3]);
                if n > 4 { head + simpson_odd(&y[3..], dx) } else { head }
            }
        })
    }
}

impl<S, T> Integrate<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
    T: Float,
{
    fn trapezoid(&self, dx: T) -> Result<T, IntegrationError> {
        self.as_slice()
            .ok_or(IntegrationError::NonContiguousSlice)?
            .trapezoid(dx)
    }

    fn simpson(&self, dx: T) -> Result<T, IntegrationError> {
        self.as_slice()
            .ok_or(IntegrationError::NonContiguousSlice)?
            .simpson(dx)
    }
}
