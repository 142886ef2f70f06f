use approx::RelativeEq;
use ndarray::{ArrayBase, Data, Dimension};

use crate::kinematics::Kinematics;

/// Tolerance comparison that reports every offending element.
pub trait IsClose<Rhs = Self> {
    fn is_close(&self, other: &Rhs, abs_tol: f64, rel_tol: f64) -> Result<(), String>;
}

#[inline]
fn tolerance(a: f64, b: f64, abs_tol: f64, rel_tol: f64) -> f64 {
    rel_tol.mul_add(a.abs().max(b.abs()), abs_tol).max(abs_tol)
}

impl IsClose<f64> for f64 {
    fn is_close(&self, other: &f64, abs_tol: f64, rel_tol: f64) -> Result<(), String> {
        let abs_diff = (self - other).abs();
        let tolerance = tolerance(*self, *other, abs_tol, rel_tol);
        if abs_diff > tolerance || abs_diff.is_nan() {
            return Err(format!(
                "Scalar differs: actual {self}, expected {other}, abs_diff {abs_diff}, tolerance {tolerance}"
            ));
        }
        Ok(())
    }
}

impl<S1, S2, D> IsClose<ArrayBase<S2, D>> for ArrayBase<S1, D>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    fn is_close(&self, other: &ArrayBase<S2, D>, abs_tol: f64, rel_tol: f64) -> Result<(), String> {
        if self.shape() != other.shape() {
            return Err(format!(
                "Array shapes differ: actual {:?}, expected {:?}",
                self.shape(),
                other.shape()
            ));
        }
        if self.relative_eq(other, abs_tol, rel_tol) {
            return Ok(());
        }
        let errors: Vec<String> = self
            .iter()
            .zip(other.iter())
            .enumerate()
            .filter_map(|(index, (a, b))| {
                a.is_close(b, abs_tol, rel_tol)
                    .err()
                    .map(|error| format!("index {index}: {error}"))
            })
            .collect();
        Err(errors.join("\n"))
    }
}

impl IsClose for Kinematics {
    fn is_close(&self, other: &Kinematics, abs_tol: f64, rel_tol: f64) -> Result<(), String> {
        if self.len() != other.len() {
            return Err(format!(
                "Particle counts differ: actual {}, expected {}",
                self.len(),
                other.len()
            ));
        }
        let mut errors = Vec::new();
        for (name, actual, expected) in [
            ("p", &self.p, &other.p),
            ("E", &self.e, &other.e),
            ("m", &self.m, &other.m),
        ] {
            for (index, (a, b)) in actual.iter().zip(expected).enumerate() {
                if let Err(error) = a.is_close(b, abs_tol, rel_tol) {
                    errors.push(format!("{name}[{index}]: {error}"));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}
