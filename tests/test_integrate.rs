use std::error::Error;

use approx::assert_relative_eq;
use boltzmann_collision::utils::integrate::{Integrate, IntegrationError};
use boltzmann_collision::utils::quadrature::{QuadratureConfig, QuadratureError, QuadratureRule};
use ndarray::{Array1, s};

#[test]
fn test_simpson_is_exact_for_cubics() -> Result<(), Box<dyn Error>> {
    let cubic = |x: f64| 2.0 * x.powi(3) - x + 1.0;
    // \int_0^2 = 8 - 2 + 2
    for samples in [3, 4, 5, 8, 21] {
        let dx = 2.0 / (samples - 1) as f64;
        let y = Array1::from_shape_fn(samples, |i| cubic(i as f64 * dx));
        assert_relative_eq!(y.simpson(dx)?, 8.0, max_relative = 1e-13);
    }
    Ok(())
}

#[test]
fn test_trapezoid_and_precision() -> Result<(), Box<dyn Error>> {
    let y = [1.0_f64, 3.0, 5.0];
    assert_eq!(y.trapezoid(0.5)?, 3.0);

    let single: Vec<f32> = vec![0.0, 1.0, 4.0];
    assert_relative_eq!(single.as_slice().simpson(1.0_f32)?, 8.0 / 3.0, max_relative = 1e-6);
    Ok(())
}

#[test]
fn test_invalid_samples() {
    let y = Array1::linspace(0.0, 1.0, 11);
    assert_eq!([1.0_f64].simpson(0.1), Err(IntegrationError::InsufficientPoints { len: 1 }));
    assert_eq!(y.trapezoid(-0.1), Err(IntegrationError::InvalidSpacing));
    assert_eq!(
        y.slice(s![..;2]).simpson(0.2),
        Err(IntegrationError::NonContiguousSlice)
    );
}

#[test]
fn test_adaptive_quadrature() -> Result<(), Box<dyn Error>> {
    let config = QuadratureConfig::new(QuadratureRule::G15K31, 1e-12, 30)?;
    assert_relative_eq!(config.integrate_1d(f64::sin, (0.0, std::f64::consts::PI)), 2.0, max_relative = 1e-10);
    assert_eq!(config.integrate_1d(f64::exp, (1.0, 1.0)), 0.0);
    assert_eq!(config.integrate_1d(f64::exp, (2.0, 1.0)), 0.0);

    // Triangle 0 <= y <= x <= 1.
    let area = config.integrate_2d(&|x: f64, y: f64| x + y, (0.0, 1.0), &|x: f64| (0.0, x));
    assert_relative_eq!(area, 0.5, max_relative = 1e-10);

    assert_eq!(
        QuadratureConfig::new(QuadratureRule::G7K15, 0.0, 10),
        Err(QuadratureError::InvalidTolerance(0.0))
    );
    assert_eq!(
        QuadratureConfig::new(QuadratureRule::G7K15, 1e-6, 0),
        Err(QuadratureError::InvalidMaxIter)
    );
    Ok(())
}
