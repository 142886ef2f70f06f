use std::error::Error;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use boltzmann_collision::adams_moulton::{MAX_ORDER, StepError, advance, order_for};

#[test]
fn test_no_collision_terms_leave_value_unchanged() -> Result<(), Box<dyn Error>> {
    let prediction = advance(0.42, &[1.0, -3.0, 2.0], 0.0, 0.0, 0.1, 5)?;
    assert_eq!(prediction.distribution, 0.42);
    assert_eq!(prediction.integral, 0.0);
    Ok(())
}

#[test]
fn test_order_is_capped_by_history() {
    assert_eq!(order_for(5, 0), 1);
    assert_eq!(order_for(5, 2), 3);
    assert_eq!(order_for(5, 10), 5);
    assert_eq!(order_for(9, 10), MAX_ORDER);
    assert_eq!(order_for(2, 10), 2);
}

#[test]
fn test_first_order_is_backward_euler() -> Result<(), Box<dyn Error>> {
    let (y, a, b, h) = (0.3, 0.2, -0.5, 0.1);
    let prediction = advance(y, &[], a, b, h, 5)?;
    let expected = (y + h * a) / (1.0 - h * b);
    assert_relative_eq!(prediction.distribution, expected, max_relative = 1e-15);
    assert_relative_eq!(prediction.integral, (expected - y) / h, max_relative = 1e-12);
    // The implied integral is the linear model evaluated at the new value.
    assert_relative_eq!(prediction.integral, a + b * expected, max_relative = 1e-12);
    Ok(())
}

#[test]
fn test_second_order_is_trapezoid() -> Result<(), Box<dyn Error>> {
    let (y, previous, a, b, h) = (0.8, -0.4, 0.1, -2.0, 0.05);
    let prediction = advance(y, &[7.0, previous], a, b, h, 2)?;
    let expected = (y + 0.5 * h * previous + 0.5 * h * a) / (1.0 - 0.5 * h * b);
    assert_relative_eq!(prediction.distribution, expected, max_relative = 1e-15);
    Ok(())
}

#[test]
fn test_constant_rate_is_integrated_exactly() -> Result<(), Box<dyn Error>> {
    let (y, rate, h) = (0.5, -0.3, 0.02);
    for order in 1..=MAX_ORDER {
        let history = vec![rate; order - 1];
        let prediction = advance(y, &history, rate, 0.0, h, order)?;
        assert_abs_diff_eq!(prediction.distribution, y + h * rate, epsilon = 1e-15);
    }
    Ok(())
}

#[test]
fn test_higher_order_tracks_exponential_decay() -> Result<(), Box<dyn Error>> {
    // y' = -y with exact past derivatives, one step from t = 4h to t = 5h.
    let h = 0.1_f64;
    let history: Vec<f64> = (0..5).map(|k| -(-(k as f64) * h).exp()).collect();
    let y = (-4.0 * h).exp();
    let exact = (-5.0 * h).exp();

    let fifth = advance(y, &history, 0.0, -1.0, h, 5)?;
    let first = advance(y, &history, 0.0, -1.0, h, 1)?;
    assert_abs_diff_eq!(fifth.distribution, exact, epsilon = 1e-7);
    assert!((fifth.distribution - exact).abs() < (first.distribution - exact).abs());
    Ok(())
}

#[test]
fn test_invalid_steps_are_rejected() {
    assert_eq!(advance(1.0, &[], 1.0, 0.0, 0.0, 1), Err(StepError::InvalidStep(0.0)));
    assert!(matches!(
        advance(1.0, &[], 1.0, 0.0, f64::NAN, 1),
        Err(StepError::InvalidStep(_))
    ));
    assert_eq!(advance(1.0, &[], 1.0, 0.0, 0.1, 0), Err(StepError::ZeroOrder));
    assert_eq!(advance(1.0, &[], 0.0, 1.0, 1.0, 1), Err(StepError::Singular(0.0)));
}
