//! Trapezoidal integration utility

use thiserror::Error;

/// Errors that can occur during trapezoidal integration
#[derive(Debug, Error)]
pub enum TrapezoidError {
    #[error("Insufficient points for integration, need at least 2 points")]
    InsufficientPoints,

    #[error("Points must be in ascending order")]
    NotAscending,

    #[error("Sample spacing must be positive and finite, got {0}")]
    InvalidSpacing(f64),
}

/// Performs trapezoidal integration of a function over a set of points.
///
/// # Arguments
///
/// * `corners` - The x coordinates of the trapezoid corners in ascending order
/// * `to_integrate` - The function to integrate
///
/// # Returns
///
/// The result of the trapezoidal integration or an error if the input is invalid.
pub fn trap_integrate<F>(corners: &[f64], to_integrate: F) -> Result<f64, TrapezoidError>
where
    F: Fn(f64) -> f64,
{
    if corners.len() < 2 {
        return Err(TrapezoidError::InsufficientPoints);
    }

    if corners.windows(2).any(|w| w[1] <= w[0]) {
        return Err(TrapezoidError::NotAscending);
    }

    let integral = corners
        .windows(2)
        .map(|w| (w[1] - w[0]) * (to_integrate(w[0]) + to_integrate(w[1])) / 2.0)
        .sum();

    Ok(integral)
}

/// Trapezoidal integral of uniformly spaced samples.
///
/// Equivalent to `dx * (sum(y) - (y[0] + y[n-1]) / 2)`. A single sample has
/// zero width and integrates to zero.
pub fn trap_integrate_uniform(dx: f64, samples: &[f64]) -> Result<f64, TrapezoidError> {
    if !(dx.is_finite() && dx > 0.0) {
        return Err(TrapezoidError::InvalidSpacing(dx));
    }

    match samples {
        [] => Err(TrapezoidError::InsufficientPoints),
        [_] => Ok(0.0),
        [first, .., last] => {
            let interior: f64 = samples.iter().sum::<f64>() - (first + last) / 2.0;
            Ok(dx * interior)
        }
    }
}
