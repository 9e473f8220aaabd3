//! Table lookup and linear interpolation helpers.
//!
//! Catalog curves (filter transmission, quantum efficiency, extinction,
//! sky brightness) are stored as small ascending tables and evaluated on
//! the pipeline wavelength grid through these functions.

use thiserror::Error;

/// Errors that can occur during interpolation operations.
#[derive(Error, Debug)]
pub enum InterpError {
    #[error("Value {0} is out of bounds for interpolation range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Input vectors must have at least 2 points")]
    InsufficientData,
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
    #[error("X values must be sorted in ascending order")]
    UnsortedData,
}

/// Locate `value` inside an ascending table.
///
/// Returns `(lower, upper, lower_weight)` such that the interpolated value is
/// `table[lower] * lower_weight + table[upper] * (1 - lower_weight)`. An
/// exact hit returns the same index twice with weight 1. Values outside the
/// table return `None`.
pub fn bracket(array: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    if array.len() < 2 || !value.is_finite() {
        return None;
    }

    if value < array[0] || value > array[array.len() - 1] {
        return None;
    }

    // partition_point gives the first element strictly greater than value
    let upper = array.partition_point(|&probe| probe <= value);
    if upper == 0 {
        return None;
    }
    let lower = upper - 1;

    if array[lower] == value || upper == array.len() {
        return Some((lower, lower, 1.0));
    }

    let weight = (value - array[lower]) / (array[upper] - array[lower]);
    Some((lower, upper, 1.0 - weight))
}

/// Check that `(xs, ys)` is a usable interpolation table: equal lengths,
/// at least two points, strictly ascending `xs`.
pub fn validate_table(xs: &[f64], ys: &[f64]) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }

    if xs.len() < 2 {
        return Err(InterpError::InsufficientData);
    }

    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(InterpError::UnsortedData);
    }

    Ok(())
}

/// Performs linear interpolation on 1D tabulated data.
///
/// # Errors
///
/// * `InterpError::OutOfBounds` - x is outside the range \\[xs\\[0\\], xs\\[n-1\\]\\]
/// * `InterpError::InsufficientData` - Less than 2 data points provided
/// * `InterpError::MismatchedLengths` - xs and ys have different lengths
/// * `InterpError::UnsortedData` - xs array is not sorted in ascending order
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    validate_table(xs, ys)?;

    let (lower, upper, weight) =
        bracket(xs, x).ok_or(InterpError::OutOfBounds(x, xs[0], xs[xs.len() - 1]))?;

    Ok(ys[lower] * weight + ys[upper] * (1.0 - weight))
}

/// Like [`interp`] but returns `fill` outside the tabulated range.
pub fn interp_or(x: f64, xs: &[f64], ys: &[f64], fill: f64) -> Result<f64, InterpError> {
    match interp(x, xs, ys) {
        Err(InterpError::OutOfBounds(..)) => Ok(fill),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(interp(2.0, &xs, &ys).unwrap(), 20.0);
        assert_eq!(interp(4.0, &xs, &ys).unwrap(), 40.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [10.0, 20.0, 30.0];
        assert_eq!(interp(1.5, &xs, &ys).unwrap(), 15.0);
        assert_eq!(interp(2.5, &xs, &ys).unwrap(), 25.0);
    }

    #[test]
    fn test_out_of_bounds_and_fill() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [10.0, 20.0, 30.0];
        assert!(matches!(
            interp(0.5, &xs, &ys),
            Err(InterpError::OutOfBounds(_, _, _))
        ));
        assert_eq!(interp_or(3.5, &xs, &ys, 0.0).unwrap(), 0.0);
        assert_eq!(interp_or(2.5, &xs, &ys, 0.0).unwrap(), 25.0);
    }

    #[test]
    fn test_table_validation() {
        assert!(matches!(
            interp(1.5, &[1.0, 2.0, 3.0], &[10.0, 20.0]),
            Err(InterpError::MismatchedLengths)
        ));
        assert!(matches!(
            interp(1.0, &[1.0], &[10.0]),
            Err(InterpError::InsufficientData)
        ));
        assert!(matches!(
            interp(1.5, &[2.0, 1.0, 3.0], &[20.0, 10.0, 30.0]),
            Err(InterpError::UnsortedData)
        ));
    }

    #[test]
    fn test_bracket() {
        let array = [0.0, 10.0, 20.0, 30.0, 40.0];

        assert_eq!(bracket(&array, 10.0), Some((1, 1, 1.0)));
        assert_eq!(bracket(&array, 40.0), Some((4, 4, 1.0)));

        let (lower, upper, weight) = bracket(&array, 15.0).unwrap();
        assert_eq!((lower, upper), (1, 2));
        assert!((weight - 0.5).abs() < 1e-12);

        assert!(bracket(&array, -5.0).is_none());
        assert!(bracket(&array, 45.0).is_none());
        assert!(bracket(&array, f64::NAN).is_none());
    }
}
