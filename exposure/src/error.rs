//! Error types shared across the exposure pipeline
//!
//! Configuration problems are fatal to a whole evaluation and are raised
//! before any numerical work. Per-aperture numerical failures are stored in
//! the aperture's result instead of aborting the run.

use thiserror::Error;

use crate::photometry::grid::GridError;

/// Errors produced while configuring or evaluating an exposure
#[derive(Debug, Error)]
pub enum ExposureError {
    /// A physical parameter is outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No usable target spectrum, aperture list or transmission value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A single aperture produced NaN/Inf or an undefined noise budget
    #[error("Numerically undefined: {0}")]
    NumericUndefined(String),

    /// Unknown filter, detector material or read-out mode key
    #[error("Unknown catalog entry: {0}")]
    Catalog(String),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

impl ExposureError {
    /// True for errors that reject the configuration as a whole
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ExposureError::InvalidConfiguration(_)
                | ExposureError::InvalidValue(_)
                | ExposureError::Catalog(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(ExposureError::InvalidConfiguration("airmass".into()).is_configuration_error());
        assert!(ExposureError::InvalidValue("no target".into()).is_configuration_error());
        assert!(ExposureError::Catalog("Z".into()).is_configuration_error());
        assert!(!ExposureError::NumericUndefined("sn".into()).is_configuration_error());
    }

    #[test]
    fn test_grid_error_converts() {
        let err: ExposureError = GridError::InvalidFactor(0).into();
        assert!(matches!(err, ExposureError::Grid(GridError::InvalidFactor(0))));
        assert!(err.to_string().contains("Grid error"));
    }
}
