//! Tabulated transmission curves
//!
//! Filter passbands, detector quantum efficiency and mirror reflectivity are
//! all published as short `(wavelength, fraction)` tables. This module stores
//! such a table and projects it onto a [`SpectralGrid`] for the throughput
//! chain.

use thiserror::Error;

use super::grid::{GridError, SpectralGrid};
use super::trapezoid::{trap_integrate, TrapezoidError};

/// Errors that can occur when building a transmission curve
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("Wavelength and value vectors must have the same length (and at least 2 points)")]
    LengthMismatch,

    #[error("Wavelengths must be in ascending order")]
    NotAscending,

    #[error("Transmission values must be between 0.0 and 1.0, got {0}")]
    OutOfRange(f64),

    #[error("Integration failed: {0}")]
    Integration(#[from] TrapezoidError),
}

/// Fractional transmission as a function of wavelength
///
/// Values are linearly interpolated between table points and are zero
/// outside the tabulated range.
#[derive(Debug, Clone)]
pub struct TransmissionCurve {
    /// Wavelengths in Angstrom
    wavelengths: Vec<f64>,

    /// Transmission (0.0 to 1.0) at each wavelength
    values: Vec<f64>,
}

impl TransmissionCurve {
    /// Create a curve from wavelength and transmission tables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vectors have different lengths or fewer than 2 points
    /// - Wavelengths are not strictly ascending
    /// - Any value is outside the range [0.0, 1.0]
    pub fn from_table(wavelengths: Vec<f64>, values: Vec<f64>) -> Result<Self, CurveError> {
        if wavelengths.len() != values.len() || wavelengths.len() < 2 {
            return Err(CurveError::LengthMismatch);
        }

        if wavelengths.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CurveError::NotAscending);
        }

        if let Some(&bad) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(CurveError::OutOfRange(bad));
        }

        Ok(Self {
            wavelengths,
            values,
        })
    }

    /// Create a curve from `(wavelength, transmission)` pairs
    pub fn from_pairs(data: &[(f64, f64)]) -> Result<Self, CurveError> {
        let (wavelengths, values) = data.iter().copied().unzip();
        Self::from_table(wavelengths, values)
    }

    /// Transmission at `wavelength` (Angstrom), zero outside the table
    pub fn at(&self, wavelength: f64) -> f64 {
        crate::algo::interp_or(wavelength, &self.wavelengths, &self.values, 0.0).unwrap_or(0.0)
    }

    /// Tabulated wavelength range `(lower, upper)` in Angstrom
    pub fn band(&self) -> (f64, f64) {
        (
            self.wavelengths[0],
            self.wavelengths[self.wavelengths.len() - 1],
        )
    }

    /// Largest tabulated transmission
    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Integrate `transmission(λ) * f(λ)` over the table
    pub fn integrate<F>(&self, f: F) -> Result<f64, CurveError>
    where
        F: Fn(f64) -> f64,
    {
        Ok(trap_integrate(&self.wavelengths, |x| self.at(x) * f(x))?)
    }

    /// Transmission-weighted mean wavelength in Angstrom
    pub fn effective_wavelength(&self) -> Result<f64, CurveError> {
        let weight = self.integrate(|_| 1.0)?;
        Ok(self.integrate(|x| x)? / weight)
    }

    /// Sample the curve on the same lattice as `template`
    pub fn to_grid(&self, template: &SpectralGrid) -> Result<SpectralGrid, GridError> {
        SpectralGrid::from_table(
            template.x0(),
            template.dx(),
            template.len(),
            &self.wavelengths,
            &self.values,
        )
    }
}
