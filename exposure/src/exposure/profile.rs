//! Seeing-disk point spread functions
//!
//! Radii and pixel sizes are expressed in units of the seeing FWHM, so the
//! profiles here are dimensionless and normalised to unit total flux.

use std::f64::consts::{LN_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::ExposureError;

/// Simpson sample spacing across the central pixel, in FWHM
const SIMPSON_STEP_FWHM: f64 = 0.05;

/// Minimum number of Simpson intervals per pixel axis (even)
const SIMPSON_MIN_INTERVALS: usize = 8;

/// Radially symmetric seeing profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SeeingProfile {
    /// Gaussian core, the usual long-exposure approximation
    #[default]
    Gaussian,
    /// Moffat profile with wings controlled by `beta` (> 1)
    Moffat { beta: f64 },
}

impl SeeingProfile {
    /// Gaussian sigma for FWHM = 1
    fn gaussian_sigma() -> f64 {
        1.0 / (2.0 * (2.0 * LN_2).sqrt())
    }

    /// Moffat core width for FWHM = 1
    fn moffat_alpha(beta: f64) -> f64 {
        1.0 / (2.0 * (2f64.powf(1.0 / beta) - 1.0).sqrt())
    }

    pub fn validate(&self) -> Result<(), ExposureError> {
        match *self {
            SeeingProfile::Gaussian => Ok(()),
            SeeingProfile::Moffat { beta } if beta.is_finite() && beta > 1.0 => Ok(()),
            SeeingProfile::Moffat { beta } => Err(ExposureError::InvalidConfiguration(format!(
                "Moffat beta must be greater than 1, got {beta}"
            ))),
        }
    }

    /// Surface brightness at radius `r` (FWHM units) for unit total flux
    pub fn intensity(&self, r: f64) -> f64 {
        match *self {
            SeeingProfile::Gaussian => {
                let sigma = Self::gaussian_sigma();
                (-r * r / (2.0 * sigma * sigma)).exp() / (2.0 * PI * sigma * sigma)
            }
            SeeingProfile::Moffat { beta } => {
                let alpha = Self::moffat_alpha(beta);
                (beta - 1.0) / (PI * alpha * alpha) * (1.0 + (r / alpha).powi(2)).powf(-beta)
            }
        }
    }

    /// Fraction of the total flux inside a circle of radius `r` (FWHM units)
    pub fn encircled_energy(&self, r: f64) -> f64 {
        if r <= 0.0 {
            return 0.0;
        }
        match *self {
            SeeingProfile::Gaussian => {
                let sigma = Self::gaussian_sigma();
                1.0 - (-r * r / (2.0 * sigma * sigma)).exp()
            }
            SeeingProfile::Moffat { beta } => {
                let alpha = Self::moffat_alpha(beta);
                1.0 - (1.0 + (r / alpha).powi(2)).powf(1.0 - beta)
            }
        }
    }

    /// Fraction of the total flux falling on a square pixel of side
    /// `pixel_fwhm` centred on the star
    ///
    /// Composite Simpson rule along both axes.
    pub fn central_pixel_fraction(&self, pixel_fwhm: f64) -> f64 {
        if !(pixel_fwhm > 0.0) {
            return 0.0;
        }

        let mut intervals = (pixel_fwhm / SIMPSON_STEP_FWHM).ceil() as usize;
        intervals = intervals.max(SIMPSON_MIN_INTERVALS);
        intervals += intervals % 2;

        let h = pixel_fwhm / intervals as f64;
        let half = pixel_fwhm / 2.0;
        let weight = |i: usize| -> f64 {
            if i == 0 || i == intervals {
                1.0
            } else if i % 2 == 1 {
                4.0
            } else {
                2.0
            }
        };

        let mut sum = 0.0;
        for i in 0..=intervals {
            let x = -half + i as f64 * h;
            let wx = weight(i);
            for j in 0..=intervals {
                let y = -half + j as f64 * h;
                sum += wx * weight(j) * self.intensity((x * x + y * y).sqrt());
            }
        }

        let fraction = sum * (h / 3.0) * (h / 3.0);
        fraction.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MOFFAT: SeeingProfile = SeeingProfile::Moffat { beta: 2.5 };

    #[test]
    fn test_half_maximum_at_half_fwhm() {
        for profile in [SeeingProfile::Gaussian, MOFFAT] {
            assert_relative_eq!(
                profile.intensity(0.5) / profile.intensity(0.0),
                0.5,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_gaussian_encircled_energy_at_one_fwhm() {
        // r = FWHM is 4 ln 2 in units of 2 sigma², so EE = 1 - 2^-4
        assert_relative_eq!(
            SeeingProfile::Gaussian.encircled_energy(1.0),
            0.9375,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_encircled_energy_is_monotonic() {
        for profile in [SeeingProfile::Gaussian, MOFFAT] {
            assert_eq!(profile.encircled_energy(0.0), 0.0);
            let mut last = 0.0;
            for i in 1..50 {
                let ee = profile.encircled_energy(i as f64 * 0.1);
                assert!(ee > last);
                assert!(ee < 1.0);
                last = ee;
            }
            assert!(profile.encircled_energy(100.0) > 0.999);
        }
    }

    #[test]
    fn test_moffat_has_broader_wings() {
        let r = 2.0;
        assert!(MOFFAT.encircled_energy(r) < SeeingProfile::Gaussian.encircled_energy(r));
    }

    #[test]
    fn test_tiny_pixel_samples_the_peak() {
        let side = 1e-3;
        for profile in [SeeingProfile::Gaussian, MOFFAT] {
            assert_relative_eq!(
                profile.central_pixel_fraction(side),
                side * side * profile.intensity(0.0),
                max_relative = 1e-5
            );
        }
    }

    #[test]
    fn test_huge_pixel_captures_everything() {
        assert_relative_eq!(
            SeeingProfile::Gaussian.central_pixel_fraction(20.0),
            1.0,
            epsilon = 1e-6
        );
        assert_eq!(SeeingProfile::Gaussian.central_pixel_fraction(0.0), 0.0);
    }

    #[test]
    fn test_pixel_fraction_between_inscribed_and_circumscribed_circles() {
        let side = 0.8;
        for profile in [SeeingProfile::Gaussian, MOFFAT] {
            let fraction = profile.central_pixel_fraction(side);
            assert!(fraction > profile.encircled_energy(side / 2.0));
            assert!(fraction < profile.encircled_energy(side / 2.0 * 2f64.sqrt()));
        }
    }

    #[test]
    fn test_validate_beta() {
        SeeingProfile::Gaussian.validate().unwrap();
        MOFFAT.validate().unwrap();
        assert!(SeeingProfile::Moffat { beta: 1.0 }.validate().is_err());
        assert!(SeeingProfile::Moffat { beta: f64::NAN }.validate().is_err());
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&MOFFAT).unwrap();
        assert_eq!(json, r#"{"kind":"moffat","beta":2.5}"#);
        let back: SeeingProfile = serde_json::from_str(r#"{"kind":"gaussian"}"#).unwrap();
        assert_eq!(back, SeeingProfile::Gaussian);
    }
}
