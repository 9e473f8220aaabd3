//! Observing conditions: solar, lunar and telescope geometry
//!
//! These are plain values that parameterise the sky brightness model and the
//! atmospheric part of the throughput chain. A new evaluation should be run
//! whenever any field changes; nothing derived from an older value is cached
//! here.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExposureError;

/// Sun-related geometry for zodiacal light and the solar activity cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarConditions {
    /// Observation epoch as a decimal year (e.g. 2024.5)
    pub epoch: f64,
    /// Angle between the target and the sun in degrees, 0 to 180
    pub solar_elongation_deg: f64,
    /// Ecliptic latitude of the target in degrees, -90 to 90
    pub ecliptic_latitude_deg: f64,
}

/// Moon geometry for scattered moonlight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarConditions {
    /// Zenith distance of the moon in degrees; above 90 the moon is down
    pub moon_zenith_distance_deg: f64,
    /// Lunar phase angle in degrees, 0 is full moon and 180 new moon
    pub lunar_phase_deg: f64,
    /// Angular separation between moon and target in degrees
    pub lunar_elongation_deg: f64,
}

/// Telescope pointing and site seeing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopeConditions {
    /// Airmass along the line of sight, 1 at zenith
    pub airmass: f64,
    /// Fraction of light surviving vignetting and mirror ageing, (0, 1]
    pub mirror_factor: f64,
    /// Seeing FWHM at zenith in arcseconds
    pub seeing_fwhm_zenith_arcsec: f64,
}

/// Complete set of inputs to the sky and atmosphere models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservingConditions {
    pub solar: SolarConditions,
    pub lunar: LunarConditions,
    pub telescope: TelescopeConditions,
}

impl Default for ObservingConditions {
    /// Dark time: moon below the horizon, anti-solar pointing at high
    /// ecliptic latitude, airmass 1.2 and 1" seeing.
    fn default() -> Self {
        Self {
            solar: SolarConditions {
                epoch: decimal_year(Utc::now()),
                solar_elongation_deg: 180.0,
                ecliptic_latitude_deg: 60.0,
            },
            lunar: LunarConditions {
                moon_zenith_distance_deg: 120.0,
                lunar_phase_deg: 180.0,
                lunar_elongation_deg: 90.0,
            },
            telescope: TelescopeConditions {
                airmass: 1.2,
                mirror_factor: 1.0,
                seeing_fwhm_zenith_arcsec: 1.0,
            },
        }
    }
}

fn check_angle(name: &str, value: f64, min: f64, max: f64) -> Result<(), ExposureError> {
    if !(value.is_finite() && (min..=max).contains(&value)) {
        return Err(ExposureError::InvalidConfiguration(format!(
            "{name} must be within [{min}, {max}] degrees, got {value}"
        )));
    }
    Ok(())
}

impl ObservingConditions {
    /// Reject physically meaningless values before any model runs
    ///
    /// # Errors
    /// `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<(), ExposureError> {
        if !self.solar.epoch.is_finite() {
            return Err(ExposureError::InvalidConfiguration(format!(
                "epoch must be finite, got {}",
                self.solar.epoch
            )));
        }
        check_angle("solar elongation", self.solar.solar_elongation_deg, 0.0, 180.0)?;
        check_angle("ecliptic latitude", self.solar.ecliptic_latitude_deg, -90.0, 90.0)?;

        check_angle("moon zenith distance", self.lunar.moon_zenith_distance_deg, 0.0, 180.0)?;
        check_angle("lunar phase", self.lunar.lunar_phase_deg, 0.0, 180.0)?;
        check_angle("lunar elongation", self.lunar.lunar_elongation_deg, 0.0, 180.0)?;

        let telescope = &self.telescope;
        if !(telescope.airmass.is_finite() && telescope.airmass >= 1.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "airmass must be at least 1, got {}",
                telescope.airmass
            )));
        }
        if !(telescope.mirror_factor > 0.0 && telescope.mirror_factor <= 1.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "mirror factor must be within (0, 1], got {}",
                telescope.mirror_factor
            )));
        }
        if !(telescope.seeing_fwhm_zenith_arcsec.is_finite()
            && telescope.seeing_fwhm_zenith_arcsec > 0.0)
        {
            return Err(ExposureError::InvalidConfiguration(format!(
                "seeing must be positive, got {}",
                telescope.seeing_fwhm_zenith_arcsec
            )));
        }
        Ok(())
    }

    /// Zenith distance of the target implied by the plane-parallel airmass
    pub fn target_zenith_distance_deg(&self) -> f64 {
        (1.0 / self.telescope.airmass).acos().to_degrees()
    }

    /// Seeing FWHM along the line of sight, `FWHM_zenith × X^0.6`
    pub fn seeing_fwhm_arcsec(&self) -> f64 {
        self.telescope.seeing_fwhm_zenith_arcsec * self.telescope.airmass.powf(0.6)
    }

    /// Whether the moon is above the horizon
    pub fn moon_up(&self) -> bool {
        self.lunar.moon_zenith_distance_deg <= 90.0
    }
}

/// Convert a UTC instant into a decimal year
pub fn decimal_year(instant: DateTime<Utc>) -> f64 {
    let year = instant.year();
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single();
    let end = Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).single();

    match (start, end) {
        (Some(start), Some(end)) => {
            let elapsed = (instant - start).num_seconds() as f64;
            let length = (end - start).num_seconds() as f64;
            year as f64 + elapsed / length
        }
        _ => year as f64,
    }
}
