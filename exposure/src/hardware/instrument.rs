//! Telescope and detector combined into the numbers the exposure engine uses

use super::detector::DetectorConfig;
use super::telescope::TelescopeConfig;
use crate::error::ExposureError;

/// Light collection and sampling of one telescope/detector pairing
#[derive(Debug, Clone)]
pub struct Instrument {
    pub name: String,
    /// Effective collecting area in cm²
    pub collecting_area_cm2: f64,
    /// Angular size of an unbinned pixel in arcseconds
    pub pixel_scale_arcsec: f64,
    /// Aluminium reflections before the detector
    pub mirror_count: u32,
    pub detector: DetectorConfig,
}

impl Instrument {
    /// Instrument from raw numbers, with no mirrors in the light path
    pub fn new(
        name: impl Into<String>,
        collecting_area_cm2: f64,
        pixel_scale_arcsec: f64,
        detector: DetectorConfig,
    ) -> Self {
        Self {
            name: name.into(),
            collecting_area_cm2,
            pixel_scale_arcsec,
            mirror_count: 0,
            detector,
        }
    }

    /// Mount `detector` at the focus of `telescope`
    pub fn from_configs(
        telescope: &TelescopeConfig,
        detector: &DetectorConfig,
    ) -> Result<Self, ExposureError> {
        telescope.validate()?;
        detector.validate()?;

        let instrument = Self {
            name: format!("{} + {}", telescope.name, detector.name),
            collecting_area_cm2: telescope.collecting_area_cm2(),
            pixel_scale_arcsec: telescope.pixel_scale_arcsec(detector.pixel_size),
            mirror_count: telescope.mirror_count,
            detector: detector.clone(),
        };
        log::debug!(
            "Instrument {}: {:.1} cm², {:.3}\"/pixel",
            instrument.name,
            instrument.collecting_area_cm2,
            instrument.pixel_scale_arcsec
        );
        Ok(instrument)
    }

    /// Pixel scale after `binning` x `binning` on-chip binning
    pub fn binned_pixel_scale_arcsec(&self, binning: u32) -> f64 {
        self.pixel_scale_arcsec * binning as f64
    }

    pub fn validate(&self) -> Result<(), ExposureError> {
        if !(self.collecting_area_cm2.is_finite() && self.collecting_area_cm2 > 0.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "collecting area must be positive, got {}",
                self.collecting_area_cm2
            )));
        }
        if !(self.pixel_scale_arcsec.is_finite() && self.pixel_scale_arcsec > 0.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "pixel scale must be positive, got {}",
                self.pixel_scale_arcsec
            )));
        }
        self.detector.validate()
    }
}
